pub mod domain;
pub mod error;
pub mod pages;
pub mod protocol;
