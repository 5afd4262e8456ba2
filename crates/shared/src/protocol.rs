use serde::{Deserialize, Serialize};

use crate::domain::{category_from_wire, CategoryId, OperationId};

/// Path of the category update endpoint, relative to the context path.
pub const UPDATE_CATEGORY_PATH: &str = "account/update_cat.json";

/// Form body of `POST account/update_cat.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub cat: i64,
    pub op: i64,
}

impl UpdateCategoryRequest {
    pub fn new(operation_id: OperationId, category: i64) -> Self {
        Self {
            cat: category,
            op: operation_id.0,
        }
    }

    pub fn operation_id(&self) -> OperationId {
        OperationId(self.op)
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        category_from_wire(self.cat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryResponse {
    pub is_ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
}

impl UpdateCategoryResponse {
    pub fn ok() -> Self {
        Self {
            is_ok: true,
            error_name: None,
        }
    }

    pub fn rejected(error_name: impl Into<String>) -> Self {
        Self {
            is_ok: false,
            error_name: Some(error_name.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCategoryRequest {
    pub name: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
