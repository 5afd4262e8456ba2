use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(OperationId);
id_newtype!(CategoryId);

/// Wire value of a category selection meaning "no category".
pub const NO_CATEGORY: i64 = -1;

/// Element id prefix of a category selection control; the operation id follows it.
pub const CATEGORY_CONTROL_PREFIX: &str = "cat_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSummary {
    pub operation_id: OperationId,
    pub operation_date: NaiveDate,
    pub label: String,
    pub amount_cents: i64,
    pub category_id: Option<CategoryId>,
}

/// Maps a wire category value to the category it selects, `None` for [`NO_CATEGORY`].
pub fn category_from_wire(value: i64) -> Option<CategoryId> {
    (value != NO_CATEGORY).then_some(CategoryId(value))
}
