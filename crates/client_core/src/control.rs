//! Identifiers carried by a category selection control.

use shared::domain::{OperationId, CATEGORY_CONTROL_PREFIX};

use crate::error::ClientError;

/// Extracts the operation id from a control id of the form `cat_<operation id>`.
pub fn parse_control_id(control_id: &str) -> Result<OperationId, ClientError> {
    control_id
        .strip_prefix(CATEGORY_CONTROL_PREFIX)
        .and_then(|raw| raw.parse::<i64>().ok())
        .map(OperationId)
        .ok_or_else(|| ClientError::InvalidControlId(control_id.to_string()))
}

pub fn control_id_for(operation_id: OperationId) -> String {
    format!("{CATEGORY_CONTROL_PREFIX}{}", operation_id.0)
}

/// Parses the selected option value. `-1` is the "no category" entry.
pub fn parse_category_value(value: &str) -> Result<i64, ClientError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ClientError::InvalidCategoryValue(value.to_string()))
}

#[cfg(test)]
#[path = "tests/control_tests.rs"]
mod tests;
