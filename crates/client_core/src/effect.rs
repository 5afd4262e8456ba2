//! What the UI does once an update request has settled.

use shared::protocol::UpdateCategoryResponse;

use crate::error::TransportError;

pub const SAVED_NOTICE: &str = "Enregistré";
pub const UPDATE_FAILED_NOTICE: &str = "Impossible de mettre à jour la catégorie";

/// Capabilities the category update handler drives on the page.
pub trait UiNotifier: Send + Sync {
    fn set_loading(&self, loading: bool);
    fn show_confirm(&self, message: &str);
    fn show_error(&self, message: &str);
    /// Full reload of the current view.
    fn reload_view(&self);
    /// Selects the first option (index 0) of the control.
    fn reset_selection(&self, control_id: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Confirmation notice, then full view reload.
    Saved,
    /// Error notice, then the control goes back to index 0.
    Rejected { message: String },
    /// A newer request for the same control is in flight. Only produced when
    /// stale responses are discarded.
    Superseded,
}

pub fn effect_for_outcome(outcome: Result<UpdateCategoryResponse, TransportError>) -> UiEffect {
    match outcome {
        Ok(response) if response.is_ok => UiEffect::Saved,
        Ok(response) => UiEffect::Rejected {
            message: response
                .error_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UPDATE_FAILED_NOTICE.to_string()),
        },
        Err(_) => UiEffect::Rejected {
            message: UPDATE_FAILED_NOTICE.to_string(),
        },
    }
}

pub fn apply_effect(effect: &UiEffect, control_id: &str, notifier: &dyn UiNotifier) {
    match effect {
        UiEffect::Saved => {
            notifier.show_confirm(SAVED_NOTICE);
            // TODO: refresh only the category summary instead of the whole view.
            notifier.reload_view();
        }
        UiEffect::Rejected { message } => {
            notifier.show_error(message);
            notifier.reset_selection(control_id);
        }
        UiEffect::Superseded => {}
    }
}

#[cfg(test)]
#[path = "tests/effect_tests.rs"]
mod tests;
