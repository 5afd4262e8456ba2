use std::collections::HashMap;

use shared::{domain::OperationId, protocol::UpdateCategoryRequest};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod control;
pub mod effect;
pub mod error;
pub mod transport;

pub use control::{control_id_for, parse_category_value, parse_control_id};
pub use effect::{apply_effect, effect_for_outcome, UiEffect, UiNotifier};
pub use error::{ClientError, TransportError};
pub use transport::{update_endpoint, CategoryTransport, HttpCategoryTransport};

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientOptions {
    /// Drop the response of a request when a newer request for the same
    /// control has been issued since. Off by default: every response is
    /// applied in arrival order, so the last one to arrive wins.
    pub discard_stale_responses: bool,
}

/// Handles changes of category selection controls.
pub struct CategoryUpdateClient<T: CategoryTransport> {
    transport: T,
    options: ClientOptions,
    generations: Mutex<HashMap<OperationId, u64>>,
}

impl<T: CategoryTransport> CategoryUpdateClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        Self {
            transport,
            options,
            generations: Mutex::new(HashMap::new()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Posts the new category of the operation behind `control_id` and applies
    /// the outcome to `notifier`.
    ///
    /// Malformed input fails before any request is issued and leaves the
    /// notifier untouched. Otherwise the loading indicator is switched on once
    /// and off once, whatever the outcome, and the applied effect is returned.
    /// There is no retry: a failed update has to be reselected by the user.
    pub async fn on_category_change(
        &self,
        control_id: &str,
        value: &str,
        notifier: &dyn UiNotifier,
    ) -> Result<UiEffect, ClientError> {
        let operation_id = parse_control_id(control_id)?;
        let category = parse_category_value(value)?;
        let request = UpdateCategoryRequest::new(operation_id, category);

        let generation = self.begin(operation_id).await;
        notifier.set_loading(true);
        let outcome = self.transport.update_category(&request).await;
        notifier.set_loading(false);

        if let Err(error) = &outcome {
            warn!(operation_id = operation_id.0, category, %error, "category update request failed");
        }

        let effect = if self.is_stale(operation_id, generation).await {
            debug!(operation_id = operation_id.0, "discarding superseded category update response");
            UiEffect::Superseded
        } else {
            effect_for_outcome(outcome)
        };

        match &effect {
            UiEffect::Saved => info!(operation_id = operation_id.0, category, "category saved"),
            UiEffect::Rejected { message } => {
                info!(operation_id = operation_id.0, category, %message, "category update rejected")
            }
            UiEffect::Superseded => {}
        }
        apply_effect(&effect, control_id, notifier);
        Ok(effect)
    }

    async fn begin(&self, operation_id: OperationId) -> u64 {
        if !self.options.discard_stale_responses {
            return 0;
        }
        let mut generations = self.generations.lock().await;
        let generation = generations.entry(operation_id).or_insert(0);
        *generation += 1;
        *generation
    }

    async fn is_stale(&self, operation_id: OperationId, generation: u64) -> bool {
        if !self.options.discard_stale_responses {
            return false;
        }
        let generations = self.generations.lock().await;
        generations
            .get(&operation_id)
            .is_some_and(|latest| *latest != generation)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
