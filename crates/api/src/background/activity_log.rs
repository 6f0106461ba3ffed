//! Lifecycle activity log.
//!
//! Consumes a subscription to the event bus and writes one structured log
//! line per lifecycle event, giving an audit trail of project ownership
//! changes.

use linguist_events::PlatformEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

/// Run the activity log until `cancel` fires or the bus is dropped.
///
/// Events already queued when `cancel` fires are still logged.
///
/// Takes an existing receiver so no event published after the caller
/// subscribed is missed. Returns the number of events logged.
pub async fn run(mut rx: broadcast::Receiver<PlatformEvent>, cancel: CancellationToken) -> u64 {
    tracing::info!("Activity log started");
    let mut logged = 0u64;

    loop {
        // Queued events win over cancellation so nothing already published
        // is dropped at shutdown.
        tokio::select! {
            biased;
            received = rx.recv() => match received {
                Ok(event) => {
                    logged += 1;
                    tracing::info!(
                        target: "activity",
                        event_type = %event.event_type,
                        project_id = ?event.source_entity_id,
                        actor_id = ?event.actor_user_id,
                        payload = %event.payload,
                        at = %event.timestamp,
                        "Project activity",
                    );
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Activity log lagged behind the event bus");
                }
                Err(RecvError::Closed) => {
                    tracing::info!(logged, "Event bus closed, activity log stopping");
                    break;
                }
            },
            _ = cancel.cancelled() => {
                tracing::info!(logged, "Activity log stopping");
                break;
            }
        }
    }
    logged
}
