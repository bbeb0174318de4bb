use std::sync::Arc;

use crate::application::{Notifier, SubmissionGate};
use crate::domain::{Decision, NotificationPayload, SubmitterId};

/// Outcome of one submission attempt, as reported to the submitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    CooldownActive { remaining_seconds: u64 },
    DeliveryFailed,
}

pub struct SubmitTicketUseCase {
    pub gate: Arc<SubmissionGate>,
    pub notifier: Arc<dyn Notifier>,
}

impl SubmitTicketUseCase {
    pub async fn execute(
        &self,
        id: &SubmitterId,
        payload: &NotificationPayload,
        now: i64,
    ) -> SubmitOutcome {
        // 同一 identity 串行化整个序列, 防止双接受
        let _seq = self.gate.lock_identity(id).await;

        if let Decision::Denied { remaining_seconds } = self.gate.is_allowed(id, now).await {
            return SubmitOutcome::CooldownActive { remaining_seconds };
        }

        if let Err(e) = self.notifier.deliver(payload).await {
            tracing::warn!(identity = %id, "delivery failed: {e}");
            return SubmitOutcome::DeliveryFailed;
        }

        // Delivery already succeeded; a failed durable write must not retract
        // it, but the cooldown stays unenforced until the next good write.
        if let Err(e) = self.gate.record_submission(id, now).await {
            tracing::error!(identity = %id, "accepted submission not persisted: {e}");
        }

        SubmitOutcome::Accepted
    }
}
