use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use ticketrelay::application::usecases::{SubmitOutcome, SubmitTicketUseCase};
use ticketrelay::application::{AppError, AppResult, Notifier, SubmissionGate, ThrottleStore};
use ticketrelay::domain::{
    CooldownPolicy, Decision, MessageStyle, NotificationPayload, PayloadField, SubmitterId,
};
use ticketrelay::infrastructure::memory_store::InMemoryThrottleStore;
use ticketrelay::interfaces::http_api::format_remaining;

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn deliver(&self, _payload: &NotificationPayload) -> AppResult<()> {
        Err(AppError::Notifier("connection refused".into()))
    }
}

struct OkNotifier;

#[async_trait]
impl Notifier for OkNotifier {
    async fn deliver(&self, _payload: &NotificationPayload) -> AppResult<()> {
        Ok(())
    }
}

/// load 正常, save 必失败: 模拟磁盘写坏的场景
struct WriteFailingStore;

#[async_trait]
impl ThrottleStore for WriteFailingStore {
    async fn load(&self) -> AppResult<HashMap<String, i64>> {
        Ok(HashMap::new())
    }

    async fn save(&self, _map: &HashMap<String, i64>) -> AppResult<()> {
        Err(AppError::Storage("disk full".into()))
    }
}

fn ticket() -> NotificationPayload {
    NotificationPayload {
        title: "🎟️ New Ticket Submitted".to_string(),
        fields: vec![PayloadField::new("👤 Name", "tester")],
        style: MessageStyle::Text,
    }
}

const WINDOW: u64 = 432_000; // 5 days

#[tokio::test]
async fn failed_delivery_applies_no_cooldown_penalty() {
    let store = Arc::new(InMemoryThrottleStore::new());
    let gate = Arc::new(
        SubmissionGate::load(
            CooldownPolicy {
                window_seconds: WINDOW,
            },
            store.clone(),
        )
        .await
        .unwrap(),
    );
    let submit = SubmitTicketUseCase {
        gate: gate.clone(),
        notifier: Arc::new(FailingNotifier),
    };
    let id = SubmitterId::parse("203.0.113.5").unwrap();

    assert_eq!(
        submit.execute(&id, &ticket(), 0).await,
        SubmitOutcome::DeliveryFailed
    );

    // 没记录, 提交者可以立刻重试
    assert_eq!(gate.is_allowed(&id, 0).await, Decision::Allowed);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn failed_persistence_does_not_retract_a_delivered_submission() {
    let gate = Arc::new(
        SubmissionGate::load(
            CooldownPolicy {
                window_seconds: WINDOW,
            },
            Arc::new(WriteFailingStore),
        )
        .await
        .unwrap(),
    );
    let submit = SubmitTicketUseCase {
        gate: gate.clone(),
        notifier: Arc::new(OkNotifier),
    };
    let id = SubmitterId::parse("203.0.113.5").unwrap();

    // 消息已送达: 即便落盘失败也报成功 (不一致走日志)
    assert_eq!(submit.execute(&id, &ticket(), 0).await, SubmitOutcome::Accepted);

    // 进程内的冷却还在生效
    assert_eq!(
        submit.execute(&id, &ticket(), 10).await,
        SubmitOutcome::CooldownActive {
            remaining_seconds: WINDOW - 10
        }
    );
}

#[test]
fn forwarded_chain_uses_first_hop_trimmed() {
    let id =
        SubmitterId::from_forwarded_chain(Some(" 203.0.113.7 , 10.0.0.1, 10.0.0.2"), "127.0.0.1")
            .unwrap();
    assert_eq!(id.as_str(), "203.0.113.7");
}

#[test]
fn empty_forwarded_chain_falls_back_to_peer() {
    let id = SubmitterId::from_forwarded_chain(Some("   "), "192.0.2.4").unwrap();
    assert_eq!(id.as_str(), "192.0.2.4");

    let id = SubmitterId::from_forwarded_chain(None, "192.0.2.4").unwrap();
    assert_eq!(id.as_str(), "192.0.2.4");
}

#[test]
fn blank_identity_is_rejected() {
    assert!(SubmitterId::parse("   ").is_err());
    assert!(SubmitterId::from_forwarded_chain(Some(","), "  ").is_err());
}

#[test]
fn remaining_time_breaks_into_days_hours_minutes() {
    assert_eq!(format_remaining(259_200), "3d");
    assert_eq!(format_remaining(255_600), "2d 23h");
    assert_eq!(format_remaining(3_660), "1h 1m");
    assert_eq!(format_remaining(45), "1m");
}

#[test]
fn empty_field_renders_as_placeholder() {
    let p = NotificationPayload {
        title: "t".to_string(),
        fields: vec![PayloadField::new("🌐 Website", "  ")],
        style: MessageStyle::Text,
    };
    assert_eq!(p.render_text(), "t\n🌐 Website: (not provided)");
}
