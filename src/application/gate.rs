use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::{AppResult, ThrottleStore};
use crate::domain::{CooldownPolicy, Decision, SubmitterId};

/// Single source of truth for "is this identity allowed to submit right now".
///
/// The in-memory map is authoritative; the store is rewritten wholesale on
/// every accepted submission so state survives restarts.
pub struct SubmissionGate {
    policy: CooldownPolicy,
    store: Arc<dyn ThrottleStore>,
    state: Mutex<HashMap<String, i64>>,
    // identity -> 该 identity 的整个 检查->投递->记录 序列锁
    sequence_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SubmissionGate {
    pub async fn load(policy: CooldownPolicy, store: Arc<dyn ThrottleStore>) -> AppResult<Self> {
        let state = store.load().await?;
        Ok(Self {
            policy,
            store,
            state: Mutex::new(state),
            sequence_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Serializes check -> deliver -> record for one identity, so two
    /// near-simultaneous submissions cannot both observe "allowed".
    /// 不同 identity 各自一把锁, 互不阻塞; 投递期间不持有内部 state 锁。
    pub async fn lock_identity(&self, id: &SubmitterId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.sequence_locks.lock().await;
            locks
                .entry(id.as_str().to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Pure read; repeated calls without an intervening record give the same answer.
    pub async fn is_allowed(&self, id: &SubmitterId, now: i64) -> Decision {
        let state = self.state.lock().await;
        self.policy.evaluate(state.get(id.as_str()).copied(), now)
    }

    /// Overwrites the identity's timestamp, then persists the full mapping
    /// before returning. Call only after the notification actually went out,
    /// so a failed delivery costs the submitter nothing.
    pub async fn record_submission(&self, id: &SubmitterId, now: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.insert(id.as_str().to_string(), now);
        self.store.save(&state).await
    }
}
