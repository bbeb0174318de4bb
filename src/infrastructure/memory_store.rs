use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::{AppError, AppResult, ThrottleStore};

/// 测试 / 临时部署用: 不落盘, 进程退出即丢失。
#[derive(Clone, Default)]
pub struct InMemoryThrottleStore {
    inner: Arc<Mutex<HashMap<String, i64>>>,
}

impl InMemoryThrottleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the saved mapping, for assertions in tests.
    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.inner.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ThrottleStore for InMemoryThrottleStore {
    async fn load(&self) -> AppResult<HashMap<String, i64>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Storage("lock poisoned".into()))?;
        Ok(inner.clone())
    }

    async fn save(&self, map: &HashMap<String, i64>) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Storage("lock poisoned".into()))?;
        *inner = map.clone();
        Ok(())
    }
}
