use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::NotificationPayload;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("notifier error: {0}")]
    Notifier(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Durable identity -> last-accepted-epoch mapping.
/// 整个映射是持久化单元: 启动全量加载, 每次接受提交就全量重写。
#[async_trait]
pub trait ThrottleStore: Send + Sync {
    /// Missing or corrupt state loads as an empty map (fail open), it must
    /// never keep the process from starting.
    async fn load(&self) -> AppResult<HashMap<String, i64>>;

    async fn save(&self, map: &HashMap<String, i64>) -> AppResult<()>;
}

/// Deliver one formatted notification to the configured endpoint.
/// Overload handling (bounded wait + single retry) lives behind this seam;
/// callers only see delivered vs failed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, payload: &NotificationPayload) -> AppResult<()>;
}
