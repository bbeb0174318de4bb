use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::application::{AppError, AppResult, ThrottleStore};

/// JSON file store for the identity -> last-accepted-epoch mapping.
///
/// path 示例
/// - "/data/submissions.json" (推荐用于 docker volume)
/// - "./submissions.json"
pub struct JsonFileThrottleStore {
    path: PathBuf,
}

impl JsonFileThrottleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    // 临时文件必须和目标同目录, rename 才是原子替换
    fn tmp_path(&self) -> PathBuf {
        let mut p: OsString = self.path.as_os_str().to_owned();
        p.push(".tmp");
        PathBuf::from(p)
    }
}

#[async_trait]
impl ThrottleStore for JsonFileThrottleStore {
    async fn load(&self) -> AppResult<HashMap<String, i64>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "throttle state unreadable, starting empty: {e}");
                return Ok(HashMap::new());
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "throttle state corrupt, starting empty: {e}");
                Ok(HashMap::new())
            }
        }
    }

    async fn save(&self, map: &HashMap<String, i64>) -> AppResult<()> {
        let raw =
            serde_json::to_vec_pretty(map).map_err(|e| AppError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::Storage(e.to_string()))?;
            }
        }

        // 写临时文件 + fsync + rename 覆盖: 写到一半挂掉也不破坏旧状态
        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        file.write_all(&raw)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(())
    }
}
