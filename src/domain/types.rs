use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity a submission is throttled by: the submitter's observed network
/// address, or the first hop of a proxy-forwarded chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmitterId(String);

impl SubmitterId {
    pub fn parse(s: &str) -> Result<Self, SubmitterIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SubmitterIdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 代理链只取第一跳 (最接近提交者的地址), 取不到就回退 peer 地址。
    pub fn from_forwarded_chain(
        chain: Option<&str>,
        peer: &str,
    ) -> Result<Self, SubmitterIdError> {
        if let Some(chain) = chain {
            if let Some(first) = chain.split(',').next() {
                if let Ok(id) = Self::parse(first) {
                    return Ok(id);
                }
            }
        }
        Self::parse(peer)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum SubmitterIdError {
    #[error("submitter identity is empty")]
    Empty,
}
