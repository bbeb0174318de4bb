use serde::Deserialize;

use crate::domain::MessageStyle;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Cooldown a submitter must wait out after an accepted submission.
    /// 观察到的部署用 3 天或 5 天, 这里不写死, 由配置决定。
    pub cooldown_seconds: u64,

    pub listen_addr: Option<String>,
    pub webhook_url: Option<String>,
    pub state_path: Option<String>,
    pub message_style: Option<MessageStyle>,

    /// Cap on how long an overload suggested-wait may block a request.
    pub max_backoff_seconds: Option<u64>,
}

impl Config {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let raw = expand_env(&raw);
        let cfg: Config = serde_yaml::from_str(&raw)?;
        Ok(cfg)
    }
}

/// very small ${VAR} expansion to keep config simple
fn expand_env(s: &str) -> String {
    let mut out = s.to_string();
    for (k, v) in std::env::vars() {
        out = out.replace(&format!("${{{}}}", k), &v);
    }
    out
}
