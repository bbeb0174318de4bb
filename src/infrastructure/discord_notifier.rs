use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::{AppError, AppResult, Notifier};
use crate::domain::{MessageStyle, NotificationPayload};

/// Suggested waits above this cap are clamped so a request-serving task never
/// sleeps unbounded on an overloaded endpoint.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const FALLBACK_BACKOFF: Duration = Duration::from_secs(1);
const EMBED_COLOR: u32 = 0x3498db;

pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook: String,
    max_backoff: Duration,
}

impl DiscordNotifier {
    pub fn new(webhook: String, max_backoff: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook,
            max_backoff,
        }
    }

    async fn post_once(&self, body: &WebhookMsg<'_>) -> AppResult<PostStatus> {
        let resp = self
            .client
            .post(&self.webhook)
            .timeout(REQUEST_TIMEOUT)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Notifier(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            // 建议等待时长: 先看 Retry-After 头, 再看 body 的 retry_after 字段
            let from_header = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok());
            let from_body = resp
                .json::<RetryBody>()
                .await
                .ok()
                .and_then(|b| b.retry_after);

            let wait = from_header
                .or(from_body)
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or(FALLBACK_BACKOFF);

            return Ok(PostStatus::Overloaded { wait });
        }

        resp.error_for_status()
            .map_err(|e| AppError::Notifier(e.to_string()))?;

        Ok(PostStatus::Accepted)
    }
}

enum PostStatus {
    Accepted,
    Overloaded { wait: Duration },
}

#[derive(Debug, Deserialize)]
struct RetryBody {
    retry_after: Option<f64>,
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> AppResult<()> {
        let body = render_message(payload);

        match self.post_once(&body).await? {
            PostStatus::Accepted => return Ok(()),
            PostStatus::Overloaded { wait } => {
                let wait = wait.min(self.max_backoff);
                tracing::info!(wait_ms = wait.as_millis() as u64, "webhook overloaded, retrying once");
                tokio::time::sleep(wait).await;
            }
        }

        // 只重试一次, 再失败就交给调用方
        match self.post_once(&body).await? {
            PostStatus::Accepted => Ok(()),
            PostStatus::Overloaded { .. } => Err(AppError::Notifier(
                "webhook still overloaded after retry".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct WebhookMsg<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed<'a>>,
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    color: u32,
    fields: Vec<EmbedField<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

fn render_message(payload: &NotificationPayload) -> WebhookMsg<'_> {
    match payload.style {
        MessageStyle::Text => WebhookMsg {
            content: Some(payload.render_text()),
            embeds: vec![],
        },
        MessageStyle::Embed => WebhookMsg {
            content: None,
            embeds: vec![Embed {
                title: &payload.title,
                color: EMBED_COLOR,
                fields: payload
                    .fields
                    .iter()
                    .map(|f| EmbedField {
                        name: f.label.as_str(),
                        value: f.display_value(),
                        inline: false,
                    })
                    .collect(),
            }],
        },
    }
}
