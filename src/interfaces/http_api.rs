use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;

use crate::application::usecases::{SubmitOutcome, SubmitTicketUseCase};
use crate::domain::{MessageStyle, NotificationPayload, PayloadField, SubmitterId};

#[derive(Clone)]
pub struct ApiState {
    pub submit: Arc<SubmitTicketUseCase>,
    pub message_style: MessageStyle,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index).post(submit))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn index() -> Html<&'static str> {
    Html(FORM_PAGE)
}

#[derive(Debug, Deserialize)]
struct TicketForm {
    name: Option<String>,
    email: Option<String>,
    mobile: Option<String>,
    payment: Option<String>,
    website: Option<String>,
}

async fn submit(
    State(state): State<ApiState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<TicketForm>,
) -> impl IntoResponse {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());

    let id = match SubmitterId::from_forwarded_chain(forwarded, &peer.ip().to_string()) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("error: {e}")).into_response(),
    };

    // 字段缺失不拦截, 占位符由 payload 渲染兜底
    let payload = NotificationPayload {
        title: "🎟️ New Ticket Submitted".to_string(),
        fields: vec![
            PayloadField::new("👤 Name", form.name.unwrap_or_default()),
            PayloadField::new("📧 Email", form.email.unwrap_or_default()),
            PayloadField::new("📱 Mobile", form.mobile.unwrap_or_default()),
            PayloadField::new("💳 Payment Method", form.payment.unwrap_or_default()),
            PayloadField::new("🌐 Website", form.website.unwrap_or_default()),
        ],
        style: state.message_style,
    };

    match state.submit.execute(&id, &payload, now_epoch()).await {
        SubmitOutcome::Accepted => {
            (StatusCode::OK, "✅ Ticket submitted successfully!".to_string()).into_response()
        }
        SubmitOutcome::CooldownActive { remaining_seconds } => (
            StatusCode::TOO_MANY_REQUESTS,
            format!(
                "⛔ You have already submitted a ticket. Try again in {}.",
                format_remaining(remaining_seconds)
            ),
        )
            .into_response(),
        // 投递失败不罚冷却, 提示语也不往外带传输层细节
        SubmitOutcome::DeliveryFailed => (
            StatusCode::BAD_GATEWAY,
            "😔 Sorry, we could not send your ticket right now. Please try again.".to_string(),
        )
            .into_response(),
    }
}

fn now_epoch() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// 剩余时间拆成 天/小时/分钟 展示, 不足一分钟按一分钟报
pub fn format_remaining(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    let mut parts = vec![];
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if parts.is_empty() {
        parts.push("1m".to_string());
    }

    parts.join(" ")
}

const FORM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Submit a Ticket</title>
</head>
<body>
  <h1>🎟️ Submit a Ticket</h1>
  <form method="post" action="/">
    <label>Name <input name="name"></label><br>
    <label>Email <input name="email" type="email"></label><br>
    <label>Mobile <input name="mobile"></label><br>
    <label>Payment Method <input name="payment"></label><br>
    <label>Website <input name="website"></label><br>
    <button type="submit">Submit</button>
  </form>
</body>
</html>
"#;
