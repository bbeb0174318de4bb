use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::NotificationPayload;

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> AppResult<()> {
        println!("DELIVER: {}", payload.render_text().replace('\n', " | "));
        Ok(())
    }
}
