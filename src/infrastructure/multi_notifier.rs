use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::NotificationPayload;

pub struct MultiNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> AppResult<()> {
        // 某个渠道失败不拦着其它渠道发, 但最终结果要如实报给调用方,
        // 否则 gate 会把没送出去的提交也记成已接受
        let mut last_err = None;

        for n in &self.notifiers {
            if let Err(e) = n.deliver(payload).await {
                last_err = Some(e);
            }
        }

        if let Some(e) = last_err {
            return Err(e);
        }

        Ok(())
    }
}
