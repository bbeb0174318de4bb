use serde::{Deserialize, Serialize};

/// Empty form values still show up in the outbound message, never silently dropped.
pub const EMPTY_FIELD_PLACEHOLDER: &str = "(not provided)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStyle {
    Text,
    Embed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub fields: Vec<PayloadField>,
    pub style: MessageStyle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadField {
    pub label: String,
    pub value: String,
}

impl PayloadField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn display_value(&self) -> &str {
        let v = self.value.trim();
        if v.is_empty() { EMPTY_FIELD_PLACEHOLDER } else { v }
    }
}

impl NotificationPayload {
    /// text 模式 webhook 和 console 输出共用的纯文本渲染。
    pub fn render_text(&self) -> String {
        let mut lines = vec![self.title.clone()];

        for f in &self.fields {
            lines.push(format!("{}: {}", f.label, f.display_value()));
        }

        lines.join("\n")
    }
}
