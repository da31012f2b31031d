//! Chat transcript rendering.
//!
//! Each turn becomes an HTML chat bubble chosen by its role tag.

use serde::{Deserialize, Serialize};

use crate::domain::{Message, MessageRole};

pub const CHAT_CSS: &str = r#"<style>
.chat-message {
    padding: 1.5rem;
    border-radius: 0.5rem;
    margin-bottom: 1rem;
    display: flex;
}
.chat-message.user {
    background-color: #2b313e;
}
.chat-message.bot {
    background-color: #475063;
}
.chat-message .avatar {
    width: 15%;
    color: #fff;
    font-weight: bold;
}
.chat-message .message {
    width: 85%;
    padding: 0 1.5rem;
    color: #fff;
    white-space: pre-wrap;
}
</style>"#;

const USER_TEMPLATE: &str = r#"<div class="chat-message user">
    <div class="avatar">You</div>
    <div class="message">{MSG}</div>
</div>"#;

const BOT_TEMPLATE: &str = r#"<div class="chat-message bot">
    <div class="avatar">AI</div>
    <div class="message">{MSG}</div>
</div>"#;

/// One rendered turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFragment {
    pub role: MessageRole,
    pub html: String,
}

pub fn render(messages: &[Message]) -> Vec<ChatFragment> {
    messages.iter().map(render_message).collect()
}

pub fn render_message(message: &Message) -> ChatFragment {
    let template = match message.role {
        MessageRole::User => USER_TEMPLATE,
        MessageRole::Assistant => BOT_TEMPLATE,
    };

    ChatFragment {
        role: message.role,
        html: template.replace("{MSG}", &html_escape::encode_text(&message.content)),
    }
}

/// A standalone page with the stylesheet and every bubble.
pub fn render_page(title: &str, messages: &[Message]) -> String {
    let body = render(messages)
        .into_iter()
        .map(|f| f.html)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{CHAT_CSS}\n</head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = html_escape::encode_text(title),
    )
}
