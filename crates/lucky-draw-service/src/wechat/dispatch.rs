//! Canned replies for inbound messages.

use crate::wechat::message::{InboundMessage, TextReply};

/// Text that asks for the draw page.
pub const DRAW_COMMAND: &str = "抽奖";

/// Text that asks for the key page.
pub const KEY_COMMAND: &str = "抽奖号";

/// What the sender asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Link to the draw page.
    DrawLink,
    /// Link to the key generation page.
    KeyLink,
    /// Anything else: remind the user of the command.
    Prompt,
}

impl Intent {
    /// Classify a message. Only exact text matches count as commands.
    #[must_use]
    pub fn of(message: &InboundMessage) -> Self {
        match message.text() {
            Some(DRAW_COMMAND) => Self::DrawLink,
            Some(KEY_COMMAND) => Self::KeyLink,
            _ => Self::Prompt,
        }
    }
}

/// Selects the reply for each inbound message.
#[derive(Debug, Clone)]
pub struct MessageDispatcher {
    draw_reply: String,
    key_reply: String,
    prompt_reply: String,
}

impl MessageDispatcher {
    /// Build a dispatcher whose links point at `public_base_url`.
    #[must_use]
    pub fn new(public_base_url: &str) -> Self {
        let base = public_base_url.trim_end_matches('/');
        Self {
            draw_reply: format!("(*´▽｀)ノノ 抽奖链接\n{base}/draw_page"),
            key_reply: format!("抽奖号获取链接\n{base}/generate_key_page"),
            prompt_reply: format!("请说 {DRAW_COMMAND}"),
        }
    }

    /// The reply text for an intent.
    #[must_use]
    pub fn reply_text(&self, intent: Intent) -> &str {
        match intent {
            Intent::DrawLink => &self.draw_reply,
            Intent::KeyLink => &self.key_reply,
            Intent::Prompt => &self.prompt_reply,
        }
    }

    /// Build the reply to `message`.
    #[must_use]
    pub fn dispatch(&self, message: &InboundMessage) -> TextReply {
        let intent = Intent::of(message);
        tracing::debug!(
            from_user = %message.from_user,
            msg_type = %message.msg_type,
            ?intent,
            "Dispatching message"
        );
        TextReply::to(message, self.reply_text(intent))
    }
}
