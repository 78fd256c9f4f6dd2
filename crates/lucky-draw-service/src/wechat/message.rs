//! Inbound message parsing and text reply serialization.
//!
//! Message format (fields not listed are ignored):
//!
//! ```xml
//! <xml>
//!   <ToUserName><![CDATA[gh_account]]></ToUserName>
//!   <FromUserName><![CDATA[user_openid]]></FromUserName>
//!   <CreateTime>1700000000</CreateTime>
//!   <MsgType><![CDATA[text]]></MsgType>
//!   <Content><![CDATA[抽奖]]></Content>
//!   <MsgId>1234567890</MsgId>
//! </xml>
//! ```
//!
//! Replies use the same envelope with the addresses swapped.

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Deserialize;

/// Errors from reading or writing message XML.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The body is not a well-formed message.
    #[error("malformed message XML: {0}")]
    Parse(String),

    /// The reply could not be written.
    #[error("failed to serialize reply: {0}")]
    Serialize(String),
}

/// A message pushed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    /// The official account that received the message.
    #[serde(rename = "ToUserName")]
    pub to_user: String,

    /// The sender's open ID.
    #[serde(rename = "FromUserName")]
    pub from_user: String,

    /// Unix timestamp set by the platform.
    #[serde(rename = "CreateTime", default)]
    pub create_time: Option<i64>,

    /// Message type, e.g. `text`, `image`, `event`.
    #[serde(rename = "MsgType")]
    pub msg_type: String,

    /// Text content. Absent for non-text messages.
    #[serde(rename = "Content", default)]
    pub content: Option<String>,

    /// Platform message ID.
    #[serde(rename = "MsgId", default)]
    pub msg_id: Option<i64>,
}

impl InboundMessage {
    /// Parse a message body.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::Parse` if the XML is malformed or a required field is missing.
    pub fn parse(xml: &str) -> Result<Self, MessageError> {
        let mut message: Self =
            quick_xml::de::from_str(xml).map_err(|e| MessageError::Parse(e.to_string()))?;
        // The deserializer trims text nodes; content is matched verbatim.
        message.content = raw_content(xml)?;
        Ok(message)
    }

    /// The text content, if this is a text message.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        if self.msg_type == "text" {
            self.content.as_deref()
        } else {
            None
        }
    }
}

/// Read the top-level `Content` element exactly as sent.
fn raw_content(xml: &str) -> Result<Option<String>, MessageError> {
    let parse_err = |e: quick_xml::Error| MessageError::Parse(e.to_string());
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut content: Option<String> = None;
    let mut inside = false;

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(start) => {
                depth += 1;
                if depth == 2 && content.is_none() && start.name().as_ref() == b"Content" {
                    inside = true;
                    content = Some(String::new());
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    inside = false;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Empty(empty) => {
                if depth == 1 && content.is_none() && empty.name().as_ref() == b"Content" {
                    content = Some(String::new());
                }
            }
            Event::Text(text) if inside && depth == 2 => {
                let text = text.unescape().map_err(parse_err)?;
                if let Some(buf) = content.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::CData(cdata) if inside && depth == 2 => {
                let text = std::str::from_utf8(&cdata)
                    .map_err(|e| MessageError::Parse(e.to_string()))?;
                if let Some(buf) = content.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(content)
}

/// A plain-text reply envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReply {
    /// Recipient: the original sender.
    pub to_user: String,
    /// Sender: the original recipient account.
    pub from_user: String,
    /// Unix timestamp of the reply.
    pub create_time: i64,
    /// Reply text.
    pub content: String,
}

impl TextReply {
    /// Build a reply to `message`, swapping its addresses.
    #[must_use]
    pub fn to(message: &InboundMessage, content: impl Into<String>) -> Self {
        Self {
            to_user: message.from_user.clone(),
            from_user: message.to_user.clone(),
            create_time: chrono::Utc::now().timestamp(),
            content: content.into(),
        }
    }

    /// Serialize the reply as platform XML.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::Serialize` if writing fails.
    pub fn to_xml(&self) -> Result<String, MessageError> {
        let mut writer = Writer::new(Vec::new());

        emit(&mut writer, Event::Start(BytesStart::new("xml")))?;
        cdata_element(&mut writer, "ToUserName", &self.to_user)?;
        cdata_element(&mut writer, "FromUserName", &self.from_user)?;
        emit(&mut writer, Event::Start(BytesStart::new("CreateTime")))?;
        emit(
            &mut writer,
            Event::Text(BytesText::new(&self.create_time.to_string())),
        )?;
        emit(&mut writer, Event::End(BytesEnd::new("CreateTime")))?;
        cdata_element(&mut writer, "MsgType", "text")?;
        cdata_element(&mut writer, "Content", &self.content)?;
        emit(&mut writer, Event::End(BytesEnd::new("xml")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| MessageError::Serialize(e.to_string()))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), MessageError> {
    writer
        .write_event(event)
        .map_err(|e| MessageError::Serialize(e.to_string()))
}

/// Write `<name><![CDATA[text]]></name>`.
///
/// A `]]>` inside `text` would end the section early, so it is split across
/// two adjacent sections.
fn cdata_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), MessageError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(
        writer,
        Event::CData(BytesCData::new(text.replace("]]>", "]]]]><![CDATA[>"))),
    )?;
    emit(writer, Event::End(BytesEnd::new(name)))
}
