//! WeChat official-account webhook integration.
//!
//! WeChat handles:
//! - The ownership handshake (`GET /` with an `echostr` challenge)
//! - Delivery of user messages as signed XML `POST`s
//!
//! Every request carries `signature`, `timestamp` and `nonce` query
//! parameters. Nothing in a request is acted on until [`SignedRequest::verify`]
//! succeeds.

pub mod dispatch;
pub mod message;
pub mod signature;

pub use dispatch::{Intent, MessageDispatcher, DRAW_COMMAND, KEY_COMMAND};
pub use message::{InboundMessage, MessageError, TextReply};
pub use signature::{SignatureMismatch, SignedRequest, VerifiedRequest};
