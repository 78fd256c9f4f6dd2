//! API handlers.

pub mod draw;
pub mod health;
pub mod keys;
pub mod wechat;
