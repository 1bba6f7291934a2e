//! Application layer for the widget console.
//!
//! This crate provides the configuration session that coordinates the
//! domain rules in `widgetdesk-core` with a persistence gateway.

pub mod session;

pub use session::{ConfigurationSession, SessionError, SessionOptions, SessionSnapshot};
