//! Configuration session services.
//!
//! This module contains the stateful core of the widget builder: the
//! session holding the live config, its validation errors, undo/redo
//! history and unsaved-changes flag, plus the event hub it reports through.

mod configuration;
mod error;
mod events;
mod state;


pub use configuration::ConfigurationSession;
pub use error::SessionError;
pub use events::EventHub;
pub use state::{EditorTab, SessionOptions, SessionPhase, SessionSnapshot};
