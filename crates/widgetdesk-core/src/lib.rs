pub mod config;
pub mod error;
pub mod widget;

// Re-export common error type
pub use error::DeskError;
