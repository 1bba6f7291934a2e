//! Widget configuration domain module.
//!
//! This module contains the editable widget configuration, the rules that
//! validate it, the undo/redo history and the gateway seam to the backend.
//!
//! # Module Structure
//!
//! - `model`: Core configuration model (`WidgetConfig`) and its enumerations
//! - `patch`: Partial updates with explicit nested merging (`WidgetConfigPatch`)
//! - `validation`: Field validation rules (`validate_field`, `validate_all`)
//! - `history`: Bounded undo/redo stacks (`HistoryStack`)
//! - `gateway`: Persistence trait for the backend (`WidgetGateway`)
//! - `event`: Events published by a configuration session
//! - `embed`: Embed snippet generation
//!
//! # Usage
//!
//! ```ignore
//! use widgetdesk_core::widget::{WidgetConfig, WidgetConfigPatch, validate_all};
//! use widgetdesk_core::widget::{HistoryStack, WidgetGateway, GatewayError};
//! ```

pub mod embed;
mod event;
mod gateway;
mod history;
mod model;
mod patch;
pub mod validation;

// Re-export public API
pub use embed::{DEFAULT_WIDGET_HOST, EmbedFormat, render_embed};
pub use event::{
    NotificationLevel, OperationOutcome, SessionEvent, SessionEventEnvelope, SessionOperation,
};
pub use gateway::{GatewayError, SavedConfig, TestReport, WidgetGateway};
pub use history::{DEFAULT_HISTORY_DEPTH, HistoryEntry, HistoryStack};
pub use model::{
    AutoTrigger, ConfigField, MAX_TRIGGER_DELAY, MAX_WIDGET_HEIGHT, MAX_WIDGET_WIDTH,
    MIN_TRIGGER_DELAY, MIN_WIDGET_HEIGHT, MIN_WIDGET_WIDTH, WidgetConfig, WidgetPosition,
    WidgetTemplate, WidgetTheme,
};
pub use patch::{AutoTriggerPatch, WidgetConfigPatch};
pub use validation::{ValidationErrors, validate_all, validate_field, validate_fields};
