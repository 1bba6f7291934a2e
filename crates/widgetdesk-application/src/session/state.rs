use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};
use widgetdesk_core::config::DeskConfig;
use widgetdesk_core::widget::{
    DEFAULT_HISTORY_DEPTH, HistoryStack, SessionOperation, ValidationErrors, WidgetConfig,
};

/// Tabs of the widget builder.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EditorTab {
    Templates,
    #[default]
    Appearance,
    Behavior,
    Advanced,
}

/// Coarse state of a session, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Clean,
    Dirty,
    Saving,
    Resetting,
    Testing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Snapshots kept on each history stack
    pub history_depth: usize,
    /// Upper bound for a single gateway call
    pub timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&DeskConfig> for SessionOptions {
    fn from(config: &DeskConfig) -> Self {
        Self {
            history_depth: config.editor.history_depth,
            timeout: Duration::from_secs(config.api.timeout_secs),
        }
    }
}

/// Mutable state owned by a session. Never handed out; see [`SessionSnapshot`].
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) widget_id: Option<String>,
    pub(crate) config: WidgetConfig,
    /// Last config the backend acknowledged (or loaded)
    pub(crate) saved: WidgetConfig,
    pub(crate) errors: ValidationErrors,
    pub(crate) is_dirty: bool,
    pub(crate) in_flight: Option<SessionOperation>,
    pub(crate) active_tab: EditorTab,
    pub(crate) history: HistoryStack,
}

impl SessionState {
    pub(crate) fn new(
        widget_id: Option<String>,
        config: WidgetConfig,
        errors: ValidationErrors,
        history_depth: usize,
    ) -> Self {
        Self {
            widget_id,
            saved: config.clone(),
            config,
            errors,
            is_dirty: false,
            in_flight: None,
            active_tab: EditorTab::default(),
            history: HistoryStack::new(history_depth),
        }
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        match self.in_flight {
            Some(SessionOperation::Save) => SessionPhase::Saving,
            Some(SessionOperation::Reset) => SessionPhase::Resetting,
            Some(SessionOperation::Test) => SessionPhase::Testing,
            None if self.is_dirty => SessionPhase::Dirty,
            None => SessionPhase::Clean,
        }
    }
}

/// Read-only copy of a session's state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub widget_id: Option<String>,
    pub config: WidgetConfig,
    pub errors: ValidationErrors,
    pub is_dirty: bool,
    pub is_saving: bool,
    pub is_resetting: bool,
    pub is_testing: bool,
    pub active_tab: EditorTab,
    pub can_undo: bool,
    pub can_redo: bool,
    pub phase: SessionPhase,
}

impl SessionSnapshot {
    pub(crate) fn capture(session_id: &str, state: &SessionState) -> Self {
        Self {
            session_id: session_id.to_string(),
            widget_id: state.widget_id.clone(),
            config: state.config.clone(),
            errors: state.errors.clone(),
            is_dirty: state.is_dirty,
            is_saving: state.in_flight == Some(SessionOperation::Save),
            is_resetting: state.in_flight == Some(SessionOperation::Reset),
            is_testing: state.in_flight == Some(SessionOperation::Test),
            active_tab: state.active_tab,
            can_undo: state.history.can_undo(),
            can_redo: state.history.can_redo(),
            phase: state.phase(),
        }
    }
}
