use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;
use widgetdesk_core::widget::{
    ConfigField, GatewayError, NotificationLevel, OperationOutcome, SessionEvent,
    SessionEventEnvelope, SessionOperation, TestReport, ValidationErrors, WidgetConfig,
    WidgetConfigPatch, WidgetGateway, WidgetTemplate, validate_all, validate_field,
    validate_fields,
};

use super::error::SessionError;
use super::events::EventHub;
use super::state::{EditorTab, SessionOptions, SessionPhase, SessionSnapshot, SessionState};

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a gateway call, turning expiry into `GatewayError::Timeout`.
async fn with_timeout<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, GatewayError> {
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(GatewayError::Timeout(timeout)))
}

/// Marks a gateway operation as in flight until finished or dropped.
///
/// Dropping it (e.g. when the awaiting future is cancelled) releases the
/// session so it never stays stuck in `Saving`/`Resetting`/`Testing`.
struct InFlight {
    state: Arc<Mutex<SessionState>>,
    armed: bool,
}

impl InFlight {
    fn finish(mut self, state: &mut SessionState) {
        state.in_flight = None;
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            lock_state(&self.state).in_flight = None;
        }
    }
}

/// What an operation needs once the lock is released.
struct Pending {
    widget_id: Option<String>,
    config: WidgetConfig,
    in_flight: InFlight,
}

/// Replaces `errors` and reports whether anything changed.
fn replace_errors(
    state: &mut SessionState,
    errors: ValidationErrors,
    events: &mut Vec<SessionEvent>,
) {
    if state.errors != errors {
        state.errors = errors;
        events.push(SessionEvent::ValidationChanged {
            errors: state.errors.clone(),
        });
    }
}

fn set_dirty(state: &mut SessionState, is_dirty: bool, events: &mut Vec<SessionEvent>) {
    if state.is_dirty != is_dirty {
        state.is_dirty = is_dirty;
        events.push(SessionEvent::DirtyChanged { is_dirty });
    }
}

/// Folds backend field errors into the error map; unknown keys are skipped.
fn merge_server_errors(
    state: &mut SessionState,
    err: &GatewayError,
    events: &mut Vec<SessionEvent>,
) {
    if let GatewayError::Validation { fields } = err {
        let mut errors = state.errors.clone();
        for (key, message) in fields {
            match ConfigField::from_wire_key(key) {
                Some(field) => errors.insert(field, message.clone()),
                None => tracing::warn!(
                    "[ConfigurationSession] Ignoring server error for unknown field '{}': {}",
                    key,
                    message
                ),
            }
        }
        replace_errors(state, errors, events);
    }
}

fn finished(operation: SessionOperation, succeeded: bool) -> SessionEvent {
    SessionEvent::OperationFinished {
        operation,
        outcome: if succeeded {
            OperationOutcome::Succeeded
        } else {
            OperationOutcome::Failed
        },
    }
}

fn notify(level: NotificationLevel, message: impl Into<String>) -> SessionEvent {
    SessionEvent::Notification {
        level,
        message: message.into(),
    }
}

enum Direction {
    Undo,
    Redo,
}

/// The widget builder's editing session.
///
/// `ConfigurationSession` is responsible for:
/// - Holding the live config and accepting partial edits
/// - Validating touched fields on every edit, and all fields before save/test
/// - Recording undo/redo history
/// - Tracking unsaved changes against the last saved snapshot
/// - Saving, resetting and test-running through a [`WidgetGateway`]
///
/// Clones share the same state, so UI bindings can each hold one. At most
/// one gateway operation runs at a time; a second one is rejected with
/// [`SessionError::Busy`] rather than queued.
#[derive(Clone)]
pub struct ConfigurationSession {
    id: String,
    gateway: Arc<dyn WidgetGateway>,
    state: Arc<Mutex<SessionState>>,
    events: Arc<EventHub>,
    options: SessionOptions,
}

impl ConfigurationSession {
    /// Starts a session for a widget that does not exist yet.
    pub fn new_widget(gateway: Arc<dyn WidgetGateway>, options: SessionOptions) -> Self {
        Self::from_parts(gateway, None, WidgetConfig::default(), options)
    }

    /// Loads an existing widget and starts a session on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if the widget does not exist, or
    /// `SessionError::Network` if the backend could not be reached in time.
    pub async fn open(
        gateway: Arc<dyn WidgetGateway>,
        widget_id: &str,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        tracing::debug!("[ConfigurationSession] open() called for widget_id: {}", widget_id);

        let config = with_timeout(options.timeout, gateway.load(widget_id))
            .await
            .map_err(|e| {
                tracing::warn!("[ConfigurationSession] Failed to load widget {}: {}", widget_id, e);
                SessionError::from(e)
            })?;

        Ok(Self::from_parts(
            gateway,
            Some(widget_id.to_string()),
            config,
            options,
        ))
    }

    fn from_parts(
        gateway: Arc<dyn WidgetGateway>,
        widget_id: Option<String>,
        config: WidgetConfig,
        options: SessionOptions,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        let errors = validate_fields(&config);
        let state = SessionState::new(widget_id, config, errors, options.history_depth);

        Self {
            events: Arc::new(EventHub::new(id.clone())),
            id,
            gateway,
            state: Arc::new(Mutex::new(state)),
            options,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }

    // ============================================================================
    // Read access
    // ============================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn widget_id(&self) -> Option<String> {
        self.lock().widget_id.clone()
    }

    pub fn config(&self) -> WidgetConfig {
        self.lock().config.clone()
    }

    pub fn errors(&self) -> ValidationErrors {
        self.lock().errors.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().is_dirty
    }

    pub fn is_saving(&self) -> bool {
        self.lock().in_flight == Some(SessionOperation::Save)
    }

    pub fn is_resetting(&self) -> bool {
        self.lock().in_flight == Some(SessionOperation::Reset)
    }

    pub fn is_testing(&self) -> bool {
        self.lock().in_flight == Some(SessionOperation::Test)
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase()
    }

    pub fn active_tab(&self) -> EditorTab {
        self.lock().active_tab
    }

    pub fn can_undo(&self) -> bool {
        self.lock().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.lock().history.can_redo()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.id, &self.lock())
    }

    /// Subscribes to the events this session publishes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEventEnvelope> {
        self.events.subscribe()
    }

    // ============================================================================
    // Editing
    // ============================================================================

    /// Merges `patch` into the live config.
    ///
    /// Never fails: invalid values are stored and reported in `errors`.
    /// Each changed field (and any field depending on it) is re-validated,
    /// the previous config is pushed onto the undo stack and the session
    /// becomes dirty. A patch that changes nothing is ignored.
    ///
    /// # Returns
    ///
    /// The fields whose value changed.
    pub fn update_config(&self, patch: WidgetConfigPatch) -> Vec<ConfigField> {
        let mut events = Vec::new();
        let changed = {
            let mut guard = self.lock();
            let state = &mut *guard;

            let previous = state.config.clone();
            let changed = patch.apply_to(&mut state.config);
            if changed.is_empty() {
                return changed;
            }
            state.history.push(previous);

            let mut errors = state.errors.clone();
            let mut affected: Vec<ConfigField> = Vec::new();
            for field in &changed {
                for candidate in std::iter::once(field).chain(field.dependents()) {
                    if !affected.contains(candidate) {
                        affected.push(*candidate);
                    }
                }
            }
            for field in affected {
                errors.set(field, validate_field(field, &state.config));
            }

            events.push(SessionEvent::ConfigChanged {
                fields: changed.clone(),
            });
            replace_errors(state, errors, &mut events);
            set_dirty(state, true, &mut events);
            changed
        };

        tracing::debug!("[ConfigurationSession] Updated fields: {:?}", changed);
        self.events.publish(events);
        changed
    }

    /// Switches to `template`, applying its preset color and theme as one edit.
    pub fn apply_template(&self, template: WidgetTemplate) -> Vec<ConfigField> {
        self.update_config(
            WidgetConfigPatch::new()
                .selected_template(template)
                .primary_color(template.preset_color())
                .widget_theme(template.preset_theme()),
        )
    }

    /// Changes the visible builder tab. Never affects the unsaved-changes flag.
    pub fn set_active_tab(&self, tab: EditorTab) {
        self.lock().active_tab = tab;
    }

    /// Steps back one edit.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: A snapshot was restored
    /// - `Ok(false)`: Nothing to undo
    /// - `Err(SessionError::HistoryLocked)`: A save or reset is in flight
    pub fn undo(&self) -> Result<bool, SessionError> {
        self.navigate(Direction::Undo)
    }

    /// Re-applies the most recently undone edit. See [`Self::undo`].
    pub fn redo(&self) -> Result<bool, SessionError> {
        self.navigate(Direction::Redo)
    }

    fn navigate(&self, direction: Direction) -> Result<bool, SessionError> {
        let mut events = Vec::new();
        {
            let mut guard = self.lock();
            let state = &mut *guard;

            if let Some(operation @ (SessionOperation::Save | SessionOperation::Reset)) =
                state.in_flight
            {
                return Err(SessionError::HistoryLocked { operation });
            }

            let entry = match direction {
                Direction::Undo => state.history.undo(&state.config),
                Direction::Redo => state.history.redo(&state.config),
            };
            let Some(entry) = entry else {
                return Ok(false);
            };

            let fields = state.config.diff(&entry.config);
            state.config = entry.config;
            events.push(SessionEvent::ConfigChanged { fields });

            let errors = validate_all(&state.config);
            replace_errors(state, errors, &mut events);
            let is_dirty = state.config != state.saved;
            set_dirty(state, is_dirty, &mut events);
        }

        self.events.publish(events);
        Ok(true)
    }

    // ============================================================================
    // Gateway operations
    // ============================================================================

    /// Claims the session for `operation`.
    ///
    /// With `require_valid`, every field is validated first and the claim
    /// fails with `LocalValidation` if any error is present.
    fn begin(
        &self,
        operation: SessionOperation,
        require_valid: bool,
    ) -> Result<Pending, SessionError> {
        let mut events = Vec::new();
        let claimed = {
            let mut guard = self.lock();
            let state = &mut *guard;

            if let Some(current) = state.in_flight {
                Err(SessionError::Busy { operation: current })
            } else {
                if require_valid {
                    let mut errors = state.errors.clone();
                    errors.merge(validate_all(&state.config));
                    replace_errors(state, errors, &mut events);
                }

                if require_valid && !state.errors.is_empty() {
                    events.push(notify(
                        NotificationLevel::Error,
                        "Please fix the highlighted fields first",
                    ));
                    Err(SessionError::LocalValidation {
                        fields: state.errors.clone(),
                    })
                } else {
                    state.in_flight = Some(operation);
                    events.push(SessionEvent::OperationStarted { operation });
                    Ok(Pending {
                        widget_id: state.widget_id.clone(),
                        config: state.config.clone(),
                        in_flight: InFlight {
                            state: Arc::clone(&self.state),
                            armed: true,
                        },
                    })
                }
            }
        };

        if let Err(err) = &claimed {
            tracing::warn!("[ConfigurationSession] {} rejected: {}", operation, err);
        }
        self.events.publish(events);
        claimed
    }

    /// Persists the live config through the gateway.
    ///
    /// Blocked without a network call while any field is invalid. On success
    /// the sent config becomes the saved snapshot and the session is clean
    /// (unless it was edited while the request was in flight). On failure
    /// the config and dirty flag are kept so the caller can retry.
    ///
    /// # Errors
    ///
    /// - `LocalValidation`: Invalid fields, nothing sent
    /// - `Busy`: Another gateway operation is in flight, nothing sent
    /// - `ServerValidation`: Backend rejected fields; they are merged into `errors`
    /// - `Network` / `Conflict` / `NotFound`: Backend failure
    pub async fn save_config(&self) -> Result<(), SessionError> {
        let Pending {
            widget_id,
            config,
            in_flight,
        } = self.begin(SessionOperation::Save, true)?;

        tracing::debug!(
            "[ConfigurationSession] Saving widget {}",
            widget_id.as_deref().unwrap_or("<new>")
        );
        let result = with_timeout(
            self.options.timeout,
            self.gateway.save(widget_id.as_deref(), &config),
        )
        .await;

        let mut events = Vec::new();
        let outcome = {
            let mut guard = self.lock();
            let state = &mut *guard;
            in_flight.finish(state);

            match result {
                Ok(saved) => {
                    if state.widget_id.is_none() {
                        state.widget_id = Some(saved.id.clone());
                    }
                    state.saved = config;
                    let is_dirty = state.config != state.saved;
                    set_dirty(state, is_dirty, &mut events);
                    events.push(finished(SessionOperation::Save, true));
                    events.push(notify(
                        NotificationLevel::Success,
                        "Widget configuration saved",
                    ));
                    tracing::info!("[ConfigurationSession] Saved widget {}", saved.id);
                    Ok(())
                }
                Err(err) => {
                    merge_server_errors(state, &err, &mut events);
                    events.push(finished(SessionOperation::Save, false));
                    events.push(notify(
                        NotificationLevel::Error,
                        format!("Failed to save widget: {err}"),
                    ));
                    tracing::warn!("[ConfigurationSession] Save failed: {}", err);
                    Err(SessionError::from(err))
                }
            }
        };

        self.events.publish(events);
        outcome
    }

    /// Replaces the config with the backend defaults.
    ///
    /// Allowed with or without unsaved changes; confirming with the user is
    /// the caller's job. On success errors and history are cleared and the
    /// session is clean. On failure nothing changes. A widget that was
    /// never saved resets to the local defaults without a gateway call.
    pub async fn reset_config(&self) -> Result<(), SessionError> {
        let Pending {
            widget_id,
            in_flight,
            ..
        } = self.begin(SessionOperation::Reset, false)?;

        let result = match widget_id.as_deref() {
            Some(id) => with_timeout(self.options.timeout, self.gateway.reset(id)).await,
            None => Ok(WidgetConfig::default()),
        };

        let mut events = Vec::new();
        let outcome = {
            let mut guard = self.lock();
            let state = &mut *guard;
            in_flight.finish(state);

            match result {
                Ok(defaults) => {
                    let fields = state.config.diff(&defaults);
                    state.config = defaults.clone();
                    state.saved = defaults;
                    state.history.clear();
                    events.push(SessionEvent::ConfigChanged { fields });
                    replace_errors(state, ValidationErrors::new(), &mut events);
                    set_dirty(state, false, &mut events);
                    events.push(finished(SessionOperation::Reset, true));
                    events.push(notify(
                        NotificationLevel::Success,
                        "Widget configuration reset to defaults",
                    ));
                    tracing::info!(
                        "[ConfigurationSession] Reset widget {:?} to defaults",
                        widget_id
                    );
                    Ok(())
                }
                Err(err) => {
                    events.push(finished(SessionOperation::Reset, false));
                    events.push(notify(
                        NotificationLevel::Error,
                        format!("Failed to reset widget: {err}"),
                    ));
                    tracing::warn!("[ConfigurationSession] Reset failed: {}", err);
                    Err(SessionError::from(err))
                }
            }
        };

        self.events.publish(events);
        outcome
    }

    /// Dry-runs the live config through the gateway.
    ///
    /// Same validation guard as [`Self::save_config`]. Never changes the
    /// config, the dirty flag or the history.
    pub async fn test_config(&self) -> Result<TestReport, SessionError> {
        let Pending {
            widget_id,
            config,
            in_flight,
        } = self.begin(SessionOperation::Test, true)?;

        let result = with_timeout(
            self.options.timeout,
            self.gateway.test(widget_id.as_deref(), &config),
        )
        .await;

        let mut events = Vec::new();
        let outcome = {
            let mut guard = self.lock();
            let state = &mut *guard;
            in_flight.finish(state);

            match result {
                Ok(report) => {
                    events.push(finished(SessionOperation::Test, report.passed));
                    let (level, fallback) = if report.passed {
                        (NotificationLevel::Success, "Widget test passed")
                    } else {
                        (NotificationLevel::Error, "Widget test failed")
                    };
                    events.push(notify(
                        level,
                        report.details.clone().unwrap_or_else(|| fallback.to_string()),
                    ));
                    Ok(report)
                }
                Err(err) => {
                    merge_server_errors(state, &err, &mut events);
                    events.push(finished(SessionOperation::Test, false));
                    events.push(notify(
                        NotificationLevel::Error,
                        format!("Failed to test widget: {err}"),
                    ));
                    tracing::warn!("[ConfigurationSession] Test failed: {}", err);
                    Err(SessionError::from(err))
                }
            }
        };

        self.events.publish(events);
        outcome
    }
}
