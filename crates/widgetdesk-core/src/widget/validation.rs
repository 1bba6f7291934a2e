//! Field validation for widget configurations.
//!
//! All functions here are pure. Malformed input is the expected case, so
//! nothing panics or returns a hard error: each rule produces a
//! human-readable message scoped to one [`ConfigField`].
//!
//! Two strictness levels exist:
//! - [`validate_field`] runs on every keystroke and tolerates values that
//!   are still being typed (a one-character name, an empty color).
//! - [`validate_all`] runs before save/test and additionally enforces the
//!   fields that must be present for the widget to work.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use super::model::{
    ConfigField, MAX_TRIGGER_DELAY, MAX_WIDGET_HEIGHT, MAX_WIDGET_WIDTH, MIN_TRIGGER_DELAY,
    MIN_WIDGET_HEIGHT, MIN_WIDGET_WIDTH, WidgetConfig,
};

pub const MAX_WIDGET_NAME_LEN: usize = 100;
pub const MAX_WELCOME_MESSAGE_LEN: usize = 200;
pub const MAX_PLACEHOLDER_LEN: usize = 50;
pub const MAX_BOT_NAME_LEN: usize = 50;
pub const MAX_TRIGGER_MESSAGE_LEN: usize = 200;

static WIDGET_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 _-]+$").expect("widget name pattern is valid"));

static HEX_COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"));

/// Field-scoped validation messages.
///
/// A key is present only while its field is invalid; absence means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<ConfigField, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: ConfigField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: ConfigField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: ConfigField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: ConfigField) -> Option<String> {
        self.0.remove(&field)
    }

    /// Records the outcome of validating a single field.
    pub fn set(&mut self, field: ConfigField, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => {
                self.0.remove(&field);
            }
            Err(message) => {
                self.0.insert(field, message);
            }
        }
    }

    /// Adds every entry of `other`, overwriting messages for shared fields.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Wire-keyed copy, e.g. `{"autoTrigger.delay": "..."}`.
    pub fn to_wire_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, message)| (field.to_string(), message.clone()))
            .collect()
    }
}

impl FromIterator<(ConfigField, String)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (ConfigField, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate_widget_name(value: &str) -> Result<(), String> {
    let len = char_len(value);
    if len > MAX_WIDGET_NAME_LEN {
        return Err(format!(
            "Widget name must be {MAX_WIDGET_NAME_LEN} characters or less"
        ));
    }
    if len >= 2 && !WIDGET_NAME_PATTERN.is_match(value) {
        return Err(
            "Widget name can only contain letters, numbers, spaces, hyphens, and underscores"
                .to_string(),
        );
    }
    Ok(())
}

/// Any non-empty color must be a complete `#RRGGBB` value.
pub fn validate_primary_color(value: &str) -> Result<(), String> {
    if !value.is_empty() && !HEX_COLOR_PATTERN.is_match(value) {
        return Err("Please enter a valid hex color (e.g. #3B82F6)".to_string());
    }
    Ok(())
}

pub fn validate_welcome_message(value: &str) -> Result<(), String> {
    if char_len(value) > MAX_WELCOME_MESSAGE_LEN {
        return Err(format!(
            "Welcome message must be {MAX_WELCOME_MESSAGE_LEN} characters or less"
        ));
    }
    Ok(())
}

pub fn validate_placeholder(value: &str) -> Result<(), String> {
    if char_len(value) > MAX_PLACEHOLDER_LEN {
        return Err(format!(
            "Placeholder must be {MAX_PLACEHOLDER_LEN} characters or less"
        ));
    }
    Ok(())
}

pub fn validate_bot_name(value: &str) -> Result<(), String> {
    if char_len(value) > MAX_BOT_NAME_LEN {
        return Err(format!("Bot name must be {MAX_BOT_NAME_LEN} characters or less"));
    }
    Ok(())
}

/// Empty means "no avatar"; anything else must be an absolute http(s) URL.
pub fn validate_bot_avatar(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err("Please enter a valid URL".to_string()),
    }
}

pub fn validate_trigger_delay(enabled: bool, delay: u32) -> Result<(), String> {
    if enabled && !(MIN_TRIGGER_DELAY..=MAX_TRIGGER_DELAY).contains(&delay) {
        return Err(format!(
            "Delay must be between {MIN_TRIGGER_DELAY} and {MAX_TRIGGER_DELAY} seconds"
        ));
    }
    Ok(())
}

pub fn validate_trigger_message(enabled: bool, message: &str) -> Result<(), String> {
    if enabled && char_len(message) > MAX_TRIGGER_MESSAGE_LEN {
        return Err(format!(
            "Trigger message must be {MAX_TRIGGER_MESSAGE_LEN} characters or less"
        ));
    }
    Ok(())
}

fn validate_range(label: &str, value: u32, min: u32, max: u32) -> Result<(), String> {
    if !(min..=max).contains(&value) {
        return Err(format!("{label} must be between {min} and {max} pixels"));
    }
    Ok(())
}

/// Validates one field of `config` with keystroke-level strictness.
pub fn validate_field(field: ConfigField, config: &WidgetConfig) -> Result<(), String> {
    match field {
        ConfigField::WidgetName => validate_widget_name(&config.widget_name),
        ConfigField::PrimaryColor => validate_primary_color(&config.primary_color),
        ConfigField::WelcomeMessage => validate_welcome_message(&config.welcome_message),
        ConfigField::Placeholder => validate_placeholder(&config.placeholder),
        ConfigField::BotName => validate_bot_name(&config.bot_name),
        ConfigField::BotAvatar => validate_bot_avatar(&config.bot_avatar),
        ConfigField::WidgetWidth => validate_range(
            "Width",
            config.widget_width,
            MIN_WIDGET_WIDTH,
            MAX_WIDGET_WIDTH,
        ),
        ConfigField::WidgetHeight => validate_range(
            "Height",
            config.widget_height,
            MIN_WIDGET_HEIGHT,
            MAX_WIDGET_HEIGHT,
        ),
        ConfigField::AutoTriggerDelay => {
            validate_trigger_delay(config.auto_trigger.enabled, config.auto_trigger.delay)
        }
        ConfigField::AutoTriggerMessage => {
            validate_trigger_message(config.auto_trigger.enabled, &config.auto_trigger.message)
        }
        // Enumerations and booleans cannot hold an invalid value.
        ConfigField::SelectedTemplate
        | ConfigField::WidgetPosition
        | ConfigField::AutoOpen
        | ConfigField::WidgetTheme
        | ConfigField::AutoTriggerEnabled => Ok(()),
    }
}

/// Runs [`validate_field`] over every field.
pub fn validate_fields(config: &WidgetConfig) -> ValidationErrors {
    ConfigField::iter()
        .filter_map(|field| validate_field(field, config).err().map(|msg| (field, msg)))
        .collect()
}

/// Save-level validation: every field rule plus the required fields.
pub fn validate_all(config: &WidgetConfig) -> ValidationErrors {
    let mut errors = validate_fields(config);

    if config.widget_name.is_empty() {
        errors.insert(ConfigField::WidgetName, "Widget name is required");
    }
    if config.primary_color.is_empty() {
        errors.insert(ConfigField::PrimaryColor, "Primary color is required");
    }
    if config.welcome_message.is_empty() {
        errors.insert(ConfigField::WelcomeMessage, "Welcome message is required");
    }

    errors
}
