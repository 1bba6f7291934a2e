//! Widget configuration domain model.
//!
//! `WidgetConfig` is the editable entity behind the widget builder. It
//! serializes with camelCase keys so it can be sent to the backend as-is.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Slider bounds for the widget width, in pixels.
pub const MIN_WIDGET_WIDTH: u32 = 250;
pub const MAX_WIDGET_WIDTH: u32 = 450;

/// Slider bounds for the widget height, in pixels.
pub const MIN_WIDGET_HEIGHT: u32 = 400;
pub const MAX_WIDGET_HEIGHT: u32 = 600;

/// Bounds for the auto-trigger delay, in seconds.
pub const MIN_TRIGGER_DELAY: u32 = 1;
pub const MAX_TRIGGER_DELAY: u32 = 60;

/// Visual template the widget is built from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WidgetTemplate {
    #[default]
    Default,
    Minimal,
    Modern,
    Enterprise,
}

impl WidgetTemplate {
    /// Human-readable label shown in the template picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Minimal => "Minimal",
            Self::Modern => "Modern",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Accent color applied when the template is picked.
    pub fn preset_color(&self) -> &'static str {
        match self {
            Self::Default => "#3B82F6",
            Self::Minimal => "#6B7280",
            Self::Modern => "#8B5CF6",
            Self::Enterprise => "#1E3A8A",
        }
    }

    /// Theme applied when the template is picked.
    pub fn preset_theme(&self) -> WidgetTheme {
        match self {
            Self::Enterprise => WidgetTheme::Dark,
            _ => WidgetTheme::Light,
        }
    }
}

/// Screen corner the launcher is anchored to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl WidgetPosition {
    /// CSS offsets for a fixed-position container in this corner.
    pub fn css_offsets(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom:20px;right:20px;",
            Self::BottomLeft => "bottom:20px;left:20px;",
            Self::TopRight => "top:20px;right:20px;",
            Self::TopLeft => "top:20px;left:20px;",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WidgetTheme {
    #[default]
    Light,
    Dark,
}

/// Proactive greeting shown after the visitor has been idle on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoTrigger {
    pub enabled: bool,
    /// Seconds before the greeting fires
    pub delay: u32,
    pub message: String,
}

impl Default for AutoTrigger {
    fn default() -> Self {
        Self {
            enabled: false,
            delay: 5,
            message: "Need any help?".to_string(),
        }
    }
}

/// The editable widget configuration.
///
/// Values are stored exactly as typed; whether they are acceptable is
/// decided by [`crate::widget::validation`], never by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub widget_name: String,
    pub selected_template: WidgetTemplate,
    /// `#RRGGBB`
    pub primary_color: String,
    pub widget_position: WidgetPosition,
    pub welcome_message: String,
    pub placeholder: String,
    pub bot_name: String,
    /// Empty when no avatar is configured
    pub bot_avatar: String,
    pub auto_open: bool,
    pub widget_theme: WidgetTheme,
    pub widget_width: u32,
    pub widget_height: u32,
    pub auto_trigger: AutoTrigger,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            widget_name: "My Chat Widget".to_string(),
            selected_template: WidgetTemplate::Default,
            primary_color: WidgetTemplate::Default.preset_color().to_string(),
            widget_position: WidgetPosition::BottomRight,
            welcome_message: "Hi! How can I help you today?".to_string(),
            placeholder: "Type your message...".to_string(),
            bot_name: "Assistant".to_string(),
            bot_avatar: String::new(),
            auto_open: false,
            widget_theme: WidgetTheme::Light,
            widget_width: 350,
            widget_height: 500,
            auto_trigger: AutoTrigger::default(),
        }
    }
}

impl WidgetConfig {
    /// Fields whose value differs between `self` and `other`.
    pub fn diff(&self, other: &WidgetConfig) -> Vec<ConfigField> {
        let checks = [
            (ConfigField::WidgetName, self.widget_name != other.widget_name),
            (ConfigField::SelectedTemplate, self.selected_template != other.selected_template),
            (ConfigField::PrimaryColor, self.primary_color != other.primary_color),
            (ConfigField::WidgetPosition, self.widget_position != other.widget_position),
            (ConfigField::WelcomeMessage, self.welcome_message != other.welcome_message),
            (ConfigField::Placeholder, self.placeholder != other.placeholder),
            (ConfigField::BotName, self.bot_name != other.bot_name),
            (ConfigField::BotAvatar, self.bot_avatar != other.bot_avatar),
            (ConfigField::AutoOpen, self.auto_open != other.auto_open),
            (ConfigField::WidgetTheme, self.widget_theme != other.widget_theme),
            (ConfigField::WidgetWidth, self.widget_width != other.widget_width),
            (ConfigField::WidgetHeight, self.widget_height != other.widget_height),
            (
                ConfigField::AutoTriggerEnabled,
                self.auto_trigger.enabled != other.auto_trigger.enabled,
            ),
            (
                ConfigField::AutoTriggerDelay,
                self.auto_trigger.delay != other.auto_trigger.delay,
            ),
            (
                ConfigField::AutoTriggerMessage,
                self.auto_trigger.message != other.auto_trigger.message,
            ),
        ];
        checks
            .into_iter()
            .filter_map(|(field, differs)| differs.then_some(field))
            .collect()
    }
}

/// Every individually addressable configuration field.
///
/// `Display` and serde both use the wire key, so a `ConfigField` can key
/// error maps that are sent to or received from the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum ConfigField {
    #[serde(rename = "widgetName")]
    #[strum(serialize = "widgetName")]
    WidgetName,
    #[serde(rename = "selectedTemplate")]
    #[strum(serialize = "selectedTemplate")]
    SelectedTemplate,
    #[serde(rename = "primaryColor")]
    #[strum(serialize = "primaryColor")]
    PrimaryColor,
    #[serde(rename = "widgetPosition")]
    #[strum(serialize = "widgetPosition")]
    WidgetPosition,
    #[serde(rename = "welcomeMessage")]
    #[strum(serialize = "welcomeMessage")]
    WelcomeMessage,
    #[serde(rename = "placeholder")]
    #[strum(serialize = "placeholder")]
    Placeholder,
    #[serde(rename = "botName")]
    #[strum(serialize = "botName")]
    BotName,
    #[serde(rename = "botAvatar")]
    #[strum(serialize = "botAvatar")]
    BotAvatar,
    #[serde(rename = "autoOpen")]
    #[strum(serialize = "autoOpen")]
    AutoOpen,
    #[serde(rename = "widgetTheme")]
    #[strum(serialize = "widgetTheme")]
    WidgetTheme,
    #[serde(rename = "widgetWidth")]
    #[strum(serialize = "widgetWidth")]
    WidgetWidth,
    #[serde(rename = "widgetHeight")]
    #[strum(serialize = "widgetHeight")]
    WidgetHeight,
    #[serde(rename = "autoTrigger.enabled")]
    #[strum(serialize = "autoTrigger.enabled")]
    AutoTriggerEnabled,
    #[serde(rename = "autoTrigger.delay")]
    #[strum(serialize = "autoTrigger.delay")]
    AutoTriggerDelay,
    #[serde(rename = "autoTrigger.message")]
    #[strum(serialize = "autoTrigger.message")]
    AutoTriggerMessage,
}

impl ConfigField {
    /// Resolves a field key reported by the backend.
    ///
    /// Accepts the camelCase wire key as well as the snake_case spelling
    /// (`auto_trigger.delay`, `widget_name`) server frameworks tend to emit.
    /// Keys from the save body shape (`name`, `config.primaryColor`) resolve
    /// to the same fields.
    pub fn from_wire_key(key: &str) -> Option<Self> {
        let key = key.strip_prefix("config.").unwrap_or(key);
        if key == "name" {
            return Some(Self::WidgetName);
        }
        let normalized: String = key
            .split('.')
            .map(snake_to_camel)
            .collect::<Vec<_>>()
            .join(".");
        Self::iter().find(|field| field.to_string() == normalized)
    }

    /// Fields whose validity depends on this one and must be re-checked
    /// together with it.
    pub fn dependents(&self) -> &'static [ConfigField] {
        match self {
            Self::AutoTriggerEnabled => &[Self::AutoTriggerDelay, Self::AutoTriggerMessage],
            _ => &[],
        }
    }
}

fn snake_to_camel(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper = false;
    for ch in segment.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_config_is_within_bounds() {
        let config = WidgetConfig::default();
        assert!((MIN_WIDGET_WIDTH..=MAX_WIDGET_WIDTH).contains(&config.widget_width));
        assert!((MIN_WIDGET_HEIGHT..=MAX_WIDGET_HEIGHT).contains(&config.widget_height));
        assert_eq!(config.primary_color, "#3B82F6");
        assert!(!config.auto_trigger.enabled);
    }

    #[test]
    fn test_config_serializes_with_wire_keys() {
        let json = serde_json::to_value(WidgetConfig::default()).unwrap();
        assert_eq!(json["widgetName"], "My Chat Widget");
        assert_eq!(json["widgetPosition"], "bottom-right");
        assert_eq!(json["selectedTemplate"], "default");
        assert_eq!(json["autoTrigger"]["delay"], 5);
    }

    #[test]
    fn test_partial_payload_fills_defaults() {
        let config: WidgetConfig =
            serde_json::from_str(r##"{"widgetName":"Support","primaryColor":"#000000"}"##).unwrap();
        assert_eq!(config.widget_name, "Support");
        assert_eq!(config.primary_color, "#000000");
        assert_eq!(config.widget_height, 500);
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let result = serde_json::from_str::<WidgetConfig>(r#"{"selectedTemplate":"retro"}"#);
        assert!(result.is_err());
        assert!(WidgetTemplate::from_str("retro").is_err());
        assert_eq!(WidgetTemplate::from_str("modern").unwrap(), WidgetTemplate::Modern);
    }

    #[test]
    fn test_field_wire_keys() {
        assert_eq!(ConfigField::AutoTriggerDelay.to_string(), "autoTrigger.delay");
        assert_eq!(
            ConfigField::from_wire_key("auto_trigger.delay"),
            Some(ConfigField::AutoTriggerDelay)
        );
        assert_eq!(
            ConfigField::from_wire_key("widgetName"),
            Some(ConfigField::WidgetName)
        );
        assert_eq!(ConfigField::from_wire_key("embed_code"), None);
    }

    #[test]
    fn test_field_keys_from_save_body() {
        assert_eq!(ConfigField::from_wire_key("name"), Some(ConfigField::WidgetName));
        assert_eq!(
            ConfigField::from_wire_key("config.widgetName"),
            Some(ConfigField::WidgetName)
        );
        assert_eq!(
            ConfigField::from_wire_key("config.primary_color"),
            Some(ConfigField::PrimaryColor)
        );
        assert_eq!(
            ConfigField::from_wire_key("config.auto_trigger.delay"),
            Some(ConfigField::AutoTriggerDelay)
        );
        assert_eq!(ConfigField::from_wire_key("config"), None);
    }

    #[test]
    fn test_diff_lists_changed_fields() {
        let base = WidgetConfig::default();
        let mut other = base.clone();
        other.bot_name = "Ava".to_string();
        other.auto_trigger.delay = 9;

        assert_eq!(
            base.diff(&other),
            vec![ConfigField::BotName, ConfigField::AutoTriggerDelay]
        );
        assert!(base.diff(&base).is_empty());
    }

    #[test]
    fn test_enterprise_template_presets_dark_theme() {
        assert_eq!(WidgetTemplate::Enterprise.preset_theme(), WidgetTheme::Dark);
        assert_eq!(WidgetTemplate::Minimal.preset_theme(), WidgetTheme::Light);
    }
}
