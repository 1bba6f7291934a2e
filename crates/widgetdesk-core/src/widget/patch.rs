//! Partial updates to a [`WidgetConfig`].
//!
//! A patch carries only the fields a control touched. Merging is explicit:
//! the nested `autoTrigger` block is merged field by field, so patching the
//! delay never resets `enabled` or `message`.

use serde::{Deserialize, Serialize};

use super::model::{
    AutoTrigger, ConfigField, MAX_WIDGET_HEIGHT, MAX_WIDGET_WIDTH, MIN_WIDGET_HEIGHT,
    MIN_WIDGET_WIDTH, WidgetConfig, WidgetPosition, WidgetTemplate, WidgetTheme,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTriggerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A partial [`WidgetConfig`]; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_template: Option<WidgetTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_position: Option<WidgetPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_theme: Option<WidgetTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_trigger: Option<AutoTriggerPatch>,
}

/// Assigns `value` into `slot` and records `field` when it actually changed.
fn assign<T: PartialEq>(
    slot: &mut T,
    value: Option<T>,
    field: ConfigField,
    changed: &mut Vec<ConfigField>,
) {
    if let Some(value) = value
        && *slot != value
    {
        *slot = value;
        changed.push(field);
    }
}

impl WidgetConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widget_name(mut self, value: impl Into<String>) -> Self {
        self.widget_name = Some(value.into());
        self
    }

    pub fn selected_template(mut self, value: WidgetTemplate) -> Self {
        self.selected_template = Some(value);
        self
    }

    pub fn primary_color(mut self, value: impl Into<String>) -> Self {
        self.primary_color = Some(value.into());
        self
    }

    pub fn widget_position(mut self, value: WidgetPosition) -> Self {
        self.widget_position = Some(value);
        self
    }

    pub fn welcome_message(mut self, value: impl Into<String>) -> Self {
        self.welcome_message = Some(value.into());
        self
    }

    pub fn placeholder(mut self, value: impl Into<String>) -> Self {
        self.placeholder = Some(value.into());
        self
    }

    pub fn bot_name(mut self, value: impl Into<String>) -> Self {
        self.bot_name = Some(value.into());
        self
    }

    pub fn bot_avatar(mut self, value: impl Into<String>) -> Self {
        self.bot_avatar = Some(value.into());
        self
    }

    pub fn auto_open(mut self, value: bool) -> Self {
        self.auto_open = Some(value);
        self
    }

    pub fn widget_theme(mut self, value: WidgetTheme) -> Self {
        self.widget_theme = Some(value);
        self
    }

    pub fn widget_width(mut self, value: u32) -> Self {
        self.widget_width = Some(value);
        self
    }

    pub fn widget_height(mut self, value: u32) -> Self {
        self.widget_height = Some(value);
        self
    }

    pub fn auto_trigger(mut self, value: AutoTriggerPatch) -> Self {
        self.auto_trigger = Some(value);
        self
    }

    /// Returns true if the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch into `config` and returns the fields whose value changed.
    ///
    /// Width and height are clamped to their slider bounds. Strings are
    /// stored untouched, however long.
    pub fn apply_to(self, config: &mut WidgetConfig) -> Vec<ConfigField> {
        let mut changed = Vec::new();

        assign(&mut config.widget_name, self.widget_name, ConfigField::WidgetName, &mut changed);
        assign(
            &mut config.selected_template,
            self.selected_template,
            ConfigField::SelectedTemplate,
            &mut changed,
        );
        assign(
            &mut config.primary_color,
            self.primary_color,
            ConfigField::PrimaryColor,
            &mut changed,
        );
        assign(
            &mut config.widget_position,
            self.widget_position,
            ConfigField::WidgetPosition,
            &mut changed,
        );
        assign(
            &mut config.welcome_message,
            self.welcome_message,
            ConfigField::WelcomeMessage,
            &mut changed,
        );
        assign(&mut config.placeholder, self.placeholder, ConfigField::Placeholder, &mut changed);
        assign(&mut config.bot_name, self.bot_name, ConfigField::BotName, &mut changed);
        assign(&mut config.bot_avatar, self.bot_avatar, ConfigField::BotAvatar, &mut changed);
        assign(&mut config.auto_open, self.auto_open, ConfigField::AutoOpen, &mut changed);
        assign(&mut config.widget_theme, self.widget_theme, ConfigField::WidgetTheme, &mut changed);
        assign(
            &mut config.widget_width,
            self.widget_width
                .map(|w| w.clamp(MIN_WIDGET_WIDTH, MAX_WIDGET_WIDTH)),
            ConfigField::WidgetWidth,
            &mut changed,
        );
        assign(
            &mut config.widget_height,
            self.widget_height
                .map(|h| h.clamp(MIN_WIDGET_HEIGHT, MAX_WIDGET_HEIGHT)),
            ConfigField::WidgetHeight,
            &mut changed,
        );

        if let Some(trigger) = self.auto_trigger {
            merge_auto_trigger(&mut config.auto_trigger, trigger, &mut changed);
        }

        changed
    }
}

fn merge_auto_trigger(
    target: &mut AutoTrigger,
    patch: AutoTriggerPatch,
    changed: &mut Vec<ConfigField>,
) {
    assign(&mut target.enabled, patch.enabled, ConfigField::AutoTriggerEnabled, changed);
    assign(&mut target.delay, patch.delay, ConfigField::AutoTriggerDelay, changed);
    assign(&mut target.message, patch.message, ConfigField::AutoTriggerMessage, changed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_trigger_merge_keeps_untouched_fields() {
        let mut config = WidgetConfig::default();
        config.auto_trigger.message = "Hello there".to_string();

        let changed = WidgetConfigPatch::new()
            .auto_trigger(AutoTriggerPatch {
                delay: Some(12),
                ..Default::default()
            })
            .apply_to(&mut config);

        assert_eq!(changed, vec![ConfigField::AutoTriggerDelay]);
        assert_eq!(config.auto_trigger.delay, 12);
        assert_eq!(config.auto_trigger.message, "Hello there");
        assert!(!config.auto_trigger.enabled);
    }

    #[test]
    fn test_unchanged_values_are_not_reported() {
        let mut config = WidgetConfig::default();
        let changed = WidgetConfigPatch::new()
            .widget_name(config.widget_name.clone())
            .bot_name("Ava")
            .apply_to(&mut config);

        assert_eq!(changed, vec![ConfigField::BotName]);
    }

    #[test]
    fn test_dimensions_are_clamped_to_slider_bounds() {
        let mut config = WidgetConfig::default();
        WidgetConfigPatch::new()
            .widget_width(1000)
            .widget_height(10)
            .apply_to(&mut config);

        assert_eq!(config.widget_width, MAX_WIDGET_WIDTH);
        assert_eq!(config.widget_height, MIN_WIDGET_HEIGHT);
    }

    #[test]
    fn test_long_strings_are_not_truncated() {
        let mut config = WidgetConfig::default();
        let long = "a".repeat(500);
        WidgetConfigPatch::new()
            .welcome_message(long.clone())
            .apply_to(&mut config);

        assert_eq!(config.welcome_message, long);
    }

    #[test]
    fn test_patch_deserializes_from_partial_json() {
        let patch: WidgetConfigPatch =
            serde_json::from_str(r#"{"autoTrigger":{"enabled":true}}"#).unwrap();
        assert_eq!(patch.auto_trigger.unwrap().enabled, Some(true));
        assert!(patch.widget_name.is_none());
        assert!(WidgetConfigPatch::new().is_empty());
    }
}
