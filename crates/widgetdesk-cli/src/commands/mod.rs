pub mod embed;
pub mod remote;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use widgetdesk_core::config::DeskConfig;
use widgetdesk_core::widget::{ValidationErrors, WidgetConfig, WidgetConfigPatch};
use widgetdesk_infrastructure::ConfigService;

/// Loads the console config and applies the command-line overrides on top.
pub fn load_settings(api_url: Option<String>, token: Option<String>) -> Result<DeskConfig> {
    let mut settings = ConfigService::new()
        .get_config()
        .context("Failed to load widgetdesk config")?;
    apply_overrides(&mut settings, api_url, token);
    Ok(settings)
}

fn apply_overrides(settings: &mut DeskConfig, api_url: Option<String>, token: Option<String>) {
    if let Some(url) = api_url {
        settings.api.base_url = url;
    }
    if token.is_some() {
        settings.api.token = token;
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a widget config", path.display()))
}

/// Reads a widget config from a JSON file; missing keys take their defaults.
pub fn read_widget_file(path: &Path) -> Result<WidgetConfig> {
    read_json(path)
}

/// Reads a JSON file as a partial update; only keys present in the file are set.
pub fn read_widget_patch(path: &Path) -> Result<WidgetConfigPatch> {
    read_json(path)
}

pub fn print_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}
