use anyhow::{Context, Result};
use std::path::Path;
use widgetdesk_core::config::DeskConfig;
use widgetdesk_core::widget::{DEFAULT_WIDGET_HOST, EmbedFormat, WidgetGateway, render_embed};
use widgetdesk_infrastructure::{ApiClient, HttpWidgetGateway};

use super::read_widget_file;

pub async fn run(
    settings: &DeskConfig,
    widget_id: &str,
    format: EmbedFormat,
    config_file: Option<&Path>,
) -> Result<()> {
    let config = match config_file {
        Some(path) => read_widget_file(path)?,
        None => HttpWidgetGateway::new(ApiClient::from_settings(&settings.api))
            .load(widget_id)
            .await
            .with_context(|| format!("Failed to load widget {widget_id}"))?,
    };

    let host = settings
        .api
        .widget_host
        .as_deref()
        .unwrap_or(DEFAULT_WIDGET_HOST);
    println!("{}", render_embed(format, widget_id, &config, host)?);
    Ok(())
}
