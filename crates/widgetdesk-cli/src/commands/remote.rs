//! Commands that edit a widget on the backend through a configuration session.

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use widgetdesk_application::{ConfigurationSession, SessionError, SessionOptions};
use widgetdesk_core::config::DeskConfig;
use widgetdesk_infrastructure::{ApiClient, HttpWidgetGateway};

use super::{print_errors, read_widget_patch};

async fn open_session(settings: &DeskConfig, widget_id: &str) -> Result<ConfigurationSession> {
    let gateway = Arc::new(HttpWidgetGateway::new(ApiClient::from_settings(&settings.api)));
    ConfigurationSession::open(gateway, widget_id, SessionOptions::from(settings))
        .await
        .with_context(|| format!("Failed to open widget {widget_id}"))
}

/// Prints field errors carried by `err` before handing it back.
fn explain(err: SessionError) -> anyhow::Error {
    match &err {
        SessionError::LocalValidation { fields } => {
            eprintln!("❌ Invalid fields:");
            print_errors(fields);
        }
        SessionError::ServerValidation { fields } => {
            eprintln!("❌ The backend rejected these fields:");
            for (field, message) in fields {
                eprintln!("  {field}: {message}");
            }
        }
        _ => {}
    }
    err.into()
}

pub async fn show(settings: &DeskConfig, widget_id: &str) -> Result<()> {
    let session = open_session(settings, widget_id).await?;
    println!("{}", serde_json::to_string_pretty(&session.config())?);

    let errors = session.errors();
    if !errors.is_empty() {
        eprintln!("⚠️  Stored config has {} invalid field(s):", errors.len());
        print_errors(&errors);
    }
    Ok(())
}

pub async fn save(settings: &DeskConfig, widget_id: &str, file: &Path) -> Result<()> {
    let patch = read_widget_patch(file)?;
    let session = open_session(settings, widget_id).await?;

    let changed = session.update_config(patch);
    if changed.is_empty() {
        println!("No changes to save");
        return Ok(());
    }

    session.save_config().await.map_err(explain)?;
    let fields: Vec<String> = changed.iter().map(ToString::to_string).collect();
    println!("✅ Saved widget {widget_id} ({})", fields.join(", "));
    Ok(())
}

pub async fn reset(settings: &DeskConfig, widget_id: &str, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Resetting discards the current config of {widget_id}; pass --yes to confirm");
    }
    let session = open_session(settings, widget_id).await?;
    session.reset_config().await.map_err(explain)?;
    println!("✅ Widget {widget_id} reset to defaults");
    Ok(())
}

pub async fn test(
    settings: &DeskConfig,
    widget_id: &str,
    config_file: Option<&Path>,
) -> Result<()> {
    let session = open_session(settings, widget_id).await?;
    if let Some(path) = config_file {
        session.update_config(read_widget_patch(path)?);
    }

    let report = session.test_config().await.map_err(explain)?;
    let details = report.details.unwrap_or_default();
    if report.passed {
        println!("✅ Test passed {details}");
        Ok(())
    } else {
        bail!("Test failed {details}")
    }
}
