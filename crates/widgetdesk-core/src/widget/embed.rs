//! Embed snippet generation.
//!
//! Produces the code a customer pastes into their site: a `<script>` loader,
//! a standalone `<iframe>`, or a React component from the npm package.

use minijinja::{AutoEscape, Environment, context};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::model::WidgetConfig;
use crate::error::{DeskError, Result};

/// Host serving the widget loader when none is configured.
pub const DEFAULT_WIDGET_HOST: &str = "https://widget.chatdesk.io";

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
pub enum EmbedFormat {
    #[default]
    Script,
    Iframe,
    Npm,
}

const SCRIPT_TEMPLATE: &str = r#"<!-- {{ name }} -->
<script>
  window.ChatWidgetConfig = {{ config_json }};
</script>
<script src="{{ host }}/widget.js" data-widget-id="{{ widget_id }}" async></script>"#;

const IFRAME_TEMPLATE: &str = r#"<iframe
  src="{{ host }}/embed/{{ widget_id }}"
  title="{{ bot_name }}"
  width="{{ width }}"
  height="{{ height }}"
  style="border:none;position:fixed;{{ offsets }}z-index:9999;"
  allow="clipboard-write"
></iframe>"#;

const NPM_TEMPLATE: &str = r#"// npm install @chatdesk/react-widget
import { ChatWidget } from '@chatdesk/react-widget';

export default function App() {
  return (
    <ChatWidget
      widgetId="{{ widget_id }}"
      config={ {{ config_json }} }
    />
  );
}"#;

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    // Values are escaped per context by `render_embed`.
    env.set_auto_escape_callback(|_| AutoEscape::None);
    for (name, source) in [
        ("script.html", SCRIPT_TEMPLATE),
        ("iframe.html", IFRAME_TEMPLATE),
        ("npm.jsx", NPM_TEMPLATE),
    ] {
        env.add_template(name, source)
            .map_err(|e| DeskError::internal(format!("invalid embed template {name}: {e}")))?;
    }
    Ok(env)
}

/// Serializes the config for inlining into a page.
///
/// `</` is escaped so a message containing `</script>` cannot close the
/// surrounding tag.
fn inline_json(config: &WidgetConfig) -> Result<String> {
    let json = serde_json::to_string(config)?;
    Ok(json.replace("</", "<\\/"))
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders the embed snippet for `widget_id` in the requested format.
pub fn render_embed(
    format: EmbedFormat,
    widget_id: &str,
    config: &WidgetConfig,
    host: &str,
) -> Result<String> {
    let env = environment()?;
    let host = host.trim_end_matches('/');
    let template_name = match format {
        EmbedFormat::Script => "script.html",
        EmbedFormat::Iframe => "iframe.html",
        EmbedFormat::Npm => "npm.jsx",
    };
    let config_json = inline_json(config)?;
    let template = env
        .get_template(template_name)
        .map_err(|e| DeskError::internal(e.to_string()))?;

    template
        .render(context! {
            name => escape_attr(&config.widget_name.replace("--", "-")),
            host => host,
            widget_id => widget_id,
            bot_name => escape_attr(&config.bot_name),
            width => config.widget_width,
            height => config.widget_height,
            offsets => config.widget_position.css_offsets(),
            config_json => config_json,
        })
        .map_err(|e| DeskError::internal(format!("failed to render {format} embed: {e}")))
}
