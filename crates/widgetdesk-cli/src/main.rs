use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use widgetdesk_core::widget::EmbedFormat;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "widgetdesk")]
#[command(about = "WidgetDesk CLI - configure and embed chat widgets", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config file and WIDGETDESK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides config file and WIDGETDESK_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Log filter, e.g. `debug` or `widgetdesk_application=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a widget config file without contacting the backend
    Validate {
        /// JSON file holding a widget config
        file: PathBuf,
    },
    /// Print the embed snippet for a widget
    Embed {
        widget_id: String,
        #[arg(long, default_value_t = EmbedFormat::Script)]
        format: EmbedFormat,
        /// Render from a local config file instead of fetching the widget
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the stored config of a widget
    Show { widget_id: String },
    /// Apply a config file to a widget and save it
    Save { widget_id: String, file: PathBuf },
    /// Reset a widget to the default config
    Reset {
        widget_id: String,
        /// Confirm discarding the current config
        #[arg(long)]
        yes: bool,
    },
    /// Dry-run a widget config on the backend
    Test {
        widget_id: String,
        /// Test this config file instead of the stored one
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    let settings = commands::load_settings(cli.api_url, cli.token)?;
    tracing::debug!("[widgetdesk] Using backend {}", settings.api.base_url);

    match cli.command {
        Commands::Validate { file } => commands::validate::run(&file)?,
        Commands::Embed {
            widget_id,
            format,
            config,
        } => commands::embed::run(&settings, &widget_id, format, config.as_deref()).await?,
        Commands::Show { widget_id } => commands::remote::show(&settings, &widget_id).await?,
        Commands::Save { widget_id, file } => {
            commands::remote::save(&settings, &widget_id, &file).await?
        }
        Commands::Reset { widget_id, yes } => {
            commands::remote::reset(&settings, &widget_id, yes).await?
        }
        Commands::Test { widget_id, config } => {
            commands::remote::test(&settings, &widget_id, config.as_deref()).await?
        }
    }

    Ok(())
}
