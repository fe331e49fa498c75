use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::services::QrService;
use crate::store::AdvisorStore;

#[derive(Subcommand)]
pub enum QrCommands {
    #[command(about = "Point every advisor's QR reference at the configured base URL")]
    Refresh {
        #[arg(long, help = "Override QR_PUBLIC_BASE_URL for this run")]
        base_url: Option<String>,
    },
}

pub async fn handle(
    cmd: QrCommands,
    store: Arc<dyn AdvisorStore>,
    config: &AppConfig,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        QrCommands::Refresh { base_url } => {
            let base_url = base_url.unwrap_or_else(|| config.qr.public_base_url.clone());
            url::Url::parse(&base_url)
                .map_err(|e| anyhow::anyhow!("Invalid base URL '{}': {}", base_url, e))?;

            let report = QrService::new(store, base_url).refresh_all().await?;
            output_success(
                output_format,
                &format!("Checked {} advisors, updated {}", report.checked, report.updated),
                Some(json!({ "checked": report.checked, "updated": report.updated })),
            )
        }
    }
}
