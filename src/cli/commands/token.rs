use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::auth::TokenService;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::store::AdvisorStore;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token for an advisor")]
    Issue {
        #[arg(help = "Advisor email")]
        email: String,
    },
}

/// Token for the advisor with `email`, carrying the role currently stored
pub async fn issue_token(
    store: &dyn AdvisorStore,
    tokens: &TokenService,
    email: &str,
) -> anyhow::Result<String> {
    let advisor = store
        .find_advisor_by_email(email)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Advisor '{}' not found", email))?;

    Ok(tokens.issue(advisor.id, advisor.role)?)
}

pub async fn handle(
    cmd: TokenCommands,
    store: Arc<dyn AdvisorStore>,
    config: &AppConfig,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let tokens = TokenService::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;

    match cmd {
        TokenCommands::Issue { email } => {
            let token = issue_token(store.as_ref(), &tokens, &email).await?;
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("Token issued for {}", email),
                    Some(json!({ "token": token, "expires_in": tokens.expiry_hours() * 3600 })),
                ),
                // Bare token so it can be captured with $(feedbackctl token issue ...)
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
