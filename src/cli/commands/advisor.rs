use std::sync::Arc;

use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::password::hash_password;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{Advisor, NewAdvisor};
use crate::services::QrService;
use crate::store::AdvisorStore;
use crate::types::Role;

#[derive(Subcommand)]
pub enum AdvisorCommands {
    #[command(about = "Create an advisor account")]
    Add {
        #[arg(long, help = "Display name")]
        name: String,

        #[arg(long, help = "Login email, must be unique")]
        email: String,

        #[arg(long, help = "Initial password")]
        password: String,

        #[arg(long, default_value = "advisor", help = "advisor or manager")]
        role: Role,
    },

    #[command(about = "List advisors with their feedback totals")]
    List,
}

pub async fn create_advisor(
    store: &dyn AdvisorStore,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Advisor> {
    if name.trim().is_empty() || email.trim().is_empty() {
        anyhow::bail!("Name and email are required");
    }
    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let advisor = store
        .create_advisor(NewAdvisor {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            role,
        })
        .await?;

    Ok(advisor)
}

/// Store the new advisor's QR reference and report the URL the QR image must encode
pub async fn enroll_qr(qr: &QrService, advisor: &Advisor) -> anyhow::Result<Value> {
    qr.refresh(advisor).await?;
    Ok(json!({
        "form_url": qr.form_url(advisor.id),
        "qr_code": qr.reference_url(advisor.id),
    }))
}

pub async fn handle(
    cmd: AdvisorCommands,
    store: Arc<dyn AdvisorStore>,
    config: &AppConfig,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AdvisorCommands::Add { name, email, password, role } => {
            let advisor = create_advisor(store.as_ref(), &name, &email, &password, role).await?;
            let qr = QrService::new(store.clone(), config.qr.public_base_url.clone());
            let links = enroll_qr(&qr, &advisor).await?;

            output_success(
                output_format,
                &format!(
                    "Advisor '{}' created with id {}; QR should encode {}",
                    advisor.email,
                    advisor.id,
                    qr.form_url(advisor.id)
                ),
                Some(json!({ "advisor": advisor.summary(), "links": links })),
            )
        }
        AdvisorCommands::List => {
            let advisors = store.list_advisors().await?;
            if advisors.is_empty() {
                return output_empty_collection(output_format, "advisors", "No advisors found");
            }

            let summaries: Vec<_> = advisors.iter().map(Advisor::summary).collect();
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "advisors": summaries }))?);
                }
                OutputFormat::Text => {
                    println!("{:<38} {:<24} {:<30} {:<8} {:>6} {:>6}", "ID", "NAME", "EMAIL", "ROLE", "COUNT", "AVG");
                    println!("{}", "-".repeat(117));
                    for s in &summaries {
                        println!(
                            "{:<38} {:<24} {:<30} {:<8} {:>6} {:>6}",
                            s.id,
                            s.name,
                            s.email,
                            s.role,
                            s.feedback_count,
                            format_rating(s.average_rating)
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
