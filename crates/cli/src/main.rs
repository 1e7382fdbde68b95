use clap::{Parser, Subcommand, ValueEnum};
use claims_client::HttpClaimsApi;
use claims_core::{
    config::batch_size_from_env_value,
    constants::DEFAULT_API_BASE_URL,
    format_identifier,
    recovery::{ForgotPasswordRequest, ResetPasswordRequest},
    stats::{reimbursement_by_diagnosis, status_slices},
    workflow::{bulk_status, single_status, staged_status},
    ActionStatus, AutofillOutcome, BeneficiaryAutofill, BeneficiaryLookup, ClaimForm, ClaimsApi,
    ClaimsConfig, ClaimsError, ClaimsWorkflow, IdPrefix,
};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "claims")]
#[command(about = "Claims submission CLI")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CLAIMS_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,
    /// Bearer token sent with every request
    #[arg(long, env = "CLAIMS_API_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Claims per bulk request (default 1000)
    #[arg(long, env = "CLAIMS_BULK_BATCH_SIZE")]
    batch_size: Option<String>,
    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum IdKind {
    Claim,
    Bene,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a single claim
    Submit {
        /// Claim identifier (digits are kept, CLM is prefixed)
        #[arg(long)]
        claim_id: String,
        /// Beneficiary identifier (digits are kept, BENE is prefixed)
        #[arg(long)]
        bene_id: String,
        /// Any other field, as FIELD=VALUE (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Look the beneficiary up first and fill in their details
        #[arg(long)]
        autofill: bool,
    },
    /// Upload a CSV file in batches
    Bulk {
        /// CSV file with a header row of claim field names
        path: PathBuf,
    },
    /// Print the canonical JSON for each row of a CSV file without sending anything
    Normalize {
        path: PathBuf,
    },
    /// Look up a beneficiary
    Lookup {
        bene_id: String,
    },
    /// Show how an identifier input is formatted
    FormatId {
        #[arg(value_enum)]
        kind: IdKind,
        input: String,
    },
    /// Show the provider dashboard figures
    ProviderStats,
    /// Show the admin dashboard figures
    AdminStats,
    /// Request a password reset link
    ForgotPassword {
        email: String,
    },
    /// Set a new password with a reset token
    ResetPassword {
        token: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {s:?}"))?;
    let k = k.trim();
    if k.is_empty() {
        return Err("field name cannot be empty".into());
    }
    Ok((k.to_string(), v.to_string()))
}

/// Entry point for the `claims` CLI.
///
/// # Environment Variables
/// - `CLAIMS_API_BASE_URL`: backend base URL (default: "http://localhost:3000/api")
/// - `CLAIMS_API_TOKEN`: bearer token
/// - `CLAIMS_BULK_BATCH_SIZE`: claims per bulk request (default: 1000)
///
/// Every action prints one status line; failures exit with a non-zero code.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("claims=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = ClaimsConfig::new(cli.base_url)?
        .with_auth_token(cli.token)
        .with_batch_size(batch_size_from_env_value(cli.batch_size)?)
        .with_request_timeout(Duration::from_secs(cli.timeout_secs));

    let Some(command) = cli.command else {
        println!("Use 'claims --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    let api = HttpClaimsApi::new(&cfg)?;
    tracing::debug!("using claims backend at {}", api.base_url());
    let status = run(command, api, &cfg).await;
    println!("{status}");

    Ok(if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(command: Commands, api: HttpClaimsApi, cfg: &ClaimsConfig) -> ActionStatus {
    match command {
        Commands::Submit {
            claim_id,
            bene_id,
            fields,
            autofill,
        } => {
            let mut form = ClaimForm::new();
            for (field, value) in fields {
                form.set_field(field, value);
            }
            form.input_claim_id(&claim_id);

            let mut beneficiary = BeneficiaryAutofill::from_config(cfg);
            let ticket = beneficiary.on_bene_input(&mut form, &bene_id);
            if let (true, Some(ticket)) = (autofill, ticket) {
                let outcome = beneficiary.lookup(&api, &mut form, &ticket).await;
                if let Some(line) = beneficiary.status(Instant::now()) {
                    eprintln!("{line}");
                }
                if let AutofillOutcome::Failed(reason) = outcome {
                    tracing::warn!("continuing without autofill: {}", reason);
                }
            }

            let workflow = ClaimsWorkflow::new(api, cfg);
            single_status(&workflow.submit_single(&form.to_raw_record()).await)
        }
        Commands::Bulk { path } => {
            let workflow = ClaimsWorkflow::new(api, cfg);
            let staged = open(&path).and_then(|file| workflow.stage_csv(file, &file_name(&path)));
            let staged_line = staged_status(&staged);
            let Ok(staged) = staged else {
                return staged_line;
            };
            eprintln!("{staged_line}");

            let result = workflow.submit_staged(&staged).await;
            if let Err(ClaimsError::BulkAborted {
                batch_index,
                inserted_before_failure,
                ..
            }) = &result
            {
                eprintln!(
                    "stopped at batch {} of {}; {} documents were inserted before the failure",
                    batch_index + 1,
                    staged.len().div_ceil(cfg.batch_size().get()),
                    inserted_before_failure
                );
            }
            bulk_status(&result)
        }
        Commands::Normalize { path } => {
            let workflow = ClaimsWorkflow::new(api, cfg);
            match open(&path).and_then(|file| workflow.stage_csv(file, &file_name(&path))) {
                Ok(staged) => {
                    for claim in &staged.claims {
                        match serde_json::to_string(claim) {
                            Ok(line) => println!("{line}"),
                            Err(e) => return ActionStatus::Failure(e.to_string()),
                        }
                    }
                    ActionStatus::success(staged.summary())
                }
                Err(err) => ActionStatus::failure(&err),
            }
        }
        Commands::Lookup { bene_id } => {
            let bene_id = format_identifier(IdPrefix::Beneficiary, &bene_id);
            match api.lookup_beneficiary(&bene_id).await {
                Ok(BeneficiaryLookup::Found(record)) => {
                    let mut form = ClaimForm::new();
                    form.apply_beneficiary(&record);
                    for (field, value) in form.to_raw_record().iter() {
                        if !value.is_empty() {
                            println!("{field}: {value}");
                        }
                    }
                    ActionStatus::success("Beneficiary details loaded")
                }
                Ok(BeneficiaryLookup::NotFound) => {
                    ActionStatus::Failure(format!("Beneficiary {bene_id} not found"))
                }
                Err(err) => ActionStatus::failure(&err),
            }
        }
        Commands::FormatId { kind, input } => {
            let prefix = match kind {
                IdKind::Claim => IdPrefix::Claim,
                IdKind::Bene => IdPrefix::Beneficiary,
            };
            ActionStatus::success(format_identifier(prefix, &input))
        }
        Commands::ProviderStats => match api.provider_stats().await {
            Ok(stats) => {
                println!("Total reimbursed: {:.2}", stats.total_reimbursed);
                println!("Average reimbursed: {:.2}", stats.avg_reimbursed);
                for slice in status_slices(&stats.status_counts) {
                    println!("{}: {}", slice.name, slice.value);
                }
                for (claim, bar) in stats
                    .recent
                    .iter()
                    .zip(reimbursement_by_diagnosis(&stats.recent))
                {
                    println!(
                        "{}  {}  {}  {:.2}  {}",
                        claim.claim_id.as_deref().unwrap_or(""),
                        claim
                            .start_date()
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                        bar.diagnosis,
                        bar.amount,
                        claim.status_label()
                    );
                }
                ActionStatus::success("Provider stats loaded")
            }
            Err(err) => ActionStatus::failure(&err),
        },
        Commands::AdminStats => match api.admin_stats().await {
            Ok(stats) => {
                for slice in status_slices(&stats.status_counts) {
                    println!("{}: {}", slice.name, slice.value);
                }
                for point in &stats.monthly {
                    println!("{}  {}", point.month, point.claims);
                }
                for bar in &stats.reimb_by_diagnosis {
                    println!("{}  {:.2}", bar.diagnosis, bar.amount);
                }
                ActionStatus::success("Admin stats loaded")
            }
            Err(err) => ActionStatus::failure(&err),
        },
        Commands::ForgotPassword { email } => {
            let result = match ForgotPasswordRequest::new(&email) {
                Ok(req) => api.forgot_password(&req).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => ActionStatus::success("A password reset link has been sent to your email."),
                Err(err) => ActionStatus::failure(&err),
            }
        }
        Commands::ResetPassword {
            token,
            new_password,
            confirm_password,
        } => {
            let result = match ResetPasswordRequest::new(&token, &new_password, &confirm_password) {
                Ok(req) => api.reset_password(&req).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => ActionStatus::success("Password has been successfully reset."),
                Err(err) => ActionStatus::failure(&err),
            }
        }
    }
}

fn open(path: &PathBuf) -> Result<File, ClaimsError> {
    File::open(path)
        .map_err(|e| ClaimsError::Parse(format!("CSV error: cannot open {}: {e}", path.display())))
}

fn file_name(path: &PathBuf) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("DiagnosisGroupCode=D=77").unwrap(),
            ("DiagnosisGroupCode".to_string(), "D=77".to_string())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
