use anyhow::Result;
use chainwork_lib::{
    application::services::LiveView,
    init_logging,
    presentation::dto::{
        job_dto::{
            ApplyForJobRequest, EditJobRequest, ExploreJobsRequest, JobFormRequest,
            ListApplicationsRequest, ReviewDecisionRequest,
        },
        profile_dto::{GetProfileRequest, UpdateProfileRequest},
        work_dto::{FeedbackRequest, SubmitWorkRequest, SubmittedWorkRequest},
        ApiResponse,
    },
    AppConfig, AppError, AppState,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "chainwork")]
#[command(about = "Client for an on-chain freelance job marketplace", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Account to act as (defaults to the wallet's first account)
    #[arg(long, global = true, env = "CHAINWORK_ACCOUNT")]
    account: Option<String>,

    /// Deployed marketplace contract address
    #[arg(long, global = true, env = "CHAINWORK_CONTRACT_ADDRESS")]
    contract: Option<String>,

    /// JSON-RPC endpoint of the wallet provider
    #[arg(long, global = true, env = "CHAINWORK_RPC_URL")]
    rpc_url: Option<String>,

    /// Side-store database URL
    #[arg(long, global = true, env = "CHAINWORK_DATABASE_URL")]
    database_url: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn", env = "LOG_LEVEL")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse, post and edit jobs
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Apply for a job
    Apply {
        job_id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        previous_work_link: String,
        #[arg(long)]
        project_link: String,
    },
    /// List applications to one of your jobs
    Applications {
        job_id: u64,
        /// all, pending, accepted or denied
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Approve (and pay) or deny an application
    Review {
        #[command(subcommand)]
        command: ReviewCommand,
    },
    /// Submit or look up work links
    Work {
        #[command(subcommand)]
        command: WorkCommand,
    },
    /// Jobs you applied to, with their status
    Applied,
    /// Jobs where your application was accepted
    Accepted,
    /// Leave or read feedback for a freelancer
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommand,
    },
    /// Show or edit a profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Account address, balance and chain id
    Account,
    /// Follow submitted work and profile changes until interrupted
    Watch {
        job_id: u64,
        /// Applicant whose submission and profile to follow
        #[arg(long)]
        applicant: Option<String>,
    },
}

#[derive(Subcommand)]
enum JobsCommand {
    /// Open jobs posted by others
    Explore {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Jobs you posted, with the hired freelancer
    Mine,
    Show {
        job_id: u64,
    },
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        short_description: String,
        #[arg(long)]
        detailed_description: String,
        /// Budget in ETH
        #[arg(long)]
        budget: String,
        /// YYYY-MM-DD, RFC 3339 or unix seconds
        #[arg(long)]
        deadline: String,
        #[arg(long)]
        image: String,
        #[arg(long)]
        work_url: String,
    },
    Edit {
        job_id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        short_description: Option<String>,
        #[arg(long)]
        detailed_description: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        work_url: Option<String>,
    },
    /// Jobs in the first contract revision's record shape
    Legacy,
}

#[derive(Subcommand)]
enum ReviewCommand {
    Approve { job_id: u64, application_index: u64 },
    Deny { job_id: u64, application_index: u64 },
}

#[derive(Subcommand)]
enum WorkCommand {
    Submit {
        job_id: u64,
        work_url: String,
        /// Also record the link through the contract
        #[arg(long)]
        on_chain: bool,
    },
    Show {
        job_id: u64,
        #[arg(long)]
        applicant: Option<String>,
    },
}

#[derive(Subcommand)]
enum FeedbackCommand {
    Submit {
        job_id: u64,
        application_index: u64,
        #[arg(long)]
        text: String,
        /// 1 to 5
        #[arg(long)]
        rating: u8,
    },
    Show {
        job_id: u64,
        #[arg(long)]
        applicant: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show {
        address: Option<String>,
    },
    /// Set fields by their stored name, e.g. `--field name=Ada --field skills=rust`
    Set {
        #[arg(long = "field", value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got {raw}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = AppConfig::from_env();
    if let Some(contract) = cli.contract.clone() {
        config.chain.contract_address = contract.trim().to_string();
    }
    if let Some(rpc_url) = cli.rpc_url.clone() {
        config.chain.rpc_url = Some(rpc_url);
    }
    if let Some(database_url) = cli.database_url.clone() {
        config.storage.database_url = database_url;
    }
    if cli.account.is_some() {
        config.chain.account = cli.account.clone();
    }

    let state = AppState::new(config).await?;
    let ok = run(&state, cli).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(state: &AppState, cli: Cli) -> Result<bool> {
    let account = cli.account.as_deref();
    let jobs = &state.job_handler;
    let work = &state.work_handler;
    let profiles = &state.profile_handler;

    let ok = match cli.command {
        Commands::Jobs { command } => match command {
            JobsCommand::Explore { limit } => emit(
                jobs.explore_jobs(ExploreJobsRequest {
                    account: cli.account.clone(),
                    limit,
                })
                .await,
            ),
            JobsCommand::Mine => emit(jobs.client_jobs(account).await),
            JobsCommand::Show { job_id } => emit(jobs.job_detail(job_id, account).await),
            JobsCommand::Post {
                title,
                short_description,
                detailed_description,
                budget,
                deadline,
                image,
                work_url,
            } => emit(
                jobs.post_job(
                    account,
                    JobFormRequest {
                        title,
                        short_description,
                        detailed_description,
                        budget,
                        deadline,
                        image,
                        work_url,
                    },
                )
                .await,
            ),
            JobsCommand::Edit {
                job_id,
                title,
                short_description,
                detailed_description,
                budget,
                deadline,
                image,
                work_url,
            } => emit(
                jobs.edit_job(
                    account,
                    EditJobRequest {
                        job_id,
                        title,
                        short_description,
                        detailed_description,
                        budget,
                        deadline,
                        image,
                        work_url,
                    },
                )
                .await,
            ),
            JobsCommand::Legacy => emit(jobs.legacy_jobs().await),
        },
        Commands::Apply {
            job_id,
            name,
            previous_work_link,
            project_link,
        } => emit(
            jobs.apply_for_job(
                account,
                ApplyForJobRequest {
                    job_id,
                    name,
                    previous_work_link,
                    project_link,
                },
            )
            .await,
        ),
        Commands::Applications { job_id, filter } => emit(
            jobs.list_applications(ListApplicationsRequest {
                job_id,
                filter: Some(filter),
            })
            .await,
        ),
        Commands::Review { command } => match command {
            ReviewCommand::Approve {
                job_id,
                application_index,
            } => emit(
                jobs.approve_application(
                    account,
                    ReviewDecisionRequest {
                        job_id,
                        application_index,
                    },
                )
                .await,
            ),
            ReviewCommand::Deny {
                job_id,
                application_index,
            } => emit(
                jobs.deny_application(
                    account,
                    ReviewDecisionRequest {
                        job_id,
                        application_index,
                    },
                )
                .await,
            ),
        },
        Commands::Work { command } => match command {
            WorkCommand::Submit {
                job_id,
                work_url,
                on_chain,
            } => emit(
                work.submit_work(
                    account,
                    SubmitWorkRequest {
                        job_id,
                        work_url,
                        on_chain,
                    },
                )
                .await,
            ),
            WorkCommand::Show { job_id, applicant } => emit(
                work.submitted_work(SubmittedWorkRequest {
                    job_id,
                    applicant: applicant.or_else(|| cli.account.clone()),
                })
                .await,
            ),
        },
        Commands::Applied => emit(jobs.applied_jobs(account).await),
        Commands::Accepted => emit(jobs.accepted_jobs(account).await),
        Commands::Feedback { command } => match command {
            FeedbackCommand::Submit {
                job_id,
                application_index,
                text,
                rating,
            } => emit(
                work.submit_feedback(
                    account,
                    FeedbackRequest {
                        job_id,
                        application_index,
                        feedback: text,
                        rating,
                    },
                )
                .await,
            ),
            FeedbackCommand::Show { job_id, applicant } => emit(
                work.feedback(job_id, applicant.as_deref().or(account))
                    .await,
            ),
        },
        Commands::Profile { command } => match command {
            ProfileCommand::Show { address } => emit(
                profiles
                    .get_profile(GetProfileRequest {
                        address: address.or_else(|| cli.account.clone()),
                    })
                    .await,
            ),
            ProfileCommand::Set { fields } => emit(
                profiles
                    .update_profile(account, UpdateProfileRequest { fields })
                    .await,
            ),
        },
        Commands::Account => emit(profiles.account(account).await),
        Commands::Watch { job_id, applicant } => {
            watch(state, job_id, applicant.or_else(|| cli.account.clone())).await?;
            true
        }
    };
    Ok(ok)
}

fn emit<T: Serialize>(result: std::result::Result<T, AppError>) -> bool {
    let response = ApiResponse::from_result(result);
    let success = response.success;
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => warn!(error = %err, "Failed to serialize response"),
    }
    success
}

async fn watch(state: &AppState, job_id: u64, applicant: Option<String>) -> Result<()> {
    let _watcher = state.start_storage_watcher().await?;

    let work = state.work_handler.clone();
    let work_applicant = applicant.clone();
    let _work_view = LiveView::submitted_work(&state.bus, state.work_poll_interval(), move || {
        let work = work.clone();
        let applicant = work_applicant.clone();
        async move {
            emit(
                work.submitted_work(SubmittedWorkRequest { job_id, applicant })
                    .await,
            );
        }
    });

    let profiles = state.profile_handler.clone();
    let _profile_view = LiveView::profile(&state.bus, state.profile_poll_interval(), move || {
        let profiles = profiles.clone();
        let address = applicant.clone();
        async move {
            emit(profiles.get_profile(GetProfileRequest { address }).await);
        }
    });

    info!(job_id, "Watching for changes. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Stopping watch");
    Ok(())
}
