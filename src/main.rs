use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use refund_engine::approval::{
    apply_decision, get_store_path, pending_records, wallet_balance, wallet_history, Decision,
    DecisionError, DeterminationRecord, DeterminationStore, JsonFileStore,
};
use refund_engine::config::{self, Config};
use refund_engine::course::{load_course, load_scores, validate_weights};
use refund_engine::error::{ApprovalError, WeightError};
use refund_engine::output;
use refund_engine::refund::{resolve_refund, Money};
use refund_engine::scoring::compute_score;

const EXIT_SUCCESS: i32 = 0;
const EXIT_UNAUTHORIZED: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 2;
const EXIT_INVALID_TRANSITION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a course's assignment weights total 100%
    Validate {
        /// Course document (YAML or JSON)
        course: PathBuf,
    },
    /// Compute a student's weighted performance score
    Score {
        /// Course document (YAML or JSON)
        course: PathBuf,
        /// Score document for one student (YAML or JSON)
        scores: PathBuf,
    },
    /// Compute a refund determination and record it
    Determine {
        /// Course document (YAML or JSON)
        course: PathBuf,
        /// Score document for one student (YAML or JSON)
        scores: PathBuf,
        /// Fee the student paid (defaults to the course fee)
        #[arg(long)]
        fee: Option<String>,
        /// Print the determination without recording it
        #[arg(long)]
        dry_run: bool,
    },
    /// List determinations waiting for a reviewer
    Pending,
    /// Show a recorded determination
    Show {
        id: Uuid,
    },
    /// Approve a pending determination
    Approve {
        id: Uuid,
        /// Name of the acting reviewer
        #[arg(long)]
        reviewer: String,
    },
    /// Reject a pending determination
    Reject {
        id: Uuid,
        /// Name of the acting reviewer
        #[arg(long)]
        reviewer: String,
    },
    /// Show a student's approved balance and refund history
    Wallet {
        student: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "refund-engine")]
#[command(about = "Performance-based tuition refund calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/refund-engine/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    refund_engine::logging::init_tracing(cli.verbose);

    let config = match config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<WeightError>().is_some() {
        return EXIT_CONFIG;
    }
    match err.downcast_ref::<DecisionError>() {
        Some(DecisionError::Approval(ApprovalError::Unauthorized { .. })) => EXIT_UNAUTHORIZED,
        Some(DecisionError::Approval(ApprovalError::InvalidStateTransition { .. })) => {
            EXIT_INVALID_TRANSITION
        }
        _ => EXIT_INVALID_INPUT,
    }
}

fn open_store(config: &Config) -> Result<JsonFileStore> {
    let path = match config.store_path {
        Some(ref p) => p.clone(),
        None => get_store_path()?,
    };
    tracing::debug!(path = %path.display(), "using determination store");
    Ok(JsonFileStore::new(path))
}

fn run(command: Commands, config: &Config) -> Result<()> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Validate { course } => {
            let doc = load_course(&course)?;
            let components = doc.components()?;
            validate_weights(&components)?;
            println!(
                "{}: {} components, weights total 100%",
                doc.title,
                components.len()
            );
        }
        Commands::Score { course, scores } => {
            let doc = load_course(&course)?;
            let components = doc.components()?;
            validate_weights(&components)?;
            let entries = load_scores(&scores)?.entries()?;
            let score = compute_score(&components, &entries)?;
            println!("{}", output::format_performance(&score, use_colors));
        }
        Commands::Determine {
            course,
            scores,
            fee,
            dry_run,
        } => {
            let record = determine(&course, &scores, fee.as_deref())?;
            if !dry_run {
                open_store(config)?.insert(record.clone())?;
                tracing::info!(id = %record.id, status = %record.status, "recorded determination");
            }
            println!("{}", output::format_record_detail(&record, use_colors));
        }
        Commands::Pending => {
            let records = open_store(config)?.list()?;
            let pending = pending_records(&records);
            println!("{}", output::format_pending_table(&pending, use_colors));
        }
        Commands::Show { id } => {
            let record = open_store(config)?.get(id)?;
            println!("{}", output::format_record_detail(&record, use_colors));
        }
        Commands::Approve { id, reviewer } => {
            decide(config, id, Decision::Approve, &reviewer, use_colors)?;
        }
        Commands::Reject { id, reviewer } => {
            decide(config, id, Decision::Reject, &reviewer, use_colors)?;
        }
        Commands::Wallet { student } => {
            let records = open_store(config)?.list()?;
            let balance = wallet_balance(&records, &student);
            let history = wallet_history(&records, &student);
            println!("{}", output::format_wallet(&student, balance, use_colors));
            println!("{}", output::format_wallet_history(&history, use_colors));
        }
    }

    Ok(())
}

fn determine(course: &Path, scores: &Path, fee: Option<&str>) -> Result<DeterminationRecord> {
    let course_doc = load_course(course)?;
    let components = course_doc.components()?;
    validate_weights(&components)?;

    let score_doc = load_scores(scores)?;
    if let Some(ref course_id) = score_doc.course_id {
        if course_id != &course_doc.id {
            anyhow::bail!(
                "score document is for course '{}', not '{}'",
                course_id,
                course_doc.id
            );
        }
    }
    let entries = score_doc.entries()?;

    let paid_fee = match fee {
        Some(s) => Money::parse(s)?,
        None => course_doc
            .fee()?
            .with_context(|| format!("course '{}' has no fee; pass --fee", course_doc.id))?,
    };

    let score = compute_score(&components, &entries)?;
    let determination = resolve_refund(&score, paid_fee)?;
    Ok(DeterminationRecord::new(
        score_doc.student_id,
        course_doc.id,
        score,
        determination,
    ))
}

fn decide(
    config: &Config,
    id: Uuid,
    decision: Decision,
    reviewer: &str,
    use_colors: bool,
) -> Result<()> {
    let store = open_store(config)?;
    let actor = config.actor(reviewer);
    let before = store.get(id)?.status;
    let record = apply_decision(&store, id, decision, &actor)?;

    if before.is_terminal() {
        println!("Determination {} was already {}", record.id, record.status);
    }
    println!("{}", output::format_record_detail(&record, use_colors));
    Ok(())
}
