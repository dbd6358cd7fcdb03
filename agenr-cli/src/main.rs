//! `agenr` CLI binary: `db reset`,
//! `consolidate --rules-only`, and the review-queue commands. Grounded in
//! `vestige-mcp/src/bin/cli.rs`'s `clap` derive shape and `colored`
//! emphasis, with per-command exit codes mapped explicitly rather than
//! that binary's blanket `anyhow::Result` passthrough.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;

use agenr_consolidation::{consolidate_rules, ConsolidateOptions};
use agenr_core::config::AgenrConfig;
use agenr_core::models::ReviewStatus;
use agenr_core::traits::EntryStore;
use agenr_lifecycle::Lifecycle;
use agenr_storage::StorageEngine;

#[derive(Parser)]
#[command(name = "agenr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for the agenr memory engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Raise log verbosity for this invocation
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Run rules-based consolidation
    Consolidate {
        /// Only recognized mode; accepted for forward-compatible parsing
        #[arg(long)]
        rules_only: bool,
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },
    /// List, dismiss, or retire review-queue items
    Review {
        #[command(subcommand)]
        action: Option<ReviewCommand>,
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Drop and recreate the schema after a backup
    Reset {
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(long)]
        confirm_reset: bool,
    },
}

#[derive(Subcommand)]
enum ReviewCommand {
    Dismiss { id: i64 },
    Retire { id: i64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    agenr_core::tracing_setup::init_tracing(cli.verbose);
    let _ = Lifecycle::install();

    let result = match cli.command {
        Commands::Db { action: DbAction::Reset { db, confirm_reset } } => run_db_reset(db, confirm_reset),
        Commands::Consolidate { db, dry_run, json, .. } => run_consolidate(db, dry_run, cli.verbose, json),
        Commands::Review { action: None, db, limit } => run_review_list(db, limit),
        Commands::Review { action: Some(ReviewCommand::Dismiss { id }), db, .. } => run_review_dismiss(db, id),
        Commands::Review { action: Some(ReviewCommand::Retire { id }), db, .. } => run_review_retire(db, id),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn resolve_db_path(db: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match db {
        Some(p) => Ok(p),
        None => {
            let config = AgenrConfig::load(None)?;
            Ok(PathBuf::from(config.db.path))
        }
    }
}

fn run_db_reset(db: Option<PathBuf>, confirm_reset: bool) -> anyhow::Result<()> {
    let db_path = resolve_db_path(db)?;
    println!("{}", "=== agenr db reset ===".cyan().bold());

    if !confirm_reset {
        println!();
        println!("Dry run — no changes made. Re-run with --confirm-reset to apply:");
        println!("  1. back up {} to a timestamped sibling file", db_path.display());
        println!("  2. drop and recreate the schema");
        println!("  3. remove the lockfile next to the database (if present)");
        return Ok(());
    }

    let dir = db_path.parent().map(|p| p.to_path_buf()).unwrap_or_else(|| PathBuf::from("."));
    let _lock = agenr_storage::lock::acquire_db_lock(&dir)?;

    let backup_path = agenr_storage::backup::backup_db(&db_path)?;
    println!("backed up to {}", backup_path.display());

    let conn = rusqlite::Connection::open(&db_path)?;
    agenr_storage::backup::reset_db(&conn)?;
    drop(conn);

    agenr_storage::lock::release_db_lock(&dir)?;

    println!("{}", "database reset complete".green().bold());
    Ok(())
}

fn run_consolidate(db: Option<PathBuf>, dry_run: bool, verbose: bool, json: bool) -> anyhow::Result<()> {
    let db_path = resolve_db_path(db)?;
    let config = AgenrConfig::load(None)?;
    let store = StorageEngine::open(&db_path)?;

    let options = ConsolidateOptions {
        dry_run,
        verbose,
        base_ttl_days: config.consolidation.temporary_base_ttl_days,
    };
    let stats = consolidate_rules(&store, &db_path, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "=== agenr consolidate ===".cyan().bold());
    println!("{}: {}", "mode".white().bold(), if dry_run { "dry-run" } else { "applied" });
    if let Some(ref path) = stats.backup_path {
        println!("{}: {}", "backup".white().bold(), path.display());
    }
    println!("{}: {}", "expired".white().bold(), stats.expired_count);
    println!("{}: {}", "merged".white().bold(), stats.merged_count);
    println!("{}: {}", "orphaned relations cleaned".white().bold(), stats.orphaned_relations_cleaned);
    println!("{}: {} -> {}", "entries".white().bold(), stats.entries_before, stats.entries_after);

    Ok(())
}

fn format_age(created_at: chrono::DateTime<Utc>) -> String {
    let age = Utc::now() - created_at;
    if age.num_hours() < 1 {
        "<1h".to_string()
    } else if age.num_days() < 1 {
        format!("{}h", age.num_hours())
    } else {
        format!("{}d", age.num_days())
    }
}

fn run_review_list(db: Option<PathBuf>, limit: usize) -> anyhow::Result<()> {
    let db_path = resolve_db_path(db)?;
    let store = StorageEngine::open(&db_path)?;
    let items = store.list_review_items(Some(ReviewStatus::Pending), limit)?;

    println!(
        "{:<6} {:<36} {:<14} {:<30} {:<8} {:<5}",
        "id".white().bold(),
        "entry".white().bold(),
        "reason".white().bold(),
        "detail".white().bold(),
        "action".white().bold(),
        "age".white().bold()
    );
    for item in &items {
        println!(
            "{:<6} {:<36} {:<14} {:<30} {:<8} {:<5}",
            item.id,
            item.entry_id,
            item.reason,
            truncate(&item.detail, 30),
            item.suggested_action.as_str(),
            format_age(item.created_at)
        );
    }

    Ok(())
}

fn run_review_dismiss(db: Option<PathBuf>, id: i64) -> anyhow::Result<()> {
    let db_path = resolve_db_path(db)?;
    let store = StorageEngine::open(&db_path)?;

    let item = store
        .get_review_item(id)?
        .ok_or_else(|| anyhow::anyhow!("no review item with id {id}"))?;
    if item.status != ReviewStatus::Pending {
        anyhow::bail!("review item {id} is already resolved");
    }

    if !store.resolve_review(id, ReviewStatus::Dismissed)? {
        anyhow::bail!("failed to dismiss review item {id}");
    }
    store.rehabilitate_entry(&item.entry_id)?;

    println!("{} review item {id} dismissed, entry rehabilitated", "ok:".green().bold());
    Ok(())
}

fn run_review_retire(db: Option<PathBuf>, id: i64) -> anyhow::Result<()> {
    let db_path = resolve_db_path(db)?;
    let store = StorageEngine::open(&db_path)?;

    let item = store
        .get_review_item(id)?
        .ok_or_else(|| anyhow::anyhow!("no review item with id {id}"))?;
    if item.status != ReviewStatus::Pending {
        anyhow::bail!("review item {id} is already resolved");
    }

    let reason = format!("review_queue:{id}:{}", item.reason);
    store.retire_entries(Some(&item.entry_id), None, &reason)?;
    if !store.resolve_review(id, ReviewStatus::Resolved)? {
        anyhow::bail!("failed to resolve review item {id}");
    }

    println!("{} entry {} retired via review item {id}", "ok:".green().bold(), item.entry_id);
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}
