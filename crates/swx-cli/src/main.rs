use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::fs;

use swx_engine::{run_audit, AuditReport, PublishedCodes};

#[derive(Parser)]
#[command(name = "swx")]
#[command(about = "StageWatch live-venue audit CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one audit pass over a feed snapshot
    Audit {
        /// Config paths in merge order (base -> event -> overrides)
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Live feed snapshot (JSON array of venue records)
        #[arg(long)]
        snapshot: String,

        /// Published-results text file (one record per line); omit when the
        /// results feed is unavailable
        #[arg(long)]
        codes: Option<String>,

        /// Print the full report as JSON instead of the human overview
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Override "now" (%Y-%m-%d %H:%M:%S) for reproducible runs
        #[arg(long)]
        now: Option<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Audit {
            config_paths,
            snapshot,
            codes,
            json,
            now,
        } => cmd_audit(&config_paths, &snapshot, codes.as_deref(), json, now.as_deref()),
        Commands::ConfigHash { paths } => cmd_config_hash(&paths),
    }
}

fn cmd_audit(
    config_paths: &[String],
    snapshot_path: &str,
    codes_path: Option<&str>,
    json: bool,
    now_override: Option<&str>,
) -> Result<()> {
    let loaded = swx_config::load_layered_yaml(config_paths)?;
    let schedule = loaded.config.build_schedule();

    // Capture "now" exactly once; every rule in the pass sees this clock.
    let now = match now_override {
        Some(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .with_context(|| format!("invalid --now value: {s}"))?,
        None => Local::now().naive_local(),
    };

    // An unreadable snapshot document is the upstream-unavailable case: the
    // engine gets an empty venue list and marks the report no-data.
    let snapshots = match fs::read_to_string(snapshot_path) {
        Ok(raw) => match swx_feed::parse_snapshot_json(&raw) {
            Ok(records) => swx_feed::normalize_records(&records, now),
            Err(err) => {
                tracing::warn!(%err, path = %snapshot_path, "snapshot unreadable, auditing as no-data");
                Vec::new()
            }
        },
        Err(err) => {
            tracing::warn!(%err, path = %snapshot_path, "snapshot missing, auditing as no-data");
            Vec::new()
        }
    };

    let published = match codes_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read codes file: {path}"))?;
            swx_feed::parse_published_codes(&raw)
        }
        None => PublishedCodes::new(),
    };

    let report = run_audit(
        &loaded.config.thresholds,
        &schedule,
        &snapshots,
        &published,
        now,
    );
    tracing::info!(
        config_hash = %loaded.config_hash,
        venues = report.summary.total_venues,
        flagged = report.venues.len(),
        "audit pass complete"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_overview(&report);
    }
    Ok(())
}

fn cmd_config_hash(paths: &[String]) -> Result<()> {
    let loaded = swx_config::load_layered_yaml(paths)?;
    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);
    Ok(())
}

/// Render the report for a terminal. Presentation only; all severities and
/// numbers come straight from the engine.
fn print_overview(report: &AuditReport) {
    println!(
        "stagewatch overview | generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    if !report.data_available {
        println!("no data available (upstream feed empty or unreadable)");
        return;
    }

    let s = &report.summary;
    println!(
        "venues: {} | live: {} | inactive: {} | finished: {}",
        s.total_venues, s.live, s.inactive, s.finished
    );
    println!(
        "progress: {} / {} ({}%)",
        s.participants_completed, s.participants_total, s.progress_pct
    );
    if let Some(last) = &report.last_to_finish {
        println!(
            "last to finish: {} at {} ({})",
            last.venue,
            last.tentative_finish.format("%H:%M"),
            last.item
        );
    }
    if s.live_behind_schedule > 0 {
        println!("behind schedule: {} live venue(s)", s.live_behind_schedule);
    }

    if report.venues.is_empty() {
        println!("no anomalies found");
        return;
    }

    println!("flagged venues: {}", report.venues.len());
    for group in &report.venues {
        println!(
            "  {} ({}) pending={}",
            group.venue, group.location, group.pending
        );
        for a in &group.anomalies {
            println!("    [{}] {}: {}", a.severity.as_str(), a.kind.as_str(), a.message);
        }
    }
}
