//! insight-worker: one insight generation batch for a reference day.
//!
//! Loads the rule set and the measurement file, resolves every account in
//! the file, and delivers the best message per account through the log
//! channel. Configuration comes from the environment (see `rill_core::Config`);
//! flags override it.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing::info;

use rill_core::time::start_of_day;
use rill_core::Config;
use rill_insight::{deliver, validate_messages, BatchRunner, ResolutionContext, Resolver};
use rill_notify::{Dispatcher, LogNotifier, Notifier, TemplateRenderer};
use rill_query::InMemoryDataService;
use rill_rules::RuleSet;

// ── CLI ─────────────────────────────────────────────────────────────

/// Resolve consumption insights for every account and deliver the winners.
#[derive(Parser, Debug)]
#[command(name = "insight-worker", version, about)]
struct Cli {
    /// Reference day (YYYY-MM-DD) in the configured timezone. Defaults to today.
    #[arg(long, env = "INSIGHT_REF_DATE")]
    date: Option<NaiveDate>,

    /// Directory of YAML rule documents (overrides RULES_DIR).
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    /// JSON measurement file (overrides MEASUREMENTS_FILE).
    #[arg(long)]
    measurements: Option<PathBuf>,

    /// IANA timezone (overrides DEFAULT_TIMEZONE).
    #[arg(long)]
    timezone: Option<String>,

    /// Minimum score for a message to be sent (overrides INSIGHT_MIN_SCORE).
    #[arg(long)]
    min_score: Option<f64>,

    /// Print the batch report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.rules_dir {
            config.rules.rules_dir = dir.clone();
        }
        if let Some(path) = &self.measurements {
            config.insight.measurements_file = Some(path.clone());
        }
        if let Some(tz) = &self.timezone {
            config.insight.default_timezone = tz.clone();
        }
        if let Some(score) = self.min_score {
            config.insight.min_score = score;
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rill_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    cli.apply(&mut config);
    config.log_summary();

    let tz = config.insight.timezone()?;
    let rules = RuleSet::from_dir(config.rules.rules_dir.clone())
        .with_context(|| format!("loading rules from {}", config.rules.rules_dir.display()))?;
    let renderer = TemplateRenderer::new();
    validate_messages(&rules.messages, &renderer).context("checking message templates")?;

    let measurements = config
        .insight
        .measurements_file
        .clone()
        .context("no measurement file: set MEASUREMENTS_FILE or pass --measurements")?;
    let data = InMemoryDataService::from_json_file(&measurements)?;
    let accounts = data.accounts();

    let day = cli
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let ref_date = start_of_day(tz, day);
    info!(
        %ref_date,
        accounts = accounts.len(),
        measurements = data.len(),
        "starting insight batch"
    );

    let ctx = ResolutionContext::new(ref_date, &rules.thresholds, &data);
    let mut runner = BatchRunner::new(Resolver::registry(&rules.insight))
        .with_min_score(config.insight.min_score);
    let report = runner.run(&ctx, &accounts);

    let channels: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier::new())];
    let dispatcher = Dispatcher::with_defaults(channels);
    let summary = deliver(&report, &rules.messages, &renderer, &dispatcher).await;

    info!(
        winners = report.winners.len(),
        failures = report.failures.len(),
        delivered = summary.delivered,
        unrendered = summary.unrendered,
        failed_channels = summary.failed_channels,
        "insight batch delivered"
    );

    if cli.json {
        let output = serde_json::json!({
            "config": config.redacted_summary(),
            "ref_date": ref_date.to_rfc3339(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}
