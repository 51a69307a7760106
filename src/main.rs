//! Campaign Browser - Entry Point

use campaign_browser::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    ResolvedConfig,
};
use campaign_browser::listing::{CampaignListingView, HeadlessHost};
use campaign_browser::logging::{self, DEFAULT_FILTER};
use campaign_browser::model::AppError;
use campaign_browser::reactive::MainQueue;
use campaign_browser::report::FrameReport;
use campaign_browser::source::{campaigns_from_feed, load_feed, SimulatedDecoder};
use clap::Parser;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long one run-loop turn waits for background work.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Campaign Browser - lay out a campaign feed with simulated image loading
#[derive(Parser, Debug)]
#[command(name = "campaign-browser")]
#[command(version)]
#[command(about = "Lay out a campaign feed with asynchronously measured row heights")]
pub struct Args {
    /// Path to the JSON campaign feed
    pub feed: PathBuf,

    /// Viewport width in points
    #[arg(long)]
    pub viewport_width: Option<f64>,

    /// Viewport height in points
    #[arg(long)]
    pub viewport_height: Option<f64>,

    /// Stop waiting for images after this many milliseconds
    #[arg(long, default_value = "5000")]
    pub timeout_ms: u64,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config_file = load_config_with_precedence(args.config.clone())?;
    let merged = merge_config(config_file);
    let with_env = apply_env_overrides(merged);
    Ok(apply_cli_overrides(
        with_env,
        args.viewport_width,
        args.viewport_height,
    ))
}

fn run(args: &Args, config: &ResolvedConfig) -> Result<FrameReport, AppError> {
    let queue = MainQueue::new();
    let host = Rc::new(HeadlessHost::new(config.viewport(), Rc::new(config.measurer())));
    let view = CampaignListingView::new(host.clone(), queue.clone(), config.listing_settings());

    let entries = load_feed(&args.feed)?;
    let (campaigns, pending) = campaigns_from_feed(&entries);
    view.display(campaigns.clone());
    let decoder = SimulatedDecoder::start(pending);
    info!(campaigns = campaigns.len(), decodes = decoder.len(), "feed loaded");

    let deadline = Instant::now() + Duration::from_millis(args.timeout_ms);
    loop {
        queue.run_once(POLL_INTERVAL);
        if decoder.is_finished() {
            queue.drain();
            break;
        }
        if Instant::now() >= deadline {
            warn!(timeout_ms = args.timeout_ms, "gave up waiting for images");
            break;
        }
    }

    Ok(FrameReport::collect(&host, &campaigns, |index| {
        view.cached_height(index)
    }))
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    logging::init(&config.log_file_path, DEFAULT_FILTER)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let report = run(&args, &config)?;
    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["campaign-browser", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_feed_is_required() {
        let result = Args::try_parse_from(["campaign-browser"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["campaign-browser", "feed.json"]);
        assert_eq!(args.feed, PathBuf::from("feed.json"));
        assert_eq!(args.viewport_width, None);
        assert_eq!(args.viewport_height, None);
        assert_eq!(args.timeout_ms, 5000);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_viewport_flags() {
        let args = Args::parse_from([
            "campaign-browser",
            "feed.json",
            "--viewport-width",
            "300",
            "--viewport-height",
            "1200.5",
        ]);
        assert_eq!(args.viewport_width, Some(300.0));
        assert_eq!(args.viewport_height, Some(1200.5));
    }

    #[test]
    fn test_viewport_width_rejects_text() {
        let result = Args::try_parse_from(["campaign-browser", "feed.json", "--viewport-width", "wide"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_run_lays_out_feed() {
        // GIVEN a feed with one fast image and one that never loads
        let feed = std::env::temp_dir().join("campaign_browser_main_run_feed.json");
        std::fs::write(
            &feed,
            r#"[
                {"name":"Fast","description":"abc","image":{"width":400,"height":300,"delay_ms":1}},
                {"name":"Never","description":"abc"}
            ]"#,
        )
        .unwrap();
        let args = Args::parse_from(["campaign-browser", feed.to_str().unwrap(), "--timeout-ms", "2000"]);
        let config = ResolvedConfig {
            viewport_width: 300.0,
            viewport_height: 1000.0,
            glyph_width: 10.0,
            line_height: 20.4,
            ..ResolvedConfig::default()
        };

        // WHEN the run loop finishes
        let report = run(&args, &config);
        let _ = std::fs::remove_file(&feed);
        let report = report.unwrap();

        // THEN the first row is sized and the second keeps the default
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].frame.height, 275);
        assert_eq!(report.rows[1].frame.y, 275);
        assert_eq!(report.rows[1].frame.height, 200);
        assert_eq!(report.measured_count(), 1);
    }
}
