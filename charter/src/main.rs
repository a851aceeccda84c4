use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tile_charter::{
    gap::GapPolicy, lane_assigner::LaneAssignmentStrategy, onsets::OnsetTrack, Charter,
    CharterConfig, GeneratedChart,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lane chart generator for tile rhythm games", long_about = None)]
struct Args {
    /// Analyzer output: JSON with `tempo` (BPM) and `onsets` (seconds)
    #[arg(short = 'i', long)]
    onsets: PathBuf,

    /// Base name of the chart file (defaults to the onset file name)
    #[arg(short, long)]
    base: Option<String>,

    /// Output directory for charts
    #[arg(short, long, default_value = "json")]
    output: PathBuf,

    /// Number of lanes
    #[arg(long, default_value = "4")]
    lanes: u8,

    /// Minimum idle time per lane (half-beat, none, or milliseconds)
    #[arg(long, default_value = "half-beat")]
    min_gap: String,

    /// Lane assignment strategy (constrained, unconstrained)
    #[arg(long, default_value = "constrained")]
    strategy: String,

    /// Random seed for a reproducible chart
    #[arg(long)]
    seed: Option<u64>,

    /// BPM (if not specified, the analyzer's estimate is used)
    #[arg(long)]
    bpm: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_default_env()
        .filter_level(level.parse()?)
        .init();

    let gap_policy = GapPolicy::parse(&args.min_gap)
        .ok_or_else(|| anyhow::anyhow!("Invalid min gap: {}", args.min_gap))?;
    let strategy = LaneAssignmentStrategy::parse(&args.strategy)
        .ok_or_else(|| anyhow::anyhow!("Unknown lane strategy: {}", args.strategy))?;

    let base = match &args.base {
        Some(base) => base.clone(),
        None => args
            .onsets
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Cannot derive a chart name from {}", args.onsets.display()))?,
    };

    let track = OnsetTrack::load(&args.onsets)?;
    log::info!("Loaded {} onsets from {}", track.onsets.len(), args.onsets.display());

    let config = CharterConfig {
        lane_count: args.lanes,
        gap_policy,
        strategy,
        seed: args.seed,
        tempo_override: args.bpm,
        ..CharterConfig::default()
    };

    let charter = Charter::new(config);
    let chart = charter.generate(&track, &base)?;

    let path = chart.export.save(&args.output)?;
    log::info!("Saved chart to: {}", path.display());

    print_summary(&chart);

    Ok(())
}

fn print_summary(chart: &GeneratedChart) {
    println!("\n=== Chart Summary ===");
    println!(
        "{} | {:.1} BPM | min gap {} ms",
        chart.export.name, chart.tempo, chart.synthesis.min_gap_ms
    );
    println!(
        "{} notes placed | {} onsets skipped",
        chart.synthesis.events.len(),
        chart.synthesis.skipped.len()
    );
    for (lane, count) in chart.synthesis.lane_counts(chart.export.lanes).iter().enumerate() {
        println!("lane {:<2} | {} notes", lane, count);
    }
    println!("=== End Summary ===\n");
}
