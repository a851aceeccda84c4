use anyhow::Result;
use std::env;
use std::path::Path;
use tile_charter::exporter::load_chart;
use tile_charter::lane_assigner::DEFAULT_LANES;
use tile_charter::verify::verify_chart;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: check_chart <chart.json> [lanes] [min_gap_ms]");
        std::process::exit(2);
    }
    let lanes: u8 = match args.get(2) {
        Some(s) => s.parse()?,
        None => DEFAULT_LANES,
    };
    let min_gap: u64 = match args.get(3) {
        Some(s) => s.parse()?,
        None => 0,
    };

    let events = load_chart(Path::new(&args[1]))?;
    log::info!("Checking {} notes on {} lanes (min gap {} ms)", events.len(), lanes, min_gap);

    let violations = verify_chart(&events, lanes, min_gap);
    if violations.is_empty() {
        println!("ok: {} notes", events.len());
        return Ok(());
    }

    for violation in &violations {
        println!("{}", violation);
    }
    println!("{} violations in {} notes", violations.len(), events.len());
    std::process::exit(1);
}
