use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use seat_map_extractor::{ParserConfig, SeatMapParser, OTA_NAMESPACE};

/// Convert an OTA_AirSeatMapRS XML document into a simplified JSON seat map
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input XML file
    #[arg(default_value = "OTA_AirSeatMapRS.xml")]
    input: PathBuf,

    /// Output JSON file
    #[arg(default_value = "OTA_AirSeatMapRS.json")]
    output: PathBuf,

    /// Print the JSON to stdout instead of writing the output file
    #[arg(long)]
    stdout: bool,

    /// XML namespace of the seat map elements
    #[arg(long, env = "SEAT_MAP_NAMESPACE", default_value = OTA_NAMESPACE)]
    namespace: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let parser = SeatMapParser::with_config(ParserConfig::default().with_namespace(args.namespace));

    if args.stdout {
        info!("Reading file: {}", args.input.display());
        let xml = std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?;
        let response = parser
            .process(&xml)
            .with_context(|| format!("failed to extract seat map from {}", args.input.display()))?;
        println!("{}", response.to_json_pretty()?);
    } else {
        parser
            .convert_file(&args.input, &args.output)
            .with_context(|| format!("failed to convert {}", args.input.display()))?;
    }

    Ok(())
}
