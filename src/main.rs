use anyhow::{bail, Context};
use std::path::PathBuf;
use tradechart::config::ConfigManager;
use tradechart::data::CsvConnector;
use tradechart::series::{ChartingPayload, IndicatorSeriesBuilder};

const USAGE: &str = "usage: tradechart <payload.json> [--config <file.toml>] [--candles <file.csv>]";

struct Args {
    payload: PathBuf,
    config: Option<PathBuf>,
    candles: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut payload = None;
    let mut config = None;
    let mut candles = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next().context(USAGE)?)),
            "--candles" => candles = Some(PathBuf::from(args.next().context(USAGE)?)),
            "-h" | "--help" => bail!(USAGE),
            _ if payload.is_none() => payload = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{}'\n{}", arg, USAGE),
        }
    }

    Ok(Args {
        payload: payload.context(USAGE)?,
        config,
        candles,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let manager = ConfigManager::new();
    if let Some(path) = &args.config {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?;
    }
    let config = manager.get();
    let catalog = config.catalog.build().context("building indicator catalog")?;

    let contents = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("reading payload {}", args.payload.display()))?;
    let mut payload = ChartingPayload::from_json_str(&contents)
        .with_context(|| format!("parsing payload {}", args.payload.display()))?;

    if let Some(path) = &args.candles {
        payload.candles = CsvConnector::load_candles(path)
            .with_context(|| format!("loading candles {}", path.display()))?;
    }

    let builder = IndicatorSeriesBuilder::new(catalog, config.chart);
    let built = builder.build(&payload)?;

    for skipped in &built.skipped {
        log::warn!("Indicator '{}' left out of the chart: {:?}", skipped.key, skipped.reason);
    }
    log::info!(
        "Built {} series from {} candles and {} indicators",
        built.series_set.len(),
        payload.candles.len(),
        payload.indicators.len()
    );

    println!("{}", serde_json::to_string_pretty(&built)?);
    Ok(())
}
