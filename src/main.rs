use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_dashboard::constants::DEFAULT_SETTINGS_FILE;
use weather_dashboard::{
    Config, Dashboard, OpenWeatherClient, PngChartRenderer, RunOptions, S3Store, Units,
};

/// Fetch weather for a list of cities, store it in S3, and chart the forecast
#[derive(Parser)]
#[command(name = "weather-dashboard", version, about, long_about = None)]
struct Cli {
    /// City to process (repeatable, replaces the default list)
    #[arg(long = "city", value_name = "NAME")]
    cities: Vec<String>,

    /// Unit system for temperatures
    #[arg(long, value_enum, default_value_t = Units::Imperial)]
    units: Units,

    /// Directory forecast charts are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Settings file loaded at startup; generated bucket names are appended to it
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Do not open charts in the system image viewer
    #[arg(long)]
    no_show: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "weather_dashboard=warn",
        1 => "weather_dashboard=info",
        2 => "weather_dashboard=debug",
        _ => "weather_dashboard=trace",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter_from_verbosity(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match dotenvy::from_path(&cli.settings) {
        Ok(()) => tracing::debug!(path = %cli.settings.display(), "Loaded settings file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(path = %cli.settings.display(), error = %e, "Failed to load settings file"),
    }

    let defaults = RunOptions::default();
    let options = RunOptions {
        cities: if cli.cities.is_empty() {
            defaults.cities
        } else {
            cli.cities
        },
        units: cli.units,
        output_dir: cli.output_dir,
        show_charts: !cli.no_show,
    };

    let config = Config::resolve(&cli.settings, |key| std::env::var(key).ok(), options)
        .context("Failed to load configuration")?;

    let weather = OpenWeatherClient::new(&config).context("Failed to create weather client")?;
    let store = S3Store::connect(&config).context("Failed to create S3 client")?;
    let renderer = PngChartRenderer::new(config.output_dir.clone(), config.units, config.show_charts);
    let dashboard = Dashboard::new(weather, store, renderer, config.units);

    tracing::info!(bucket = %config.bucket_name, cities = config.cities.len(), "Starting weather dashboard");

    let mut out = std::io::stdout();
    dashboard.provision(&mut out).await?;
    dashboard.run(&config.cities, &mut out).await?;

    Ok(())
}
