use anyhow::{Context, Result, bail};
use argh::FromArgs;
use chrono::Utc;
use citytemp::config::LoggingConfig;
use citytemp::selection::{pick_cities, prompt_action, prompt_date_range, validate_range};
use citytemp::{
    Action, ArchiveClient, CityRegistry, CityTempConfig, CityTempError, actions, aggregate,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Historical hourly temperatures for Ohio cities from the Open-Meteo archive
struct Args {
    /// path to the configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// enable debug logging
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// city to fetch, repeatable; prompted for when omitted
    #[argh(option)]
    city: Vec<String>,

    /// first day to fetch (YYYY-MM-DD)
    #[argh(option)]
    start: Option<String>,

    /// last day to fetch (YYYY-MM-DD)
    #[argh(option)]
    end: Option<String>,

    /// what to do with the data: print, plot or store
    #[argh(option)]
    action: Option<Action>,
}

fn init_logging(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: Args) -> Result<()> {
    let config = CityTempConfig::load_from_path(args.config)?;
    init_logging(&config.logging, args.verbose);

    let registry = CityRegistry::new();
    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    let today = Utc::now().with_timezone(&config.archive.tz()?).date_naive();

    let cities = if args.city.is_empty() {
        pick_cities(&registry, &mut input, &mut output)?
    } else {
        args.city
            .iter()
            .map(|name| {
                registry
                    .find_ignore_case(name)
                    .map(str::to_string)
                    .ok_or_else(|| CityTempError::unknown_city(name.as_str()))
            })
            .collect::<citytemp::Result<Vec<_>>>()?
    };

    let range = match (args.start, args.end) {
        (Some(start), Some(end)) => validate_range(&start, &end, today)?,
        (None, None) => prompt_date_range(&mut input, &mut output, today)?,
        _ => bail!("--start and --end must be given together"),
    };

    let client = ArchiveClient::new(&config.archive)?;
    let dataset = aggregate(&registry, &client, &cities, &range)
        .await
        .with_context(|| format!("Failed to fetch temperatures for {range}"))?;

    let action = match args.action {
        Some(action) => action,
        None => prompt_action(&mut input, &mut output)?,
    };

    actions::run(action, &dataset, &config, &mut output)?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Args = argh::from_env();

    if let Err(e) = run(args).await {
        if let Some(err) = e.downcast_ref::<CityTempError>() {
            eprintln!("{}", err.user_message());
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
