use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use subway_countdown::cli::{self, Cli};
use subway_countdown::config::DataPaths;
use subway_countdown::countdown::{
    Aggregation, Countdown, CountdownError, Outcome, ReportSnapshot, render_pairs,
};
use subway_countdown::credentials::{self, API_KEY_ENV, ApiKeyFile};
use subway_countdown::domain::{Direction, InputError, Report, Station, StopCode};
use subway_countdown::feed::{FeedClient, FeedConfig};
use subway_countdown::stations::{
    StationCache, StationCacheConfig, StationClient, StationClientConfig, StationError,
    resolve_parsed,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(kind = ?e.kind(), "Countdown failed");
            eprintln!("Error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Cli) -> Result<(), CountdownError> {
    let request = args.parsed_stop().map_err(StationError::from)?;

    let paths = DataPaths::resolve(args.data_dir.clone());
    debug!(root = %paths.root().display(), "Using data directory");

    let key_file = ApiKeyFile::new(paths.api_key());
    let api_key = credentials::api_key(
        std::env::var(API_KEY_ENV).ok(),
        &key_file,
        std::io::stdin().lock(),
        std::io::stderr(),
    )?;

    let cache = StationCache::new(StationCacheConfig::new(paths.station_cache()));
    let station = select_station(request, args.one_time, &cache).await?;

    let countdown = Countdown::new(FeedClient::new(FeedConfig::new(api_key))?);
    let outcome = countdown.run(&station, Utc::now()).await?;

    match outcome {
        Outcome::Arrivals(Aggregation { events, report }) => {
            if args.debug {
                print_lines(cli::debug_lines(&station, &events, &report));
            }
            print_report(args, &report);
            let snapshot = ReportSnapshot::new(paths.snapshot());
            if snapshot.save(&report)? {
                debug!(path = %snapshot.path().display(), "Saved report snapshot");
            }
        }
        Outcome::Disruption(text) => {
            if args.debug {
                print_lines(cli::debug_lines(&station, &[], &Report::default()));
            }
            println!("{text}");
        }
    }

    Ok(())
}

/// The station to count down for: the saved one when no stop is given or
/// when it matches the request, otherwise a fresh resolution.
async fn select_station(
    request: Option<(StopCode, Direction)>,
    one_time: bool,
    cache: &StationCache,
) -> Result<Station, CountdownError> {
    let Some((stop_code, direction)) = request else {
        return cache.load().ok_or_else(|| {
            CountdownError::from(StationError::from(InputError::EmptyStopCode))
        });
    };

    if let Some(station) = cache.load().filter(|s| s.is_for(&stop_code, direction)) {
        debug!(stop = %stop_code, "Using saved station");
        return Ok(station);
    }

    info!(stop = %stop_code, direction = %direction, "Downloading station list");
    let reference = StationClient::new(StationClientConfig::default())?
        .fetch()
        .await?;
    let station = resolve_parsed(stop_code, direction, &reference)?;

    if !one_time {
        cache.save(&station)?;
        debug!(path = %cache.path().display(), "Saved station");
    }

    Ok(station)
}

fn print_report(args: &Cli, report: &Report) {
    if args.array {
        println!("{}", render_pairs(report));
    } else {
        print_lines(cli::terminal_lines(report, args.limit));
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
