//! Command-line arguments and terminal rendering.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{ArrivalEvent, Direction, InputError, Report, ReportEntry, Station, StopCode};

/// Countdown to the next subway trains at a stop
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// GTFS stop ID, e.g. A27. Omit to reuse the saved station.
    pub stop_id: Option<String>,

    /// Direction: N or S
    #[arg(requires = "stop_id")]
    pub direction: Option<String>,

    /// Print the report as a JSON array of [minutes, "route"] pairs
    #[arg(short, long)]
    pub array: bool,

    /// Print station and report state
    #[arg(short, long)]
    pub debug: bool,

    /// Do not save the station for later runs
    #[arg(short = 't', long)]
    pub one_time: bool,

    /// Number of arrivals to print
    #[arg(short = 'n', long, default_value_t = 5)]
    pub limit: usize,

    /// Directory for the API key, saved station and report snapshot
    #[arg(long, env = "MTA_TIMES_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    /// The requested stop and direction, if a stop was given.
    ///
    /// A stop without a direction is passed through with an empty direction
    /// so that validation reports it.
    pub fn requested_stop(&self) -> Option<(&str, &str)> {
        let stop = self.stop_id.as_deref()?;
        Some((stop, self.direction.as_deref().unwrap_or("")))
    }

    /// The requested stop and direction, validated.
    ///
    /// Checked before anything touches the data directory or the network,
    /// so bad input never triggers the API key prompt.
    pub fn parsed_stop(&self) -> Result<Option<(StopCode, Direction)>, InputError> {
        let Some((stop, direction)) = self.requested_stop() else {
            return Ok(None);
        };
        Ok(Some((StopCode::parse(stop)?, Direction::parse(direction)?)))
    }
}

/// Nudge printed after a countdown line.
pub fn hint(minutes: u32) -> Option<&'static str> {
    match minutes {
        0..=2 => Some("Too late :("),
        3..=4 => Some("RUN!"),
        _ => None,
    }
}

/// One terminal line for an arrival.
pub fn terminal_line(entry: &ReportEntry) -> String {
    match hint(entry.minutes_remaining) {
        Some(hint) => format!("{entry}. {hint}"),
        None => format!("{entry}."),
    }
}

/// Terminal lines for the soonest `limit` arrivals.
pub fn terminal_lines(report: &Report, limit: usize) -> Vec<String> {
    report.take(limit).iter().map(terminal_line).collect()
}

/// Station, raw feed arrivals and report for `--debug`.
pub fn debug_lines(station: &Station, events: &[ArrivalEvent], report: &Report) -> Vec<String> {
    let groups: Vec<&str> = station.line_groups.iter().map(|g| g.as_str()).collect();
    let events: Vec<String> = events.iter().map(|e| e.to_string()).collect();
    let entries: Vec<String> = report.entries().iter().map(|e| e.to_string()).collect();

    let mut lines = vec![
        format!("Stop ID: {}", station.stop_code),
        format!("Stop name: {}", station.name),
        format!("Direction: {}", station.direction),
        format!("Line groups: [{}]", groups.join(", ")),
    ];
    if let Some(label) = &station.direction_label {
        lines.push(format!("Heading: {label}"));
    }
    lines.push(format!("Arrivals: [{}]", events.join(", ")));
    lines.push(format!("Report: [{}]", entries.join(", ")));
    lines
}
