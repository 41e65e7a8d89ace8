mod cli;

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use gig_schedule::{format_duration, Agenda, Error, Interval, Quote, ScheduleRequest};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

const LOG_ENV: &str = "GIG_SCHEDULE_LOG";

/// Exit status of `check` when the slot is taken.
const CONFLICT_EXIT: u8 = 2;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = cli::parse(env::args().skip(1).collect());
    tracing::debug!(command = ?args.command, agenda = %args.agenda.display(), "parsed arguments");

    let status = run(args, &mut io::stdout().lock())?;
    Ok(ExitCode::from(status))
}

/// Runs a command, writing its results to `out`. Returns the exit status.
fn run(args: Args, out: &mut impl Write) -> Result<u8> {
    match args.command {
        Command::Duration(interval) => {
            print_duration(out, interval, args.json)?;
            Ok(0)
        }
        Command::Overlap(first, second) => {
            let overlap = first.overlaps(second);
            if args.json {
                print_json(out, &OverlapOutput { overlap })?;
            } else {
                writeln!(out, "{overlap}")?;
            }
            Ok(0)
        }
        Command::Check(request) => {
            let agenda = load_agenda(&args.agenda)?;
            let conflict = find_conflict(&agenda, &request)?;
            print_check(out, conflict.as_deref(), args.json)?;

            Ok(if conflict.is_some() { CONFLICT_EXIT } else { 0 })
        }
        Command::Quote {
            interval,
            hourly_rate,
            deposit,
        } => {
            let quote = Quote::new(interval, hourly_rate, deposit)?;
            if args.json {
                print_json(out, &quote)?;
            } else {
                writeln!(out, "{interval}: {}", format_duration(quote.hours))?;
                writeln!(out, "total:     {}", quote.total)?;
                writeln!(out, "deposit:   {}", quote.deposit)?;
                writeln!(out, "remaining: {}", quote.remaining)?;
            }
            Ok(0)
        }
        Command::Ics => {
            let agenda = load_agenda(&args.agenda)?;
            write!(out, "{}", agenda.to_ics()?)?;
            Ok(0)
        }
    }
}

#[derive(Serialize)]
struct DurationOutput {
    hours: u32,
    label: String,
}

#[derive(Serialize)]
struct OverlapOutput {
    overlap: bool,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<&'a str>,
}

fn print_duration(out: &mut impl Write, interval: Interval, json: bool) -> Result<()> {
    let hours = interval.billable_hours();
    let label = format_duration(hours);

    if json {
        return print_json(out, &DurationOutput { hours, label });
    }

    writeln!(out, "{interval}: {label}")?;
    Ok(())
}

/// The conflict message for a taken slot, `None` when it is free.
fn find_conflict(agenda: &Agenda, request: &ScheduleRequest) -> Result<Option<String>> {
    match agenda.validate_schedule(request) {
        Ok(()) => Ok(None),
        Err(err @ Error::ScheduleConflict { .. }) => Ok(Some(err.to_string())),
        Err(err) => Err(err.into()),
    }
}

fn print_check(out: &mut impl Write, conflict: Option<&str>, json: bool) -> Result<()> {
    if json {
        return print_json(
            out,
            &CheckOutput {
                ok: conflict.is_none(),
                conflict,
            },
        );
    }

    writeln!(out, "{}", conflict.unwrap_or("ok"))?;
    Ok(())
}

fn load_agenda(path: &Path) -> Result<Agenda> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read agenda `{}`", path.display()))?;

    let agenda: Agenda = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse agenda `{}`", path.display()))?;

    tracing::info!(
        name = %agenda.name,
        bookings = agenda.bookings.len(),
        "loaded agenda"
    );

    Ok(agenda)
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
