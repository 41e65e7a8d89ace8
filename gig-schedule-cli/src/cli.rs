use std::env;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use chrono::NaiveDate;
use getopts::{Matches, Options};
use gig_schedule::{Interval, ScheduleRequest};
use thiserror::Error;

pub const AGENDA_ENV: &str = "GIG_SCHEDULE_AGENDA";
const DEFAULT_AGENDA: &str = "agenda.json";

const USAGE: &str = "\
Usage: gigsched <COMMAND> [OPTIONS]

Commands:
    duration START END                  Billable hours between two times
    overlap START1 END1 START2 END2     Whether two intervals overlap
    check -d DATE -s START -e END       Check a slot against the agenda
    quote START END -r RATE             Price an event by the hour
    ics                                 Print the agenda as iCalendar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Duration(Interval),
    Overlap(Interval, Interval),
    Check(ScheduleRequest),
    Quote {
        interval: Interval,
        hourly_rate: u64,
        deposit: u64,
    },
    Ics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub agenda: PathBuf,
    pub json: bool,
}

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error(transparent)]
    Options(#[from] getopts::Fail),

    #[error("missing command")]
    MissingCommand,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` takes {expected} arguments, got {got}")]
    Arity {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("missing required option '{0}'")]
    MissingOption(&'static str),

    #[error("provided value for option '{option}' is invalid: {reason}")]
    InvalidValue {
        option: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Time(#[from] gig_schedule::Error),
}

#[derive(Debug)]
pub enum Parsed {
    Help,
    Run(Args),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "agenda",
        "Agenda file with existing bookings [Default: $GIG_SCHEDULE_AGENDA or agenda.json]",
        "FILE",
    );
    opts.optopt("d", "date", "Event date", "YYYY-MM-DD");
    opts.optopt("s", "start", "Event start time", "HH:MM");
    opts.optopt("e", "end", "Event end time", "HH:MM");
    opts.optopt(
        "i",
        "id",
        "Id of the booking being moved, ignored when checking conflicts",
        "ID",
    );
    opts.optopt("r", "rate", "Hourly rate in minor currency units", "AMOUNT");
    opts.optopt(
        "",
        "deposit",
        "Deposit already paid, in minor currency units [Default: 0]",
        "AMOUNT",
    );
    opts.optflag("j", "json", "Print results as JSON");
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    match try_parse(&opts, &args, env::var(AGENDA_ENV).ok()) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            println!("{}", opts.usage(USAGE));
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", opts.short_usage(env!("CARGO_PKG_NAME")));
            process::exit(1);
        }
    }
}

fn try_parse(
    opts: &Options,
    args: &[String],
    env_agenda: Option<String>,
) -> Result<Parsed, ArgsError> {
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        return Ok(Parsed::Help);
    }

    let (name, free) = matches
        .free
        .split_first()
        .ok_or(ArgsError::MissingCommand)?;

    let command = match name.as_str() {
        "duration" => {
            let [start, end] = positional::<2>("duration", free)?;
            Command::Duration(Interval::parse(start, end)?)
        }
        "overlap" => {
            let [start1, end1, start2, end2] = positional::<4>("overlap", free)?;
            Command::Overlap(
                Interval::parse(start1, end1)?,
                Interval::parse(start2, end2)?,
            )
        }
        "check" => {
            positional::<0>("check", free)?;
            Command::Check(ScheduleRequest {
                date: required(&matches, "date")?,
                start: required(&matches, "start")?,
                end: required(&matches, "end")?,
                id: optional(&matches, "id")?,
            })
        }
        "quote" => {
            let [start, end] = positional::<2>("quote", free)?;
            Command::Quote {
                interval: Interval::parse(start, end)?,
                hourly_rate: required(&matches, "rate")?,
                deposit: optional(&matches, "deposit")?.unwrap_or(0),
            }
        }
        "ics" => {
            positional::<0>("ics", free)?;
            Command::Ics
        }
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };

    let agenda = matches
        .opt_str("agenda")
        .or(env_agenda)
        .unwrap_or_else(|| DEFAULT_AGENDA.to_string())
        .into();

    Ok(Parsed::Run(Args {
        command,
        agenda,
        json: matches.opt_present("json"),
    }))
}

fn positional<'a, const N: usize>(
    command: &'static str,
    free: &'a [String],
) -> Result<[&'a str; N], ArgsError> {
    let values: Vec<&str> = free.iter().map(String::as_str).collect();

    values.try_into().map_err(|_| ArgsError::Arity {
        command,
        expected: N,
        got: free.len(),
    })
}

fn required<T: OptionValue>(matches: &Matches, option: &'static str) -> Result<T, ArgsError> {
    optional(matches, option)?.ok_or(ArgsError::MissingOption(option))
}

fn optional<T: OptionValue>(
    matches: &Matches,
    option: &'static str,
) -> Result<Option<T>, ArgsError> {
    matches
        .opt_str(option)
        .map(|raw| {
            T::parse_value(&raw).map_err(|reason| ArgsError::InvalidValue { option, reason })
        })
        .transpose()
}

trait OptionValue: Sized {
    fn parse_value(raw: &str) -> Result<Self, String>;
}

impl OptionValue for NaiveDate {
    fn parse_value(raw: &str) -> Result<Self, String> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| err.to_string())
    }
}

impl OptionValue for gig_schedule::TimeOfDay {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|err: gig_schedule::Error| err.to_string())
    }
}

impl OptionValue for u64 {
    fn parse_value(raw: &str) -> Result<Self, String> {
        u64::from_str(raw).map_err(|err| err.to_string())
    }
}
