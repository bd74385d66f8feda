mod config;
mod feed;
mod fetch;
mod poll;
mod source;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use clap::error::ErrorKind;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::{self, ExitCode};

use crate::fetch::HttpFetcher;

const USAGE: &str = "rsspoll [-d days] [file]";

/// Command-line arguments for rsspoll
#[derive(Parser, Debug)]
#[command(name = "rsspoll", version)]
#[command(about = "Print entries published in the last few days from a list of feeds")]
#[command(override_usage = USAGE, disable_help_flag = true)]
pub struct Cli {
    /// Number of days to recall (overrides settings.toml, default 1)
    #[arg(short = 'd', long = "days", value_name = "days", allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// File with one feed URL per line
    /// [default: <config dir>/rsspoll/config.txt]
    pub file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::try_parse().unwrap_or_else(|err| match err.kind() {
        ErrorKind::DisplayVersion => err.exit(),
        _ => usage(),
    });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rsspoll: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn usage() -> ! {
    eprintln!("usage: {USAGE}");
    process::exit(2)
}

fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_config(cli.days, cli.file)?;

    let file = File::open(&cfg.feeds_path)
        .with_context(|| format!("open {}", cfg.feeds_path.display()))?;

    let fetcher = HttpFetcher::new(&cfg.user_agent, cfg.timeout)?;

    // One cutoff for the whole run, however long the fetches take.
    let cutoff = poll::cutoff(Utc::now(), cfg.days)?;

    let mut out = io::stdout().lock();
    poll::process(BufReader::new(file), &fetcher, cutoff, cfg.on_error, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments() {
        let cli = Cli::try_parse_from(["rsspoll"]).unwrap();
        assert_eq!(cli.days, None);
        assert_eq!(cli.file, None);
    }

    #[test]
    fn days_and_file() {
        let cli = Cli::try_parse_from(["rsspoll", "-d", "3", "feeds.txt"]).unwrap();
        assert_eq!(cli.days, Some(3));
        assert_eq!(cli.file, Some(PathBuf::from("feeds.txt")));
    }

    #[test]
    fn negative_days_are_accepted() {
        let cli = Cli::try_parse_from(["rsspoll", "-d", "-2"]).unwrap();
        assert_eq!(cli.days, Some(-2));
    }

    #[test]
    fn usage_errors_exit_with_two() {
        for args in [
            &["rsspoll", "a.txt", "b.txt"][..],
            &["rsspoll", "-d", "many"][..],
            &["rsspoll", "-x"][..],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_ne!(err.kind(), ErrorKind::DisplayHelp);
            assert_eq!(err.exit_code(), 2, "{args:?}");
        }
    }

    #[test]
    fn help_flag_is_a_usage_error() {
        let err = Cli::try_parse_from(["rsspoll", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn usage_line_matches_the_parser() {
        let rendered = Cli::command().render_usage().to_string();
        assert_eq!(rendered, format!("Usage: {USAGE}"));
    }

    #[test]
    fn missing_feed_list_names_the_path() {
        let cli = Cli::try_parse_from(["rsspoll", "/no/such/dir/feeds.txt"]).unwrap();
        let err = run(cli).unwrap_err();
        assert!(
            format!("{err:#}").starts_with("open /no/such/dir/feeds.txt: "),
            "{err:#}"
        );
    }
}
