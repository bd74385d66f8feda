//! Polling a list of feeds for entries newer than a cutoff.
//!
//! Feeds are polled one after another in list order. Matching entries are
//! written as `<title>: <link>` lines as soon as each feed has been parsed,
//! in the order the feed lists them.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeDelta, Utc};
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::fetch::FeedFetcher;
use crate::source::FeedUrls;

/// What to do when a feed cannot be fetched or parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Stop at the first failing feed; later feeds are never fetched.
    #[default]
    Abort,
    /// Report the failure on stderr, poll the rest, then fail the run.
    Continue,
}

/// Why polling a single feed failed
#[derive(Debug, Error)]
pub enum PollError {
    /// The feed could not be fetched or parsed
    #[error("{url}")]
    Fetch {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Matched items could not be written out
    #[error("writing output")]
    Output(#[from] io::Error),
}

/// The instant `days` days before `now`.
///
/// Days are fixed 24 hour spans in UTC, so across a daylight saving change
/// the cutoff is an hour away from the same wall-clock time `days` ago.
pub fn cutoff(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .with_context(|| format!("recall window of {days} days is out of range"))
}

/// Fetch one feed and write every item published after `cutoff`.
///
/// Nothing is written if the fetch fails.
pub fn poll<F, W>(
    fetcher: &F,
    url: &str,
    cutoff: DateTime<Utc>,
    out: &mut W,
) -> Result<(), PollError>
where
    F: FeedFetcher + ?Sized,
    W: Write,
{
    let feed = fetcher.fetch(url).map_err(|source| PollError::Fetch {
        url: url.to_string(),
        source,
    })?;

    for item in feed.items.iter().filter(|i| i.published_after(cutoff)) {
        writeln!(out, "{}: {}", item.title, item.link)?;
    }

    Ok(())
}

/// Poll every URL in `reader` against the same `cutoff`.
///
/// A failure to write output ends the run whatever `on_error` says.
pub fn process<R, F, W>(
    reader: R,
    fetcher: &F,
    cutoff: DateTime<Utc>,
    on_error: OnError,
    out: &mut W,
) -> Result<()>
where
    R: BufRead,
    F: FeedFetcher + ?Sized,
    W: Write,
{
    let mut urls = FeedUrls::new(reader);
    let mut polled = 0;
    let mut failed = 0;

    for url in urls.by_ref() {
        polled += 1;

        match (poll(fetcher, &url, cutoff, out), on_error) {
            (Ok(()), _) => {}
            (Err(err @ PollError::Output(_)), _) | (Err(err), OnError::Abort) => {
                return Err(err.into());
            }
            (Err(err), OnError::Continue) => {
                eprintln!("rsspoll: {:#}", anyhow::Error::from(err));
                failed += 1;
            }
        }
    }

    urls.finish().context("reading feed list")?;

    if failed > 0 {
        bail!("{failed} of {polled} feeds failed");
    }

    Ok(())
}
