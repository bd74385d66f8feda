use anyhow::{Result, anyhow};
use feed_rs::model::Link;
use feed_rs::parser;
use reqwest::blocking::Client;
use std::time::Duration;

use crate::feed::{Feed, Item};

/// Anything that can turn a feed URL into a parsed [`Feed`].
pub trait FeedFetcher {
    fn fetch(&self, url: &str) -> Result<Feed>;
}

/// Fetches feeds over HTTP(S) with a blocking client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Feed> {
        let resp = self.client.get(url).send()?;
        if !resp.status().is_success() {
            return Err(anyhow!("HTTP error {}", resp.status()));
        }

        let bytes = resp.bytes()?;
        parse_feed(&bytes)
    }
}

/// Parse an RSS, Atom or JSON feed document.
///
/// Only the entry's own publish date is used. An entry that carries just an
/// `updated` date ends up with no timestamp.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed> {
    let parsed = parser::parse(bytes)?;

    let items = parsed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();

            let link = entry_link(&entry.links);

            Item {
                title,
                link,
                published_at: entry.published,
            }
        })
        .collect();

    Ok(Feed { items })
}

/// The entry's page link: the first `alternate` link (no `rel` counts as
/// alternate), else whatever link comes first.
fn entry_link(links: &[Link]) -> String {
    links
        .iter()
        .find(|l| {
            l.rel
                .as_deref()
                .is_none_or(|rel| rel.is_empty() || rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default()
}
