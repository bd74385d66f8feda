use chrono::{DateTime, Utc};

/// A fetched and parsed feed. Only the entries are kept.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub items: Vec<Item>,
}

/// A single entry in a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub link: String,
    /// `None` when the feed gave no parseable publish date
    pub published_at: Option<DateTime<Utc>>,
}

impl Item {
    /// True if the item was published strictly after `cutoff`.
    /// Items without a publish date never are.
    pub fn published_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.published_at.is_some_and(|p| p > cutoff)
    }
}
