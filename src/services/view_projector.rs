//! View Projector: sorted and searched view of the reading list.
//!
//! A projection is a pure function of the list, the sort direction and the
//! search term. Nothing about it is persisted.

use url::Url;

use crate::types::reading_item::ReadingItem;

/// Sub-terms this long or longer may match by word prefix.
const PREFIX_MIN_CHARS: usize = 2;
/// Sub-terms this long or longer may match inside a word.
const INFIX_MIN_CHARS: usize = 3;

/// A parsed, lowercased search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Splits `raw` on whitespace into lowercased sub-terms.
    pub fn parse(raw: &str) -> Self {
        Self {
            terms: raw.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// An item matches when every sub-term matches it.
    pub fn matches(&self, item: &ReadingItem) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let fields = SearchFields::new(item);
        self.terms.iter().all(|term| fields.matches(term))
    }
}

/// Lowercased copies of the searchable fields of one item.
struct SearchFields {
    title: String,
    url: String,
    original_title: String,
}

impl SearchFields {
    fn new(item: &ReadingItem) -> Self {
        Self {
            title: item.title.to_lowercase(),
            url: item.url.to_lowercase(),
            original_title: item
                .original_title
                .as_deref()
                .unwrap_or_default()
                .to_lowercase(),
        }
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        self.title
            .split_whitespace()
            .chain(self.original_title.split_whitespace())
    }

    fn matches(&self, term: &str) -> bool {
        if self.title.contains(term) || self.url.contains(term) || self.original_title.contains(term) {
            return true;
        }

        let len = term.chars().count();
        if len < PREFIX_MIN_CHARS {
            return false;
        }
        if self.words().any(|word| word.starts_with(term)) {
            return true;
        }
        len >= INFIX_MIN_CHARS && self.words().any(|word| word.contains(term))
    }
}

/// The sorted order of a list plus the search filter applied to it.
///
/// Filtering happens lazily in [`Projection::iter`], which can be called any
/// number of times.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    ordered: Vec<&'a ReadingItem>,
    query: SearchQuery,
}

impl<'a> Projection<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a ReadingItem> + '_ {
        self.ordered
            .iter()
            .copied()
            .filter(move |item| self.query.matches(item))
    }

    /// Number of items in the underlying list.
    pub fn total(&self) -> usize {
        self.ordered.len()
    }

    pub fn visible_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// `"<total>"` without a search, `"<visible>/<total>"` with one.
    pub fn count_label(&self) -> String {
        if self.is_searching() {
            format!("{}/{}", self.visible_count(), self.total())
        } else {
            self.total().to_string()
        }
    }

    /// Clones the visible items in display order.
    pub fn to_vec(&self) -> Vec<ReadingItem> {
        self.iter().cloned().collect()
    }
}

/// Sorts `list` by creation date and filters it by `search_term`.
///
/// The sort is stable, so items with equal dates keep their stored order.
pub fn project<'a>(list: &'a [ReadingItem], newest_first: bool, search_term: &str) -> Projection<'a> {
    let mut ordered: Vec<&ReadingItem> = list.iter().collect();
    if newest_first {
        ordered.sort_by(|a, b| b.date.cmp(&a.date));
    } else {
        ordered.sort_by(|a, b| a.date.cmp(&b.date));
    }
    Projection {
        ordered,
        query: SearchQuery::parse(search_term),
    }
}

/// Icon shown next to an item: `/favicon.ico` at the page's origin.
///
/// Only http(s) pages have one. Credentials in the page url are dropped.
pub fn favicon_url(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;
    let origin = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    };
    Some(format!("{}/favicon.ico", origin))
}
