//! Listing data model
//!
//! A listing moves through three shapes during a crawl:
//! - `ListingSummary`: what a card on a list page tells us
//! - `EnrichedRecord`: the summary plus detail-page fields and an absolute link
//! - `IdentityKey`: the subset of fields that decides whether two records are
//!   the same physical hotel

/// Sentinel stored for any field that was not present on the page
pub const NOT_AVAILABLE: &str = "N/A";

/// Column header of the output artifact, in row order
pub const CSV_HEADER: [&str; 7] = [
    "Name", "Price", "Rating", "Reviews", "Location", "Contact", "Link",
];

/// A single card scraped from a list page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    pub name: String,
    pub price: String,
    pub rating: String,
    pub review_count: String,

    /// Relative link to the detail page, as found in the card
    pub detail_link: String,
}

/// Fields only available on a listing's detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub location: String,
    pub contact: String,
}

impl Default for DetailFields {
    fn default() -> Self {
        Self {
            location: NOT_AVAILABLE.to_string(),
            contact: NOT_AVAILABLE.to_string(),
        }
    }
}

/// The unit persisted to the output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub name: String,
    pub price: String,
    pub rating: String,
    pub review_count: String,
    pub location: String,
    pub contact: String,

    /// Absolute URL of the detail page
    pub link: String,
}

impl EnrichedRecord {
    /// Joins a summary with its detail fields
    pub fn new(summary: ListingSummary, detail: DetailFields, link: String) -> Self {
        Self {
            name: summary.name,
            price: summary.price,
            rating: summary.rating,
            review_count: summary.review_count,
            location: detail.location,
            contact: detail.contact,
            link,
        }
    }

    /// Returns the identity of this record. The link is left out because the
    /// same hotel is reachable through different relative paths.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            name: self.name.clone(),
            price: self.price.clone(),
            rating: self.rating.clone(),
            review_count: self.review_count.clone(),
            location: self.location.clone(),
            contact: self.contact.clone(),
        }
    }

    /// Returns the record as a CSV row matching `CSV_HEADER`
    pub fn as_row(&self) -> [&str; 7] {
        [
            self.name.as_str(),
            self.price.as_str(),
            self.rating.as_str(),
            self.review_count.as_str(),
            self.location.as_str(),
            self.contact.as_str(),
            self.link.as_str(),
        ]
    }
}

/// Field tuple used to decide whether two records denote the same listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub name: String,
    pub price: String,
    pub rating: String,
    pub review_count: String,
    pub location: String,
    pub contact: String,
}
