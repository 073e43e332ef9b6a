//! Page snapshot extraction
//!
//! This module turns rendered HTML snapshots into listing data:
//! - Listing summaries from the cards of a list page
//! - Location and contact fields from a detail page
//!
//! Both entry points are pure functions of the snapshot. Every field falls
//! back to `"N/A"` when its marker is missing; only a card without a detail
//! link is dropped.

use crate::config::SelectorConfig;
use crate::record::{DetailFields, ListingSummary, NOT_AVAILABLE};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors that make a single card unusable
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("card '{name}' has no detail link")]
    MissingLink { name: String },
}

/// Compiled CSS selectors for every field the extractor reads
#[derive(Debug, Clone)]
pub struct Selectors {
    card: Selector,
    name: Selector,
    price: Selector,
    rating: Selector,
    reviews: Selector,
    detail_link: Selector,
    location: Selector,
    contact: Selector,
}

impl Selectors {
    /// Compiles the configured selectors
    ///
    /// The browser-side markers (list, detail, consent, next controls) are
    /// parsed too so a typo is caught before Chrome starts.
    ///
    /// # Returns
    ///
    /// * `Ok(Selectors)` - All selectors are valid CSS
    /// * `Err(ConfigError::InvalidSelector)` - The first invalid one
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        for (field, selector) in [
            ("list_marker", &config.list_marker),
            ("detail_marker", &config.detail_marker),
            ("consent", &config.consent),
            ("next_first", &config.next_first),
            ("next_subsequent", &config.next_subsequent),
        ] {
            parse_selector(field, selector)?;
        }

        Ok(Self {
            card: parse_selector("card", &config.card)?,
            name: parse_selector("name", &config.name)?,
            price: parse_selector("price", &config.price)?,
            rating: parse_selector("rating", &config.rating)?,
            reviews: parse_selector("reviews", &config.reviews)?,
            detail_link: parse_selector("detail_link", &config.detail_link)?,
            location: parse_selector("location", &config.location)?,
            contact: parse_selector("contact", &config.contact)?,
        })
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        field,
        selector: selector.to_string(),
    })
}

/// Extracts every usable listing summary from a list page snapshot
///
/// Cards are returned in document order. A card that cannot be used is
/// logged and skipped; it never fails the whole page.
///
/// # Example
///
/// ```
/// use hotel_harvest::config::SelectorConfig;
/// use hotel_harvest::crawler::{extract_summaries, Selectors};
///
/// let selectors = Selectors::compile(&SelectorConfig::default()).unwrap();
/// let html = r#"<div class="BcKagd"><h2 class="BgYkof">Hotel Lutetia</h2>
///     <a class="PVOOXe" href="/travel/hotels/entity/1">View</a></div>"#;
///
/// let summaries = extract_summaries(html, &selectors);
/// assert_eq!(summaries[0].name, "Hotel Lutetia");
/// assert_eq!(summaries[0].price, "N/A");
/// ```
pub fn extract_summaries(snapshot: &str, selectors: &Selectors) -> Vec<ListingSummary> {
    let document = Html::parse_document(snapshot);
    let mut summaries = Vec::new();

    for (index, card) in document.select(&selectors.card).enumerate() {
        match extract_summary(card, selectors) {
            Ok(summary) => summaries.push(summary),
            Err(e) => tracing::warn!("Skipping card {}: {}", index + 1, e),
        }
    }

    summaries
}

fn extract_summary(card: ElementRef<'_>, selectors: &Selectors) -> Result<ListingSummary, ExtractError> {
    let name = field_text(card, &selectors.name);

    let detail_link = card
        .select(&selectors.detail_link)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or_else(|| ExtractError::MissingLink { name: name.clone() })?
        .to_string();

    let review_count = card
        .select(&selectors.reviews)
        .next()
        .map(|el| trim_review_count(&element_text(el)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(ListingSummary {
        name,
        price: field_text(card, &selectors.price),
        rating: field_text(card, &selectors.rating),
        review_count,
        detail_link,
    })
}

/// Extracts location and contact from a detail page snapshot
pub fn extract_detail_fields(snapshot: &str, selectors: &Selectors) -> DetailFields {
    let document = Html::parse_document(snapshot);
    let root = document.root_element();

    DetailFields {
        location: field_text(root, &selectors.location),
        contact: field_text(root, &selectors.contact),
    }
}

/// Trimmed text of the first match under `scope`, or `"N/A"`
fn field_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// "(1,234)" -> "1,234"
fn trim_review_count(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
        .to_string()
}
