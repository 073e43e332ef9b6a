//! URL handling module for Hotel-Harvest
//!
//! Builds the search results URL for a location and turns the relative links
//! found on list cards into absolute detail-page URLs.

use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the search results URL for `location`
///
/// The location is placed in the `q` query parameter and percent-encoded.
///
/// # Arguments
///
/// * `base_url` - Scheme and host, e.g. `https://www.google.com`
/// * `search_path` - Path of the results page, e.g. `/travel/search`
/// * `location` - Free-text location query
///
/// # Examples
///
/// ```
/// use hotel_harvest::url::search_url;
///
/// let url = search_url("https://www.google.com", "/travel/search", "New York").unwrap();
/// assert_eq!(url.as_str(), "https://www.google.com/travel/search?q=New+York");
/// ```
pub fn search_url(base_url: &str, search_path: &str, location: &str) -> UrlResult<Url> {
    let mut url = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    url.set_path(search_path);
    url.query_pairs_mut().clear().append_pair("q", location);
    Ok(url)
}

/// Prefixes a card's relative link with the site's scheme and host
///
/// Links that are already absolute http(s) URLs are returned unchanged.
///
/// # Examples
///
/// ```
/// use hotel_harvest::url::absolute_link;
///
/// assert_eq!(
///     absolute_link("https://www.google.com", "/travel/hotels/entity/abc"),
///     "https://www.google.com/travel/hotels/entity/abc"
/// );
/// ```
pub fn absolute_link(base_url: &str, detail_link: &str) -> String {
    if detail_link.starts_with("http://") || detail_link.starts_with("https://") {
        return detail_link.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if detail_link.starts_with('/') {
        format!("{}{}", base, detail_link)
    } else {
        format!("{}/{}", base, detail_link)
    }
}
