//! HTML parser for extracting book records
//!
//! This module handles parsing listing-page HTML to extract:
//! - One structured record per product entry
//! - The link to the next listing page, when present
//! - Skip reasons for entries that cannot be extracted

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

static BOOK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article.product_pod").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3 a").expect("valid selector"));
static PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.price_color").expect("valid selector"));
static RATING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.star-rating").expect("valid selector"));
static AVAILABILITY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.instock.availability").expect("valid selector"));
static NEXT_PAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.next a").expect("valid selector"));

static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d.]+").expect("valid regex"));

/// A book record extracted from a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedBook {
    /// Book title
    pub title: String,

    /// Price with the currency marker stripped
    pub price: f64,

    /// Star rating, 1 through 5
    pub rating: u8,

    /// Availability text, "Unknown" when the page omits it
    pub availability: String,

    /// Absolute URL of the book's detail page; natural key for storage
    pub source_url: String,
}

/// Reasons a product entry was skipped during extraction
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Product entry missing {field}")]
    MissingField { field: &'static str },

    #[error("Unparseable price text '{text}'")]
    InvalidPrice { text: String },

    #[error("No rating word in class list '{classes}'")]
    InvalidRating { classes: String },

    #[error("Unresolvable link '{href}': {source}")]
    InvalidUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// Everything extracted from one listing page
#[derive(Debug)]
pub struct ParsedListing {
    /// Successfully extracted records, in page order
    pub books: Vec<ScrapedBook>,

    /// Skip reasons for entries that could not be extracted
    pub skipped: Vec<ParseError>,

    /// Absolute URL of the next listing page, None on the last page
    pub next_page: Option<Url>,
}

/// Parses a listing page and extracts its book records
///
/// # Extraction Rules
///
/// Each `article.product_pod` entry yields one record:
/// - title from the `h3 a` title attribute, falling back to the anchor text
/// - detail-page link from the same anchor's href, resolved against the
///   page URL
/// - price from the digits in `p.price_color`
/// - rating from the One..Five word in the `p.star-rating` class list
/// - availability from `p.instock.availability`, defaulting to "Unknown"
///
/// Entries missing a required field are skipped, never failing the page;
/// each skip is recorded so the caller can count it. Pagination follows the
/// `li.next a` href, resolved against the page URL.
///
/// Parsing is deterministic: the same content always yields the same
/// records.
///
/// # Arguments
///
/// * `html` - The listing page HTML
/// * `page_url` - The URL the page was fetched from, for resolving links
///
/// # Example
///
/// ```no_run
/// use pageturner::scraper::parse_listing;
/// use url::Url;
///
/// let html = std::fs::read_to_string("page-1.html").unwrap();
/// let page_url = Url::parse("https://books.toscrape.com/").unwrap();
/// let listing = parse_listing(&html, &page_url);
/// println!("{} books, {} skipped", listing.books.len(), listing.skipped.len());
/// ```
pub fn parse_listing(html: &str, page_url: &Url) -> ParsedListing {
    let document = Html::parse_document(html);

    let mut books = Vec::new();
    let mut skipped = Vec::new();

    for entry in document.select(&BOOK_SELECTOR) {
        match extract_book(&entry, page_url) {
            Ok(book) => books.push(book),
            Err(reason) => skipped.push(reason),
        }
    }

    let next_page = extract_next_page(&document, page_url);

    ParsedListing {
        books,
        skipped,
        next_page,
    }
}

/// Extracts a single record from one product entry
fn extract_book(entry: &ElementRef, page_url: &Url) -> Result<ScrapedBook, ParseError> {
    let anchor = entry
        .select(&TITLE_SELECTOR)
        .next()
        .ok_or(ParseError::MissingField { field: "title" })?;

    // The title attribute carries the full title; the anchor text may be
    // truncated with an ellipsis
    let title = match anchor.value().attr("title") {
        Some(title) => title.trim().to_string(),
        None => anchor.text().collect::<String>().trim().to_string(),
    };
    if title.is_empty() {
        return Err(ParseError::MissingField { field: "title" });
    }

    let href = anchor
        .value()
        .attr("href")
        .ok_or(ParseError::MissingField { field: "href" })?;
    let source_url = page_url
        .join(href)
        .map_err(|e| ParseError::InvalidUrl {
            href: href.to_string(),
            source: e,
        })?
        .to_string();

    let price_text = entry
        .select(&PRICE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or(ParseError::MissingField { field: "price" })?;
    let price = parse_price(&price_text)?;

    let rating_element = entry
        .select(&RATING_SELECTOR)
        .next()
        .ok_or(ParseError::MissingField { field: "rating" })?;
    let rating = rating_from_classes(&rating_element)?;

    let availability = entry
        .select(&AVAILABILITY_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(ScrapedBook {
        title,
        price,
        rating,
        availability,
        source_url,
    })
}

/// Parses a price out of currency-prefixed text like "£51.77"
fn parse_price(text: &str) -> Result<f64, ParseError> {
    PRICE_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| ParseError::InvalidPrice {
            text: text.trim().to_string(),
        })
}

/// Maps the star-rating class word to a numeric rating
fn rating_from_classes(element: &ElementRef) -> Result<u8, ParseError> {
    for class in element.value().classes() {
        let rating = match class {
            "One" => 1,
            "Two" => 2,
            "Three" => 3,
            "Four" => 4,
            "Five" => 5,
            _ => continue,
        };
        return Ok(rating);
    }

    Err(ParseError::InvalidRating {
        classes: element.value().attr("class").unwrap_or("").to_string(),
    })
}

/// Extracts the next-page link, if the page has one
fn extract_next_page(document: &Html, page_url: &Url) -> Option<Url> {
    let href = document
        .select(&NEXT_PAGE_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("href"))?;

    page_url.join(href).ok()
}
