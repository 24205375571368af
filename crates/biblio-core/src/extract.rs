//! Selector-driven extraction of categories, listing pages, and item detail.
//!
//! Every field of a detail page parses independently: a missing element or
//! an unparsable value leaves that field empty and logs a warning, it never
//! fails the item. Only the fetch itself can fail a page.

use rust_decimal::Decimal;
use scraper::Html;
use url::Url;
use uuid::Uuid;

use crate::models::NewBook;
use crate::site;

/// Category names from the site root's navigation, trimmed, in document
/// order. Missing or malformed navigation yields an empty list.
pub fn extract_categories(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&site::CATEGORY_LINKS)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// One parsed listing page: the item-detail URLs it carries and the
/// resolved "next page" URL, if any.
#[derive(Debug)]
pub struct ListingPage {
    pub item_urls: Vec<String>,
    pub next_url: Option<Url>,
}

/// Parse a listing page: item-card hrefs resolved against the catalogue
/// base, next link resolved against the current page's directory.
pub fn parse_listing_page(html: &str, page_url: &Url) -> ListingPage {
    let doc = Html::parse_document(html);

    let item_urls = doc
        .select(&site::ITEM_CARD_LINKS)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| match site::resolve_item_url(href) {
            Some(url) => Some(url.to_string()),
            None => {
                tracing::warn!(%href, "unresolvable item href, skipping card");
                None
            }
        })
        .collect();

    let next_url = doc
        .select(&site::NEXT_PAGE_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| match page_url.join(href) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(%href, error = %e, "unresolvable next-page href");
                None
            }
        });

    ListingPage {
        item_urls,
        next_url,
    }
}

// ---------------------------------------------------------------------------
// Detail extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct TableFields {
    upc: Option<String>,
    product_type: Option<String>,
    availability: Option<String>,
    number_of_reviews: Option<i32>,
}

type FieldSetter = fn(&mut TableFields, &str);

/// Recognized product-information labels and their setters. Labels not in
/// this table are no-ops by construction.
static FIELD_TABLE: &[(&str, FieldSetter)] = &[
    ("UPC", |f, v| f.upc = Some(v.to_string())),
    ("Product Type", |f, v| f.product_type = Some(v.to_string())),
    ("Availability", |f, v| f.availability = Some(v.to_string())),
    ("Number of reviews", |f, v| {
        f.number_of_reviews = parse_review_count(v)
    }),
];

/// Extract a book from its detail page.
///
/// The document already fetched successfully, so a book is always
/// produced; see the module docs for per-field fallback behavior.
pub fn extract_book_detail(html: &str, url: &str, category_id: Uuid) -> NewBook {
    let doc = Html::parse_document(html);

    let title = match doc.select(&site::DETAIL_TITLE).next() {
        Some(h1) => h1.text().collect::<String>().trim().to_string(),
        None => {
            tracing::warn!(%url, "detail page has no title heading");
            String::new()
        }
    };

    let price = match doc.select(&site::DETAIL_PRICE).next() {
        Some(p) => parse_price(&p.text().collect::<String>()),
        None => {
            tracing::warn!(%url, "detail page has no price element");
            None
        }
    };

    let mut fields = TableFields::default();
    for row in doc.select(&site::DETAIL_INFO_ROWS) {
        let th = row.select(&site::TABLE_HEADER).next();
        let td = row.select(&site::TABLE_CELL).next();
        if let (Some(th), Some(td)) = (th, td) {
            let label = th.text().collect::<String>();
            let value = td.text().collect::<String>();
            if let Some((_, set)) = FIELD_TABLE.iter().find(|(l, _)| *l == label.trim()) {
                set(&mut fields, value.trim());
            }
        }
    }

    let description = doc
        .select(&site::DETAIL_DESCRIPTION)
        .next()
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty());

    NewBook {
        title,
        price,
        upc: fields.upc,
        product_type: fields.product_type,
        availability: fields.availability,
        number_of_reviews: fields.number_of_reviews,
        description,
        url: url.to_string(),
        category_id,
    }
}

/// Strip everything but digits and the decimal point, then parse.
/// `"£45.17"` → `45.17`; `"Free"` → `None`, no error escapes.
fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match cleaned.parse::<Decimal>() {
        Ok(price) => Some(price),
        Err(_) => {
            tracing::warn!(%raw, "unparsable price text, leaving price empty");
            None
        }
    }
}

fn parse_review_count(raw: &str) -> Option<i32> {
    match raw.trim().parse::<i32>() {
        Ok(count) => Some(count),
        Err(_) => {
            tracing::warn!(%raw, "unparsable review count, leaving it empty");
            None
        }
    }
}
