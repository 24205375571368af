//! Fixed layout of the target catalogue site.
//!
//! The crawler understands exactly one site. Every selector, URL template,
//! and resolution rule for that layout lives here so the rest of the crate
//! stays layout-agnostic.

use std::sync::LazyLock;

use scraper::Selector;
use url::Url;

use crate::error::AppError;

/// Site root, where category navigation is discovered.
pub const BASE_URL: &str = "https://books.toscrape.com/";

/// All item-detail pages live under this path; relative hrefs on listing
/// pages resolve against it.
pub const CATALOGUE_BASE: &str = "https://books.toscrape.com/catalogue/";

fn selector(css: &str) -> Selector {
    // All inputs are compile-time literals below; a parse failure is a bug.
    Selector::parse(css).expect("static CSS selector must be valid")
}

/// Leaf links of the side navigation's category list.
pub static CATEGORY_LINKS: LazyLock<Selector> =
    LazyLock::new(|| selector("div.side_categories ul.nav-list li ul li a"));

/// Item-card links on a listing page.
pub static ITEM_CARD_LINKS: LazyLock<Selector> =
    LazyLock::new(|| selector("article.product_pod h3 a"));

/// The "next page" link of a listing page.
pub static NEXT_PAGE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("li.next a"));

/// Title heading on a detail page.
pub static DETAIL_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("div.product_main h1"));

/// Price text on a detail page.
pub static DETAIL_PRICE: LazyLock<Selector> = LazyLock::new(|| selector("p.price_color"));

/// Rows of the product-information table.
pub static DETAIL_INFO_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("table.table tr"));

pub static TABLE_HEADER: LazyLock<Selector> = LazyLock::new(|| selector("th"));
pub static TABLE_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Free-text description paragraph on a detail page.
pub static DETAIL_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("article.product_page > p"));

/// First listing-page URL for a category name.
///
/// Deterministic name→slug mapping: lowercase, spaces to hyphens, fixed
/// path template. The `_2` suffix matches what the site serves for its
/// category index pages and is deliberately isolated here — it is the
/// single most fragile assumption about the site's URL scheme.
pub fn category_listing_url(name: &str) -> Result<Url, AppError> {
    let slug = name.trim().to_lowercase().replace(' ', "-");
    let path = format!("catalogue/category/books/{slug}_2/index.html");
    Url::parse(BASE_URL)
        .and_then(|base| base.join(&path))
        .map_err(|e| AppError::Generic(format!("invalid listing URL for category '{name}': {e}")))
}

/// Resolve an item-card href against the fixed catalogue base path.
///
/// Listing pages link items with upward-relative hrefs
/// (`../../../some-book_42/index.html`); the leading parent segments are
/// stripped and the remainder joined onto the catalogue base.
pub fn resolve_item_url(href: &str) -> Option<Url> {
    let relative = href.trim_start_matches("../");
    Url::parse(CATALOGUE_BASE)
        .ok()?
        .join(relative)
        .ok()
}
