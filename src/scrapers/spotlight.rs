//! Record extraction from "spotlight row" listing pages.
//!
//! Every chapel is an `article.spotlight-row` block:
//!
//! ```text
//! <article class="spotlight-row">
//!   <h2 class="spotlight-row__title">…</h2>
//!   <p class="address">
//!     <span class="address-line1">…</span> <span class="postal-code">…</span> …
//!   </p>
//!   <span class="spotlight-row__item-content">+507 6123 4567</span>
//!   <a class="spotlight-row__link" href="…">…</a>
//!   <span class="spotlight-row__text--small">Misa dominical…</span>
//! </article>
//! ```
//!
//! Missing elements produce empty fields rather than errors.

use crate::models::ChapelRecord;
use crate::utils::{clean_phone_number, clean_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static CHAPEL: Lazy<Selector> = Lazy::new(|| selector("article.spotlight-row"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h2.spotlight-row__title"));
static ADDRESS: Lazy<Selector> = Lazy::new(|| selector("p.address"));
static PHONE: Lazy<Selector> = Lazy::new(|| selector("span.spotlight-row__item-content"));
static WEBSITE: Lazy<Selector> = Lazy::new(|| selector("a.spotlight-row__link"));
static SCHEDULE: Lazy<Selector> = Lazy::new(|| selector("span.spotlight-row__text--small"));

/// Address components, in the order they are joined.
static ADDRESS_PARTS: Lazy<[Selector; 6]> = Lazy::new(|| {
    [
        selector("span.address-line1"),
        selector("span.address-line2"),
        selector("span.postal-code"),
        selector("span.locality"),
        selector("span.administrative-area"),
        selector("span.country"),
    ]
});

/// Parse one listing page into records, in document order.
///
/// The returned records carry no coordinates yet.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn extract_chapels(html: &str) -> Vec<ChapelRecord> {
    let document = Html::parse_document(html);
    let chapels: Vec<ChapelRecord> = document.select(&CHAPEL).map(extract_chapel).collect();
    info!(count = chapels.len(), "Found chapels on page");
    chapels
}

fn extract_chapel(block: ElementRef<'_>) -> ChapelRecord {
    let name = first_text(block, &TITLE)
        .map(|t| clean_text(&t))
        .unwrap_or_default();
    let address = block
        .select(&ADDRESS)
        .next()
        .map(assemble_address)
        .unwrap_or_default();
    let phone = first_text(block, &PHONE)
        .map(|t| clean_phone_number(&t))
        .unwrap_or_default();
    let website = block
        .select(&WEBSITE)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string();
    let comments = first_text(block, &SCHEDULE)
        .map(|t| clean_text(&t))
        .unwrap_or_default();

    debug!(%name, %address, %phone, %website, "Extracted chapel");
    ChapelRecord::new(name, address, phone, website, comments)
}

/// Join the present address components of an address container.
fn assemble_address(container: ElementRef<'_>) -> String {
    let parts: Vec<Option<String>> = ADDRESS_PARTS
        .iter()
        .map(|sel| first_text(container, sel).map(|t| clean_text(&t)))
        .collect();
    join_address(parts)
}

/// Join address components with `", "`, skipping absent and blank ones.
pub fn join_address<I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text of the first descendant matching `sel`, all text nodes concatenated.
fn first_text(element: ElementRef<'_>, sel: &Selector) -> Option<String> {
    element
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>())
}
