//! HTML parser for listing pages
//!
//! Locates the listing items on a fetched page. Each item is handed on as an
//! owned HTML fragment so extraction tasks can parse it on any thread.

use scraper::{Html, Selector};
use std::sync::LazyLock;

static LISTING_ITEM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".list-books .searchResultItem").expect("valid listing selector")
});

/// The markup of one listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFragment {
    html: String,
}

impl ItemFragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Finds every listing item on a page, in document order
///
/// Items are the `.searchResultItem` elements inside the `.list-books`
/// container; a page without the container yields no items.
///
/// # Example
///
/// ```
/// use trending_books::crawler::locate_items;
///
/// let html = r#"<ul class="list-books"><li class="searchResultItem"><h3>Dune</h3></li></ul>"#;
/// let items = locate_items(html);
/// assert_eq!(items.len(), 1);
/// assert!(items[0].html().contains("Dune"));
/// ```
pub fn locate_items(html: &str) -> Vec<ItemFragment> {
    let document = Html::parse_document(html);

    document
        .select(&LISTING_ITEM_SELECTOR)
        .map(|element| ItemFragment::new(element.html()))
        .collect()
}
