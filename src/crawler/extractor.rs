//! Per-item field extraction
//!
//! One listing item becomes one [`BookRecord`]. The four text fields are
//! parsed on the blocking pool in parallel while the identifier is fetched
//! from storage; all five are joined before the record is assembled.

use crate::crawler::parser::ItemFragment;
use crate::record::BookRecord;
use crate::storage::{BookStore, StorageError, StoreHandle};
use scraper::{Html, Selector};
use std::future::Future;
use std::num::ParseIntError;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

const YEAR_PREFIX: &str = "First published in ";
const EDITION_WORD: &str = " edition";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("valid item selector"));
    };
}

selector!(TITLE_SELECTOR, "h3");
selector!(AUTHOR_SELECTOR, ".bookauthor a");
selector!(YEAR_SELECTOR, ".publishedYear");
selector!(EDITION_SELECTOR, ".resultPublisher a");

/// Errors raised while turning an item into a record
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The item's `h3` is missing or blank
    ///
    /// Title is required, so such an item is rejected rather than stored with
    /// an empty title the way author is.
    #[error("Item has no title")]
    MissingTitle,

    #[error("Cannot parse {field} from '{text}': {source}")]
    Number {
        field: &'static str,
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Identifier allocation failed: {0}")]
    Allocation(#[source] StorageError),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Concatenated text of every element matching `selector`, trimmed
fn selection_text(fragment: &Html, selector: &Selector) -> String {
    fragment
        .select(selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn extract_title(fragment: &Html) -> Result<String, ExtractError> {
    let title = selection_text(fragment, &TITLE_SELECTOR);
    if title.is_empty() {
        return Err(ExtractError::MissingTitle);
    }
    Ok(title)
}

/// Author link text; empty when the item has no author link
pub fn extract_author(fragment: &Html) -> String {
    selection_text(fragment, &AUTHOR_SELECTOR)
}

pub fn extract_year(fragment: &Html) -> Result<i32, ExtractError> {
    parse_year_label(&selection_text(fragment, &YEAR_SELECTOR))
}

pub fn extract_edition_count(fragment: &Html) -> Result<i64, ExtractError> {
    parse_edition_label(&selection_text(fragment, &EDITION_SELECTOR))
}

/// Parses "First published in 1965" into 1965
///
/// Only the first occurrence of the prefix is removed; whatever remains must
/// be a plain integer.
pub fn parse_year_label(label: &str) -> Result<i32, ExtractError> {
    let label = label.trim();
    let digits = label.replacen(YEAR_PREFIX, "", 1);
    digits.parse().map_err(|source| ExtractError::Number {
        field: "year",
        text: label.to_string(),
        source,
    })
}

/// Parses "3 editions" (or "1 edition") into the count
///
/// Strips one " edition", then one "s", in that order. This matches the
/// labels the catalogue emits and nothing more general.
pub fn parse_edition_label(label: &str) -> Result<i64, ExtractError> {
    let label = label.trim();
    let digits = label.replacen(EDITION_WORD, "", 1).replacen('s', "", 1);
    digits.parse().map_err(|source| ExtractError::Number {
        field: "edition count",
        text: label.to_string(),
        source,
    })
}

/// Parses the fragment on the blocking pool and runs `extract` over it
///
/// The task is spawned immediately; the returned future only waits for it.
fn spawn_field<T, F>(html: &Arc<str>, extract: F) -> impl Future<Output = Result<T, ExtractError>>
where
    T: Send + 'static,
    F: FnOnce(&Html) -> Result<T, ExtractError> + Send + 'static,
{
    let html = Arc::clone(html);
    let task = tokio::task::spawn_blocking(move || extract(&Html::parse_fragment(&html)));
    async move { task.await.map_err(ExtractError::Task).and_then(|result| result) }
}

/// Builds the record for one listing item
///
/// Title, author, year and edition count are extracted in parallel with the
/// identifier lookup. The first failure among the five fails the item.
///
/// The identifier is the store's current maximum plus one, read here and not
/// reserved. Callers must write this record before extracting the next one.
pub async fn extract_record<S>(
    item: &ItemFragment,
    store: &StoreHandle<S>,
) -> Result<BookRecord, ExtractError>
where
    S: BookStore + Send + 'static,
{
    let html: Arc<str> = Arc::from(item.html());

    let title = spawn_field(&html, extract_title);
    let author = spawn_field(&html, |fragment| Ok(extract_author(fragment)));
    let year = spawn_field(&html, extract_year);
    let edition_count = spawn_field(&html, extract_edition_count);
    let id = async { store.next_id().await.map_err(ExtractError::Allocation) };

    let (title, author, year, id, edition_count) =
        tokio::try_join!(title, author, year, id, edition_count)?;

    Ok(BookRecord::new(id, title, author, year, edition_count))
}
