//! Integration tests for the scraper
//!
//! These tests use wiremock to serve listing pages and test the full
//! fetch-extract-store cycle end-to-end against a SQLite file.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use trending_books::config::{Config, FailurePolicy};
use trending_books::crawler::{connect_scraper, ExtractError, FetchError};
use trending_books::storage::{BookStore, SqliteStorage};
use trending_books::{BookRecord, ScrapeError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One listing entry as the catalogue renders it
struct Item<'a> {
    title: &'a str,
    author: Option<&'a str>,
    year_label: &'a str,
    edition_label: &'a str,
}

fn render_item(item: &Item<'_>) -> String {
    let byline = item
        .author
        .map(|a| {
            format!(
                r#"<span class="bookauthor">by <a href="/authors/OL1A" class="results">{}</a></span>"#,
                a
            )
        })
        .unwrap_or_default();

    format!(
        r#"
        <li class="searchResultItem">
          <span class="bookcover"><img src="/cover.jpg"></span>
          <div class="details">
            <div class="resultTitle">
              <h3 itemprop="name" class="booktitle">
                <a itemprop="url" href="/works/OL1W" class="results">{}</a>
              </h3>
            </div>
            {}
            <span class="resultPublisher">
              <span class="publishedYear">
                {}
              </span>
              <span>
                - <a href="/works/OL1W#editions-list">{}</a>
              </span>
            </span>
          </div>
        </li>"#,
        item.title, byline, item.year_label, item.edition_label
    )
}

fn render_page(items: &[Item<'_>]) -> String {
    let rendered: String = items.iter().map(render_item).collect();
    format!(
        r#"<html><head><title>Trending Books</title></head><body>
        <div id="contentBody">
          <ul class="list-books">{}</ul>
        </div>
        </body></html>"#,
        rendered
    )
}

fn book<'a>(title: &'a str, author: &'a str, year_label: &'a str, edition_label: &'a str) -> Item<'a> {
    Item {
        title,
        author: Some(author),
        year_label,
        edition_label,
    }
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/trending/daily"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a page that must never be requested
async fn mount_forbidden_page(server: &MockServer, page: u32) {
    Mock::given(method("GET"))
        .and(path("/trending/daily"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(render_page(&[book(
            "Never",
            "Nobody",
            "First published in 2000",
            "1 edition",
        )])))
        .expect(0)
        .mount(server)
        .await;
}

fn create_test_config(base_url: &str, db_path: &Path, first_page: u32, last_page: u32) -> Config {
    let mut config = Config::default();
    config.source.base_url = base_url.to_string();
    config.source.first_page = first_page;
    config.source.last_page = last_page;
    config.storage.database_uri = Some(format!("sqlite://{}", db_path.display()));
    config
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("books.db")
}

fn stored_books(db_path: &Path) -> Vec<BookRecord> {
    let storage = SqliteStorage::new(db_path).expect("Failed to open DB");
    storage.list_books().expect("Failed to list books")
}

#[tokio::test]
async fn test_single_item_end_to_end() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[book(
            "Dune",
            "Frank Herbert",
            "First published in 1965",
            "3 editions",
        )]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 1);

    let scraper = connect_scraper(&config).await.expect("Failed to connect");
    let summary = scraper.run().await.expect("Scrape failed");

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.records_written, 1);

    let books = stored_books(&db_path(&dir));
    assert_eq!(books.len(), 1);

    let dune = &books[0];
    assert_eq!(dune.id, 1);
    assert_eq!(dune.title, "Dune");
    assert_eq!(dune.author, "Frank Herbert");
    assert_eq!(dune.year, 1965);
    assert_eq!(dune.edition_count, 3);
    assert_eq!(dune.genres, vec!["fantasy".to_string()]);
}

#[tokio::test]
async fn test_ids_increase_across_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[
            book("Emma", "Jane Austen", "First published in 1815", "2 editions"),
            book("Dracula", "Bram Stoker", "First published in 1897", "1 edition"),
        ]),
    )
    .await;
    mount_page(
        &server,
        2,
        render_page(&[book(
            "Ulysses",
            "James Joyce",
            "First published in 1922",
            "40 editions",
        )]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 2);

    let summary = connect_scraper(&config).await.unwrap().run().await.unwrap();
    assert_eq!(summary.records_written, 3);

    let books = stored_books(&db_path(&dir));
    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(titles, vec!["Emma", "Dracula", "Ulysses"]);
    assert_eq!(books[1].edition_count, 1);
    assert_eq!(books[2].edition_count, 40);
}

#[tokio::test]
async fn test_ids_continue_from_existing_maximum() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[book(
            "Dune",
            "Frank Herbert",
            "First published in 1965",
            "3 editions",
        )]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    {
        let mut storage = SqliteStorage::new(&db_path(&dir)).unwrap();
        storage
            .insert_book(&BookRecord::new(41, "Existing".into(), "".into(), 1950, 1))
            .unwrap();
    }

    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 1);
    connect_scraper(&config).await.unwrap().run().await.unwrap();

    let books = stored_books(&db_path(&dir));
    assert_eq!(books.len(), 2);
    assert_eq!(books[1].id, 42);
    assert_eq!(books[1].title, "Dune");
}

#[tokio::test]
async fn test_missing_author_is_stored_empty() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[Item {
            title: "Beowulf",
            author: None,
            year_label: "First published in 1000",
            edition_label: "7 editions",
        }]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 1);
    connect_scraper(&config).await.unwrap().run().await.unwrap();

    let books = stored_books(&db_path(&dir));
    assert_eq!(books[0].author, "");
    assert_eq!(books[0].year, 1000);
}

#[tokio::test]
async fn test_fetch_failure_aborts_remaining_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[
            book("Emma", "Jane Austen", "First published in 1815", "2 editions"),
            book("Dracula", "Bram Stoker", "First published in 1897", "1 edition"),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/trending/daily"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    for page in 3..=5 {
        mount_forbidden_page(&server, page).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 5);

    let result = connect_scraper(&config).await.unwrap().run().await;
    assert!(matches!(
        result,
        Err(ScrapeError::Fetch(FetchError::Status { status: 500, .. }))
    ));

    let titles: Vec<String> = stored_books(&db_path(&dir))
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["Emma", "Dracula"]);

    server.verify().await;
}

#[tokio::test]
async fn test_unparsable_year_aborts_run() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[
            book("Emma", "Jane Austen", "First published in 1815", "2 editions"),
            book("Mystery", "Anonymous", "Unknown", "1 edition"),
            book("Dracula", "Bram Stoker", "First published in 1897", "1 edition"),
        ]),
    )
    .await;
    mount_forbidden_page(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 2);

    let result = connect_scraper(&config).await.unwrap().run().await;
    assert!(matches!(
        result,
        Err(ScrapeError::Extract(ExtractError::Number { field: "year", .. }))
    ));

    let books = stored_books(&db_path(&dir));
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Emma");

    server.verify().await;
}

#[tokio::test]
async fn test_skip_policy_continues_past_bad_items() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[
            book("Emma", "Jane Austen", "First published in 1815", "2 editions"),
            book("Mystery", "Anonymous", "Unknown", "1 edition"),
            book("Dracula", "Bram Stoker", "First published in 1897", "1 edition"),
        ]),
    )
    .await;
    mount_page(
        &server,
        2,
        render_page(&[book(
            "Ulysses",
            "James Joyce",
            "First published in 1922",
            "many editions",
        )]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), &db_path(&dir), 1, 2);
    config.behavior.on_item_error = FailurePolicy::Skip;

    let summary = connect_scraper(&config).await.unwrap().run().await.unwrap();
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.items_seen, 4);
    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.items_skipped, 2);

    let books = stored_books(&db_path(&dir));
    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(books[1].title, "Dracula");
}

#[tokio::test]
async fn test_rerun_duplicates_records() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        render_page(&[book(
            "Dune",
            "Frank Herbert",
            "First published in 1965",
            "3 editions",
        )]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 1);

    connect_scraper(&config).await.unwrap().run().await.unwrap();
    connect_scraper(&config).await.unwrap().run().await.unwrap();

    let books = stored_books(&db_path(&dir));
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, books[1].title);
    assert_eq!(books[0].id, 1);
    assert_eq!(books[1].id, 2);
    assert_ne!(books[0].version, books[1].version);
}

#[tokio::test]
async fn test_page_without_listing() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        "<html><body><p>Nothing trending</p></body></html>".to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &db_path(&dir), 1, 1);

    let summary = connect_scraper(&config).await.unwrap().run().await.unwrap();
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.items_seen, 0);
    assert!(stored_books(&db_path(&dir)).is_empty());
}
