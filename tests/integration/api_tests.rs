//! End-to-end tests: controllers and the HTTP store against the bundled backend

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use data_buku::{
    api,
    config::AppConfig,
    controllers::{
        Confirm, ConfirmPrompt, DeleteOutcome, FormOutcome, ListView, Modal, Notification,
        NotificationKind, Notifier,
    },
    models::{Book, Field, Genre, SortBy},
    repository::Repository,
    store::{BookStore, HttpBookStore},
    ServerState,
};

/// Spawn the backend on an ephemeral port and return the collection URL
async fn spawn_backend(repository: Repository) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    let state = ServerState::new(AppConfig::default(), repository);
    tokio::spawn(api::serve_on(listener, state));
    format!("http://{}/data_buku", addr)
}

fn store(url: &str) -> Arc<HttpBookStore> {
    Arc::new(HttpBookStore::new(url, Duration::from_secs(5)).expect("Failed to build store"))
}

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn kinds(&self) -> Vec<NotificationKind> {
        self.seen.lock().unwrap().iter().map(|n| n.kind).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Answers every prompt with a fixed choice
struct FixedAnswer(bool);

#[async_trait]
impl Confirm for FixedAnswer {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        self.0
    }
}

fn book(id: &str, judul: &str, pengarang: &str, tahun: i32) -> Book {
    Book {
        id: id.to_string(),
        judul: judul.to_string(),
        pengarang: pengarang.to_string(),
        tahun,
        genre: Genre::Sejarah,
    }
}

async fn seed(store: &HttpBookStore) {
    for b in [
        book("B2", "Foundation", "Asimov", 1951),
        book("B1", "Dune", "Herbert", 1965),
        book("B3", "Babad Tanah Jawi", "Anonim", 1800),
    ] {
        store.create(&b).await.expect("Failed to seed book");
    }
}

fn ids(books: &[Book]) -> Vec<&str> {
    books.iter().map(|b| b.id.as_str()).collect()
}

#[tokio::test]
async fn test_create_edit_delete_round() {
    let url = spawn_backend(Repository::in_memory()).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = ListView::new(store(&url), notifier.clone(), Arc::new(FixedAnswer(true)));

    assert!(view.refresh().await);
    assert!(view.state().books.is_empty());

    view.open_create();
    view.set_form_field(Field::Id, "B1").unwrap();
    view.set_form_field(Field::Judul, "Test Book").unwrap();
    view.set_form_field(Field::Pengarang, "Author One").unwrap();
    view.set_form_field(Field::Tahun, "2020").unwrap();
    view.set_form_field(Field::Genre, "Fantasi").unwrap();
    let outcome = view.submit_form().await.unwrap();
    assert!(outcome.is_saved());
    assert!(matches!(view.modal(), Modal::Closed));
    assert_eq!(view.state().books.len(), 1);
    assert_eq!(view.state().books[0].tahun, 2020);

    view.open_edit("B1").unwrap();
    view.set_form_field(Field::Tahun, "2021").unwrap();
    assert!(view.submit_form().await.unwrap().is_saved());
    assert_eq!(view.state().books.len(), 1);
    assert_eq!(view.state().books[0].id, "B1");
    assert_eq!(view.state().books[0].tahun, 2021);

    assert!(matches!(view.delete_book("B1").await, DeleteOutcome::Deleted));
    assert!(view.state().books.is_empty());

    assert_eq!(
        notifier.kinds(),
        vec![NotificationKind::Success, NotificationKind::Success, NotificationKind::Success]
    );
}

#[tokio::test]
async fn test_duplicate_id_is_rejected_before_posting() {
    let url = spawn_backend(Repository::in_memory()).await;
    let store = store(&url);
    seed(&store).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = ListView::new(store.clone(), notifier.clone(), Arc::new(FixedAnswer(true)));
    view.open_create();
    for (field, value) in [
        (Field::Id, "B1"),
        (Field::Judul, "Another Dune"),
        (Field::Pengarang, "Someone"),
        (Field::Tahun, "1999"),
        (Field::Genre, "Horor"),
    ] {
        view.set_form_field(field, value).unwrap();
    }

    match view.submit_form().await.unwrap() {
        FormOutcome::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(Field::Id), Some("ID harus unik"));
        }
        other => panic!("expected invalid outcome, got {:?}", other),
    }
    assert!(notifier.kinds().is_empty());

    let books = store.list(SortBy::None).await.unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(books.iter().find(|b| b.id == "B1").unwrap().judul, "Dune");
}

#[tokio::test]
async fn test_remote_sort_orders() {
    let url = spawn_backend(Repository::in_memory()).await;
    let store = store(&url);
    seed(&store).await;

    assert_eq!(ids(&store.list(SortBy::None).await.unwrap()), vec!["B2", "B1", "B3"]);
    assert_eq!(ids(&store.list(SortBy::Tahun).await.unwrap()), vec!["B3", "B2", "B1"]);
    assert_eq!(ids(&store.list(SortBy::Judul).await.unwrap()), vec!["B3", "B1", "B2"]);
}

#[tokio::test]
async fn test_search_filters_fetched_rows() {
    let url = spawn_backend(Repository::in_memory()).await;
    let store = store(&url);
    seed(&store).await;

    let mut view = ListView::new(
        store,
        Arc::new(RecordingNotifier::default()),
        Arc::new(FixedAnswer(true)),
    );
    view.refresh().await;

    view.set_search("dun");
    let rows: Vec<&str> = view.visible_books().iter().map(|r| r.book.id.as_str()).collect();
    assert_eq!(rows, vec!["B1"]);

    view.set_search("ASIMOV");
    let rows: Vec<&str> = view.visible_books().iter().map(|r| r.book.id.as_str()).collect();
    assert_eq!(rows, vec!["B2"]);

    view.set_search("");
    assert_eq!(view.visible_books().len(), 3);
}

#[tokio::test]
async fn test_declined_delete_keeps_record() {
    let url = spawn_backend(Repository::in_memory()).await;
    let store = store(&url);
    seed(&store).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = ListView::new(store.clone(), notifier.clone(), Arc::new(FixedAnswer(false)));
    view.refresh().await;

    assert!(matches!(view.delete_book("B2").await, DeleteOutcome::Declined));
    assert_eq!(store.list(SortBy::None).await.unwrap().len(), 3);
    assert_eq!(view.state().books.len(), 3);
    assert!(notifier.kinds().is_empty());
}

#[tokio::test]
async fn test_unreachable_store_keeps_stale_rows_and_reports_errors() {
    let url = spawn_backend(Repository::in_memory()).await;
    let live = store(&url);
    seed(&live).await;

    // Grab a port nobody listens on
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}/data_buku", closed.local_addr().unwrap());
    drop(closed);

    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = ListView::new(live, notifier.clone(), Arc::new(FixedAnswer(true)));
    view.refresh().await;
    assert_eq!(view.state().books.len(), 3);

    let mut dead = ListView::new(store(&dead_url), notifier.clone(), Arc::new(FixedAnswer(true)));
    assert!(!dead.refresh().await);
    assert!(matches!(dead.delete_book("B1").await, DeleteOutcome::Failed(_)));

    dead.open_create();
    for (field, value) in [
        (Field::Id, "B9"),
        (Field::Judul, "Offline"),
        (Field::Pengarang, "Nobody"),
        (Field::Tahun, "2024"),
        (Field::Genre, "Biografi"),
    ] {
        dead.set_form_field(field, value).unwrap();
    }
    let outcome = dead.submit_form().await.unwrap();
    match outcome {
        FormOutcome::Failed(e) => assert!(e.is_remote()),
        other => panic!("expected failed outcome, got {:?}", other),
    }
    assert!(matches!(dead.modal(), Modal::Create(_)));
    assert_eq!(notifier.kinds(), vec![NotificationKind::Error]);
}

#[tokio::test]
async fn test_legacy_string_years_are_listed() {
    let path = std::env::temp_dir().join(format!("data-buku-legacy-{}.json", std::process::id()));
    tokio::fs::write(
        &path,
        json!({
            "data_buku": [
                {"id": "L1", "judul": "Lama", "pengarang": "Penulis", "tahun": "1990", "genre": "Biografi"}
            ]
        })
        .to_string(),
    )
    .await
    .unwrap();

    let url = spawn_backend(Repository::open(&path).await.unwrap()).await;
    let books = store(&url).list(SortBy::None).await.unwrap();
    assert_eq!(books, vec![Book {
        id: "L1".to_string(),
        judul: "Lama".to_string(),
        pengarang: "Penulis".to_string(),
        tahun: 1990,
        genre: Genre::Biografi,
    }]);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn test_records_from_other_clients_do_not_block_listing_or_create() {
    let path = std::env::temp_dir().join(format!("data-buku-foreign-{}.json", std::process::id()));
    tokio::fs::write(
        &path,
        json!({
            "data_buku": [
                {"id": "F1", "judul": "Naga", "pengarang": "Penulis", "tahun": 2001, "genre": "Fantasi"},
                {"id": "F2", "judul": "Kisah", "pengarang": "Anonim", "tahun": "2020.5", "genre": "Fiksi"}
            ]
        })
        .to_string(),
    )
    .await
    .unwrap();

    let url = spawn_backend(Repository::open(&path).await.unwrap()).await;
    let store = store(&url);
    let listed = store.list(SortBy::None).await.unwrap();
    assert_eq!(ids(&listed), vec!["F1", "F2"]);
    assert_eq!(listed[1].genre, Genre::Other("Fiksi".to_string()));
    assert_eq!(listed[1].tahun, 2020);

    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = ListView::new(store, notifier.clone(), Arc::new(FixedAnswer(true)));
    assert!(view.refresh().await);
    assert_eq!(view.state().books.len(), 2);

    view.open_create();
    for (field, value) in [
        (Field::Id, "F3"),
        (Field::Judul, "Baru"),
        (Field::Pengarang, "Penulis"),
        (Field::Tahun, "2024"),
        (Field::Genre, "Horor"),
    ] {
        view.set_form_field(field, value).unwrap();
    }
    assert!(view.submit_form().await.unwrap().is_saved());
    assert_eq!(ids(&view.state().books), vec!["F1", "F2", "F3"]);
    assert_eq!(notifier.kinds(), vec![NotificationKind::Success]);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn test_health_check() {
    let url = spawn_backend(Repository::in_memory()).await;
    let health_url = url.replace("/data_buku", "/health");

    let response = Client::new()
        .get(health_url)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["books"], 0);
}
