use jiff::{SignedDuration, Timestamp};
use snaplink_core::ManualClock;
use snaplink_generator::SeqGenerator;
use snaplink_shortener::{CreateParams, Shortener, ShortenerConfig, ShortenerError, ShortenerService};
use snaplink_storage::FileRepository;
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn start() -> Timestamp {
    Timestamp::from_second(1_714_557_600).unwrap()
}

fn open(
    path: &Path,
    clock: &ManualClock,
) -> ShortenerService<FileRepository, SeqGenerator, ManualClock> {
    ShortenerService::with_parts(
        Arc::new(FileRepository::load(path)),
        SeqGenerator::with_prefix("sl"),
        clock.clone(),
        ShortenerConfig::builder()
            .base_url("https://sl.example".to_string())
            .build(),
    )
}

#[tokio::test]
async fn every_mutation_reaches_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urls.json");
    let clock = ManualClock::new(start());

    let service = open(&path, &clock);
    let created = service
        .create(
            CreateParams::builder()
                .long_url("https://example.com/files/report.pdf")
                .password("pw")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(created.short_url, "https://sl.example/report");

    clock.advance(SignedDuration::from_mins(1));
    service.resolve("report", Some("pw")).await.unwrap();

    // A fresh process sees the click and the password gate.
    let reopened = open(&path, &clock);
    let info = reopened.info("report").await.unwrap();
    assert_eq!(info.clicks, 1);
    assert!(info.has_password);
    assert_eq!(
        info.last_accessed_at,
        Some(start() + SignedDuration::from_mins(1))
    );
    assert_eq!(
        reopened.resolve("report", None).await,
        Err(ShortenerError::PasswordRequired)
    );

    reopened.delete("report").await.unwrap();
    let reopened = open(&path, &clock);
    assert!(matches!(
        reopened.info("report").await,
        Err(ShortenerError::NotFound(_))
    ));
}

#[tokio::test]
async fn snapshot_uses_persisted_key_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urls.json");
    let clock = ManualClock::new(start());

    let service = open(&path, &clock);
    service
        .create(
            CreateParams::builder()
                .long_url("https://github.com/rust-lang/rust")
                .custom_alias("rust")
                .expiry_at(start() + SignedDuration::from_hours(24))
                .build(),
        )
        .await
        .unwrap();

    let snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &snapshot["rust"];

    let mut keys: Vec<&str> = entry
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "clicks",
            "created_at",
            "description",
            "domain",
            "expiry_date",
            "file_type",
            "is_supabase",
            "last_accessed",
            "long_url",
            "password_hash",
            "short_code",
        ]
    );
    assert_eq!(entry["file_type"], "code");
    assert_eq!(entry["domain"], "github.com");
    assert_eq!(entry["created_at"], "2024-05-01T10:00:00Z");
    assert_eq!(entry["expiry_date"], "2024-05-02T10:00:00Z");
    assert!(entry["password_hash"].is_null());
}

#[tokio::test]
async fn legacy_snapshot_keeps_working() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urls.json");
    fs::write(
        &path,
        r#"{
  "old": {
    "long_url": "https://example.com/old.zip",
    "short_code": "old",
    "created_at": "2024-04-01T08:00:00.000001",
    "description": "old",
    "clicks": 4,
    "is_supabase": false,
    "file_type": "archive",
    "domain": "example.com",
    "expiry_date": "2024-06-01T00:00:00",
    "password_hash": "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b",
    "last_accessed": null
  }
}"#,
    )
    .unwrap();
    let clock = ManualClock::new(start());

    let service = open(&path, &clock);
    assert_eq!(
        service.resolve("old", Some("wrong")).await,
        Err(ShortenerError::InvalidPassword)
    );
    let resolved = service.resolve("old", Some("secret")).await.unwrap();
    assert_eq!(resolved.long_url, "https://example.com/old.zip");

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_clicks, 5);
    assert_eq!(stats.active_urls, 1);

    clock.set("2024-06-01T00:00:01Z".parse().unwrap());
    assert!(matches!(
        service.resolve("old", Some("secret")).await,
        Err(ShortenerError::Expired(_))
    ));
}

#[tokio::test]
async fn unwritable_snapshot_keeps_in_memory_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("urls.json");
    let clock = ManualClock::new(start());

    let service = open(&path, &clock);
    let created = service
        .create(CreateParams::new("https://example.com/notes.txt"))
        .await
        .unwrap();
    assert_eq!(created.record.short_code.as_str(), "notes");

    service.resolve("notes", None).await.unwrap();
    assert_eq!(service.info("notes").await.unwrap().clicks, 1);
    assert!(!path.exists());
}
