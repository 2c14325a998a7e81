// Configuration and seed loading tests
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::io::Write;

use chrono::FixedOffset;
use tempfile::{tempdir, Builder};

use clinic_backoffice::{
    data::{load_records, read_document, records_at, DataError, Predicate, Value},
    storage::{memory_collections, StoreError},
    utils::{AppError, Config, SimpleLogger},
};
use log::Log;

const SEED: &str = r#"{
    "users": [
        {
            "id": "p1",
            "created_at": "2024-03-01T10:00:00Z",
            "user_type": "PATIENT",
            "email": "ada@clinic.org",
            "profile": {"first_name": "Ada", "gender": "Female"},
            "dependants": ["d1", "d2"]
        },
        {
            "id": "s1",
            "created_at": "2024-03-02T10:00:00Z",
            "user_type": "SPECIALIST",
            "email": "ben@clinic.org",
            "verification_status": "VERIFIED"
        }
    ],
    "appointments": [
        {"id": "a1", "created_at": "2024-03-03T10:00:00Z", "status": "COMPLETED", "patient": "p1"}
    ],
    "lifeguards": [
        {"id": "l1", "created_at": "2024-03-04T10:00:00Z", "first_name": "Tunde", "status": "ACTIVE"}
    ]
}"#;

#[test]
fn test_load_yaml_config() {
    let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "server:\n  host: 0.0.0.0\n  port: 9000\n  enable_cors: true\npagination:\n  default_page_limit: 25\nlogging:\n  level: debug\n"
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert!(config.server.enable_cors);
    assert_eq!(config.pagination.default_page_limit, 25);
    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    // Unspecified sections keep their defaults
    assert_eq!(config.storage.seed_path, None);
}

#[test]
fn test_load_partial_json_config() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"storage": {{"seed_path": "seed.json", "utc_offset_minutes": 60}}}}"#).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.storage.seed_path.as_deref(), Some("seed.json"));
    assert_eq!(config.storage.time_zone().unwrap(), FixedOffset::east_opt(3600).unwrap());
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.pagination.default_page_limit, 10);
    assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
}

#[test]
fn test_unsupported_config_format() {
    let file = Builder::new().suffix(".toml").tempfile().unwrap();

    assert!(matches!(Config::from_file(file.path()), Err(AppError::Config(_))));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(Some(dir.path().join("absent.yaml"))).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.pagination.default_page_limit, 10);
    assert!(Config::load(None::<&str>).is_ok());
}

#[test]
fn test_out_of_range_offset() {
    let mut config = Config::default();
    config.storage.utc_offset_minutes = Some(24 * 60);

    assert!(matches!(config.storage.time_zone(), Err(AppError::Config(_))));
}

#[test]
fn test_load_nested_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(&path, SEED).unwrap();

    let users = load_records(&path, Some("users")).unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, "p1");
    assert_eq!(users[0].get_str("profile.gender"), Some("Female"));
    assert!(matches!(users[0].get("dependants"), Some(Value::Array(items)) if items.len() == 2));
}

#[test]
fn test_records_from_one_parsed_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(&path, SEED).unwrap();

    let document = read_document(&path).unwrap();

    assert_eq!(records_at(&document, Some("users")).unwrap().len(), 2);
    assert_eq!(records_at(&document, Some("appointments")).unwrap()[0].id, "a1");
    assert_eq!(records_at(&document, Some("lifeguards")).unwrap()[0].id, "l1");
    assert!(matches!(records_at(&document, None), Err(DataError::Parse(_))));
}

#[test]
fn test_logger_appends_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("backoffice.log");
    let logger = SimpleLogger::new(log::LevelFilter::Info, Some(path.as_path())).unwrap();

    logger.log(
        &log::Record::builder()
            .args(format_args!("seeded {} users", 2))
            .level(log::Level::Info)
            .target("seed")
            .build(),
    );
    logger.log(
        &log::Record::builder()
            .args(format_args!("below the level"))
            .level(log::Level::Debug)
            .target("seed")
            .build(),
    );
    logger.flush();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("INFO seed: seeded 2 users"));
}

#[test]
fn test_malformed_seed_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(&path, r#"{"users": [{"id": "p1"}]}"#).unwrap();

    assert!(matches!(load_records(&path, Some("users")), Err(DataError::Parse(_))));
    assert!(matches!(load_records(&path, Some("staff")), Err(DataError::Parse(_))));
    assert!(matches!(load_records(dir.path().join("nope.json"), None), Err(DataError::Io(_))));

    fs::write(&path, r#"[{"id": " ", "created_at": "2024-03-01T10:00:00Z"}]"#).unwrap();
    assert!(matches!(load_records(&path, None), Err(DataError::Validation(_))));
}

#[tokio::test]
async fn test_seeded_collections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(&path, SEED).unwrap();

    let collections = memory_collections(Some(path.as_path()), FixedOffset::east_opt(0).unwrap()).unwrap();

    assert_eq!(collections.users.count_matching(&Predicate::Any).await.unwrap(), 2);
    assert_eq!(collections.appointments.count_matching(&Predicate::Any).await.unwrap(), 1);

    let found = collections
        .lifeguards
        .ranked_search("tunde", &Predicate::Any, 10, 0)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let ada = collections
        .users
        .ranked_search("ada", &Predicate::eq("user_type", "PATIENT"), 10, 0)
        .await
        .unwrap();
    assert_eq!(ada[0].id, "p1");
}

#[test]
fn test_seed_missing_collection_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(&path, r#"{"users": [], "appointments": []}"#).unwrap();

    let result = memory_collections(Some(path.as_path()), FixedOffset::east_opt(0).unwrap());

    assert!(matches!(result, Err(StoreError::Data(DataError::Parse(_)))));
}
