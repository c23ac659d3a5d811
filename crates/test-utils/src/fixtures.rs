//! Canned service responses and well-known ids used across the test suite.

/// Experiment id used throughout the service documentation.
pub const EXPERIMENT_ID: u64 = 126862385;

/// Attachable id used for reference-aligned volume tests.
pub const ATTACHABLE_ID: u64 = 123456;

/// Successful RMA envelope with two experiment rows.
pub const EXPERIMENTS_RESPONSE: &str = r#"{
    "success": true,
    "id": 0,
    "start_row": 0,
    "num_rows": 2,
    "total_rows": 2,
    "msg": [
        {"id": 9, "failed": false, "specimen_id": 1001},
        {"id": 8, "failed": false, "specimen_id": 1002}
    ]
}"#;

/// Well-known file lookup returning a single download link.
pub const WELL_KNOWN_FILE_RESPONSE: &str = r#"{
    "success": true,
    "id": 0,
    "start_row": 0,
    "num_rows": 1,
    "total_rows": 1,
    "msg": [
        {"id": 42, "attachable_id": 123456, "download_link": "/path/to/link", "path": "/external/link.zip"}
    ]
}"#;

/// Failed RMA envelope; the service puts the error text in `msg`.
pub const FAILED_RESPONSE: &str = r#"{
    "success": false,
    "id": -1,
    "start_row": 0,
    "num_rows": 0,
    "total_rows": 0,
    "msg": "Data Access error in query: model::Nope"
}"#;

/// Successful envelope with no rows.
pub const EMPTY_RESPONSE: &str = r#"{"success": true, "id": 0, "start_row": 0, "num_rows": 0, "total_rows": 0, "msg": []}"#;
