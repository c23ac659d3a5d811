//! `HttpTransport` against a local mock server.

use atlas_common::{ApiConfig, TransferError};
use connectivity_api::{ApiError, HttpTransport, MouseConnectivityApi, Transport};
use test_utils::{gzip_f32_le_nrrd, temp_test_dir, EXPERIMENTS_RESPONSE, WELL_KNOWN_FILE_RESPONSE};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::new(&ApiConfig::with_base_url(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_json_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/data/query.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EXPERIMENTS_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/api/v2/data/query.json?q=model::SectionDataSet", server.uri());
    let body = transport(&server).json_query(&url).await.unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["msg"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_json_query_invalid_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .json_query(&format!("{}/api/v2/data/query.json", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, TransferError::Body { .. }));
}

#[tokio::test]
async fn test_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = transport(&server)
        .json_query(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_retrieve_file() {
    let server = MockServer::start().await;
    let body = gzip_f32_le_nrrd(&[2, 2], &[0.0, 0.5, 1.0, 1.5]);
    Mock::given(method("GET"))
        .and(path("/grid_data/download_file/126862385"))
        .and(query_param("image", "injection_density"))
        .and(query_param("resolution", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = temp_test_dir();
    let destination = dir.path().join("injection_density_100.nrrd");
    let url = format!(
        "{}/grid_data/download_file/126862385?image=injection_density&resolution=100",
        server.uri()
    );

    transport(&server).retrieve_file(&url, &destination).await.unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), body);
    assert!(!dir.path().join("injection_density_100.nrrd.partial").exists());
}

#[tokio::test]
async fn test_retrieve_file_error_leaves_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = temp_test_dir();
    let destination = dir.path().join("annotation_25.nrrd");

    let err = transport(&server)
        .retrieve_file(&format!("{}/annotation_25.nrrd", server.uri()), &destination)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert!(!destination.exists());
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_failed_rename_removes_partial_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"NRRD0004\n".to_vec()))
        .mount(&server)
        .await;

    // A non-empty directory at the destination makes the final rename fail.
    let dir = temp_test_dir();
    let destination = dir.path().join("annotation_25.nrrd");
    std::fs::create_dir(&destination).unwrap();
    std::fs::write(destination.join("occupied"), b"x").unwrap();

    let err = transport(&server)
        .retrieve_file(&format!("{}/annotation_25.nrrd", server.uri()), &destination)
        .await
        .unwrap_err();

    assert!(matches!(err, TransferError::Io(_)));
    assert!(!dir.path().join("annotation_25.nrrd.partial").exists());
}

#[tokio::test]
async fn test_client_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/data/query.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WELL_KNOWN_FILE_RESPONSE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/path/to/link"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
        .mount(&server)
        .await;

    let dir = temp_test_dir();
    let target = dir.path().join("volumes").join("123456.zip");
    let api = MouseConnectivityApi::new(&ApiConfig::with_base_url(&server.uri())).unwrap();

    let saved = api
        .download_reference_aligned_image_channel_volumes(123456, Some(target.as_path()))
        .await
        .unwrap();

    assert_eq!(saved, target);
    assert_eq!(std::fs::read(&target).unwrap(), b"PK\x03\x04");
}

#[tokio::test]
async fn test_client_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = MouseConnectivityApi::new(&ApiConfig::with_base_url(&server.uri())).unwrap();
    let err = api.get_experiments(None::<u64>).await.unwrap_err();

    match err {
        ApiError::Transfer(e) => assert_eq!(e.status_code(), Some(503)),
        other => panic!("expected transfer error, got {:?}", other),
    }
}
