use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use sabqcha_api::app;
use sabqcha_api::config::ApiConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    _blob_root: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory services, ephemeral port.
        let blob_root = tempfile::tempdir().expect("failed to create blob root");
        let config = ApiConfig {
            blob_root: blob_root.path().to_path_buf(),
            ..ApiConfig::default()
        };
        let services = Arc::new(app::services::build_services(&config));
        let router = app::build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url,
            handle,
            _blob_root: blob_root,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_and_list_lectures() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let room_id = uuid::Uuid::now_v7().to_string();

    let res = client
        .post(format!("{}/lecture", server.base_url))
        .json(&json!({
            "room_id": room_id,
            "file_path": "rooms/a/physics_class_9_part_1.mp3",
            "title": "Physics 9, part 1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let lecture_id = created["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/lecture/room/{}", server.base_url, room_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    let lectures = listed["lectures"].as_array().unwrap();
    assert_eq!(lectures.len(), 1);
    assert_eq!(lectures[0]["id"].as_str().unwrap(), lecture_id);
    assert_eq!(lectures[0]["transcribed"].as_bool().unwrap(), false);
}

#[tokio::test]
async fn create_lecture_rejects_bad_room_id() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/lecture", server.base_url))
        .json(&json!({
            "room_id": "not-a-uuid",
            "file_path": "rooms/a/lec.mp3",
            "title": "Physics",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transcribe_unknown_lecture_is_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/lecture/{}/transcribe",
            server.base_url,
            uuid::Uuid::now_v7()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transcribe_trigger_reports_in_progress() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let room_id = uuid::Uuid::now_v7().to_string();

    let res = client
        .post(format!("{}/lecture", server.base_url))
        .json(&json!({
            "room_id": room_id,
            "file_path": "rooms/a/lec.mp3",
            "title": "Physics",
        }))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    let lecture_id = created["id"].as_str().unwrap().to_string();

    // First trigger always wins the claim.
    let res = client
        .post(format!(
            "{}/lecture/{}/transcribe",
            server.base_url, lecture_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Tasks are being generated...");

    // A second trigger conflicts; whether the (quickly failing) background
    // run is still in flight decides which of the two messages comes back.
    let res = client
        .post(format!(
            "{}/lecture/{}/transcribe",
            server.base_url, lecture_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(
        message == "Tasks are being generated..."
            || message == "Tasks generated, please refresh page"
    );
}

#[tokio::test]
async fn grade_unknown_quiz_is_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/quiz/{}/solution/{}/grade",
            server.base_url,
            uuid::Uuid::now_v7(),
            uuid::Uuid::now_v7()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
