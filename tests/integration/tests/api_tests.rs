//! API Integration Tests
//!
//! Each test boots the full application on an ephemeral port. No external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, test_issuer, TestServer, TEST_MEDIA_URL};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");

    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ok");
}

// ============================================================================
// Identity Tests
// ============================================================================

#[tokio::test]
async fn test_list_users() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/auth/users").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["success"], true);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 6);
    assert_eq!(users[0], json!({"id": "1", "name": "Bác sĩ A", "role": "doctor", "avatar": "👨‍⚕️"}));
    // presence is not part of the public roster
    assert!(users[0].get("status").is_none());
}

#[tokio::test]
async fn test_select_user() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/auth/select-user", &json!({"userId": "3"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["user"]["name"], "Điều dưỡng C");
    assert!(body["token"].as_str().unwrap().starts_with("simple-token-3-"));

    let response = server
        .post("/api/auth/select-user", &json!({"userId": "99"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body["success"], false);

    let response = server.post("/api/auth/select-user", &json!({})).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_create_room_issues_credential() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/rooms/create", &json!({"userId": "1", "userName": "Bác sĩ A"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["success"], true);
    let room = &body["room"];
    assert_eq!(room["roomId"], "bac-si-a");
    assert_eq!(room["roomName"], "room-bac-si-a");
    assert_eq!(room["mediaUrl"], TEST_MEDIA_URL);

    let claims = test_issuer().verify(room["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, "1");
    assert_eq!(claims.name, "Bác sĩ A");
    assert_eq!(claims.video.room, "room-bac-si-a");
    assert!(claims.video.room_join);

    // same creator name again gets the next slug
    let second = server.create_room("1", "Bác sĩ A").await.unwrap();
    assert_eq!(second, "bac-si-a-2");
}

#[tokio::test]
async fn test_create_room_requires_fields() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/rooms/create", &json!({"userId": "1"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let response = server
        .client
        .post(format!("{}/api/rooms/create", server.base_url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_room_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let room_id = server.create_room("1", "Bác sĩ A").await.unwrap();

    // fresh room has no participants
    let response = server.get(&format!("/api/rooms/{room_id}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["room"]["roomId"], room_id);
    assert_eq!(body["room"]["participants"], json!([]));

    // join twice: one entry
    for _ in 0..2 {
        let response = server
            .post(
                "/api/rooms/join",
                &json!({"roomId": room_id, "userId": "2", "userName": "Bác sĩ B"}),
            )
            .await
            .unwrap();
        let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body["room"]["participants"].as_array().unwrap().len(), 1);
    }

    // leave twice: both acknowledged
    for _ in 0..2 {
        let response = server
            .post(&format!("/api/rooms/{room_id}/leave"), &json!({"userId": "2"}))
            .await
            .unwrap();
        let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body["message"], "Left room successfully");
    }

    // end removes the room
    let response = server.post_empty(&format!("/api/rooms/{room_id}/end")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["message"], "Meeting ended successfully");
    assert_eq!(body["recording"]["stopped"], false);

    let response = server.get(&format!("/api/rooms/{room_id}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body["error"]["code"], "UNKNOWN_ROOM");

    let response = server.post_empty(&format!("/api/rooms/{room_id}/end")).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_room_capacity() {
    let server = TestServer::start().await.unwrap();
    let room_id = server.create_room("1", "Bác sĩ A").await.unwrap();

    for id in 1..=5 {
        let response = server
            .post(
                "/api/rooms/join",
                &json!({"roomId": room_id, "userId": id.to_string(), "userName": format!("User {id}")}),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let response = server
        .post(
            "/api/rooms/join",
            &json!({"roomId": room_id, "userId": "6", "userName": "Y tá F"}),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body["error"]["code"], "ROOM_FULL");

    let response = server.get(&format!("/api/rooms/{room_id}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["room"]["participants"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_join_unknown_room() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            "/api/rooms/join",
            &json!({"roomId": "ghost", "userId": "2", "userName": "Bác sĩ B"}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_store_transcript() {
    let server = TestServer::start().await.unwrap();
    let room_id = server.create_room("1", "Bác sĩ A").await.unwrap();
    let record = json!({"NOI_DUNG_CHUYEN_MON": {"chanDoan": "Viêm phế quản cấp"}});

    let response = server
        .put(&format!("/api/rooms/{room_id}/transcript"), &json!({"transcript": record}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["room"]["transcriptData"], record);

    let response = server
        .put(&format!("/api/rooms/{room_id}/transcript"), &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Export Tests
// ============================================================================

#[tokio::test]
async fn test_export_document_download() {
    let server = TestServer::start().await.unwrap();
    let transcript = json!({
        "THONG_TIN_HOI_CHAN": {"chuTri": "Bác sĩ A", "ngayHoiChan": "19/10/2026"},
        "NOI_DUNG_CHUYEN_MON": {"chanDoan": "Viêm phế quản cấp"}
    });

    let response = server
        .post(
            "/api/export/document",
            &json!({"transcriptData": transcript, "roomId": "bac-si-a"}),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"bien_ban_bac-si-a_"));

    let text = response.text().await.unwrap();
    assert!(text.contains("BIÊN BẢN HỘI CHẨN"));
    assert!(text.contains("Chủ trì: Bác sĩ A"));
    assert!(text.contains("Viêm phế quản cấp"));

    let written = std::fs::read_dir(server.export_dir()).unwrap().count();
    assert_eq!(written, 1);
}

#[tokio::test]
async fn test_export_requires_transcript() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/export/document", &json!({"roomId": "r"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["success"], false);
}

// ============================================================================
// CORS Tests
// ============================================================================

#[tokio::test]
async fn test_cors_allows_lan_frontend() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .client
        .get(format!("{}/api/auth/users", server.base_url()))
        .header("origin", "http://192.168.1.20:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://192.168.1.20:3000"
    );

    let response = server
        .client
        .get(format!("{}/api/auth/users", server.base_url()))
        .header("origin", "https://evil.example.org")
        .send()
        .await
        .unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
