//! Gateway Integration Tests
//!
//! Drives the presence gateway over real WebSocket connections.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{roster_entry, GatewayClient, TestServer};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

/// Window used to assert that something does *not* happen
const QUIET: Duration = Duration::from_millis(300);

/// Read roster broadcasts until `user_id` shows `status`
async fn wait_for_status(client: &mut GatewayClient, user_id: &str, status: &str) -> Value {
    loop {
        let roster = client.expect_event("users:update").await.unwrap();
        if roster_entry(&roster, user_id).is_some_and(|user| user["status"] == status) {
            return roster;
        }
    }
}

async fn connect_as(server: &TestServer, user_id: &str) -> GatewayClient {
    let mut client = server.connect_gateway().await.unwrap();
    client.emit("user:connect", json!(user_id)).await.unwrap();
    client.expect_event("users:list").await.unwrap();
    client
}

#[tokio::test]
async fn test_connect_broadcasts_presence() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_gateway().await.unwrap();

    let mut doctor = server.connect_gateway().await.unwrap();
    doctor.emit("user:connect", json!("1")).await.unwrap();

    let update = doctor.expect_event("users:update").await.unwrap();
    let list = doctor.expect_event("users:list").await.unwrap();
    assert_eq!(update, list);
    assert_eq!(roster_entry(&list, "1").unwrap()["status"], "online");
    assert_eq!(list.as_array().unwrap().len(), 6);

    let roster = wait_for_status(&mut observer, "1", "online").await;
    assert_eq!(roster_entry(&roster, "2").unwrap()["status"], "offline");
}

#[tokio::test]
async fn test_join_and_leave_notify_room() {
    let server = TestServer::start().await.unwrap();
    let room_id = server.create_room("1", "Bác sĩ A").await.unwrap();

    let mut a = connect_as(&server, "1").await;
    let mut b = connect_as(&server, "2").await;

    a.emit("room:join", json!({"userId": "1", "roomId": room_id})).await.unwrap();
    let joined = a.expect_event("room:user-joined").await.unwrap();
    assert_eq!(joined, json!({"userId": "1", "userName": "Bác sĩ A"}));

    b.emit("room:join", json!({"userId": "2", "roomId": room_id})).await.unwrap();
    // the roster goes out before the room notice
    let roster = wait_for_status(&mut a, "2", "in-meeting").await;
    assert_eq!(roster_entry(&roster, "2").unwrap()["currentRoom"], room_id);
    let joined = a.expect_event("room:user-joined").await.unwrap();
    assert_eq!(joined["userId"], "2");

    b.emit("room:leave", json!({"userId": "2", "roomId": room_id})).await.unwrap();
    let left = a.expect_event("room:user-left").await.unwrap();
    assert_eq!(left, json!({"userId": "2", "userName": "Bác sĩ B"}));
    b.expect_no_event("room:user-left", QUIET).await.unwrap();

    // presence joins are mirrored into the room registry
    let response = server.get(&format!("/api/rooms/{room_id}")).await.unwrap();
    let body: Value = response.json().await.unwrap();
    let participants = body["room"]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["userId"], "1");
}

#[tokio::test]
async fn test_transcript_reaches_only_room_members() {
    let server = TestServer::start().await.unwrap();

    let mut a = connect_as(&server, "1").await;
    let mut b = connect_as(&server, "2").await;
    let mut c = connect_as(&server, "3").await;

    a.emit("room:join", json!({"userId": "1", "roomId": "room-x"})).await.unwrap();
    a.expect_event("room:user-joined").await.unwrap();
    b.emit("room:join", json!({"userId": "2", "roomId": "room-x"})).await.unwrap();
    b.expect_event("room:user-joined").await.unwrap();
    c.emit("room:join", json!({"userId": "3", "roomId": "room-y"})).await.unwrap();
    c.expect_event("room:user-joined").await.unwrap();

    let transcript = json!({"THONG_TIN_HOI_CHAN": {"chuTri": "Bác sĩ A"}});
    a.emit("meeting:ended", json!({"roomId": "room-x", "transcript": transcript}))
        .await
        .unwrap();

    assert_eq!(a.expect_event("transcript:received").await.unwrap(), transcript);
    assert_eq!(b.expect_event("transcript:received").await.unwrap(), transcript);
    c.expect_no_event("transcript:received", QUIET).await.unwrap();
}

#[tokio::test]
async fn test_disconnect_marks_user_offline() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_gateway().await.unwrap();

    let nurse = connect_as(&server, "3").await;
    wait_for_status(&mut observer, "3", "online").await;

    nurse.close().await.unwrap();

    let roster = wait_for_status(&mut observer, "3", "offline").await;
    let entry = roster_entry(&roster, "3").unwrap();
    assert!(entry["currentRoom"].is_null());
}

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_gateway().await.unwrap();

    client.send_raw(Message::Text("not json".to_string())).await.unwrap();
    client.send_raw(Message::Binary(vec![1, 2, 3])).await.unwrap();
    client.emit("room:explode", json!({})).await.unwrap();
    client.emit("room:join", json!({"userId": "1"})).await.unwrap();

    // still usable afterwards
    client.emit("user:connect", json!("4")).await.unwrap();
    let list = client.expect_event("users:list").await.unwrap();
    assert_eq!(roster_entry(&list, "4").unwrap()["status"], "online");
}

#[tokio::test]
async fn test_unknown_user_is_ignored() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_gateway().await.unwrap();
    let mut client = server.connect_gateway().await.unwrap();

    client.emit("user:connect", json!("99")).await.unwrap();
    client.emit("room:join", json!({"userId": "99", "roomId": "r"})).await.unwrap();

    client.expect_no_event("users:list", QUIET).await.unwrap();
    observer.expect_no_event("users:update", QUIET).await.unwrap();
}

#[tokio::test]
async fn test_join_without_connect_leaves_presence_untouched() {
    let server = TestServer::start().await.unwrap();
    let room_id = server.create_room("1", "Bác sĩ A").await.unwrap();
    let mut observer = server.connect_gateway().await.unwrap();

    let mut anonymous = server.connect_gateway().await.unwrap();
    anonymous
        .emit("room:join", json!({"userId": "1", "roomId": room_id}))
        .await
        .unwrap();
    anonymous.expect_no_event("room:user-joined", QUIET).await.unwrap();
    observer.expect_no_event("users:update", QUIET).await.unwrap();
    anonymous.close().await.unwrap();

    let mut check = server.connect_gateway().await.unwrap();
    check.emit("user:connect", json!("3")).await.unwrap();
    let list = check.expect_event("users:list").await.unwrap();
    let entry = roster_entry(&list, "1").unwrap();
    assert_eq!(entry["status"], "offline");
    assert!(entry["currentRoom"].is_null());
}
