use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::task::JoinHandle;
use uuid::Uuid;

use backend::booking::service::{BookingPolicy, BookingService};
use backend::db::Db;
use backend::http::{self, AppState};
use backend::inventory::repository_sqlx::SqlxInventoryRepository;

struct TestServer {
    base: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve the API over a fresh in-memory database on an ephemeral port.
async fn spawn_server(occupancy_ratio: f64) -> TestServer {
    sqlx::any::install_default_drivers();

    let conn_str = format!("sqlite:file:{}?mode=memory&cache=shared", Uuid::new_v4());
    let db = Db::connect(&conn_str, 5).await.unwrap();
    db.migrate().await.unwrap();

    let repo = Arc::new(SqlxInventoryRepository::new(db.pool.clone()));
    let service = Arc::new(BookingService::new(
        repo,
        BookingPolicy {
            max_attempts: 3,
            occupancy_ratio,
        },
    ));
    let app = http::app(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind listener");
    let addr: SocketAddr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    TestServer {
        base: format!("http://{addr}/api"),
        handle,
    }
}

async fn post_json(url: String, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("http post")
}

async fn post_empty(url: String) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .send()
        .await
        .expect("http post")
}

#[tokio::test]
async fn health_reports_ok() {
    let server = spawn_server(0.3).await;

    let body: Value = reqwest::get(server.url("/health"))
        .await
        .expect("http get")
        .json()
        .await
        .expect("decode json");
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn rooms_are_listed_in_floor_order_with_camel_case_fields() {
    let server = spawn_server(0.3).await;

    let response = reqwest::get(server.url("/rooms")).await.expect("http get");
    assert!(response.status().is_success());
    let rooms: Vec<Value> = response.json().await.expect("decode json");

    assert_eq!(rooms.len(), 97);
    assert_eq!(
        rooms[0],
        json!({ "roomNumber": "101", "floor": 1, "isBooked": false })
    );
    assert_eq!(rooms[96]["roomNumber"], "1007");
    assert_eq!(rooms[96]["floor"], 10);
}

#[tokio::test]
async fn book_returns_rooms_booking_and_travel_time() {
    let server = spawn_server(0.3).await;

    let response = post_json(server.url("/book"), json!({ "numRooms": 4 })).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("decode json");

    assert_eq!(body["success"], true);
    assert_eq!(body["totalTravelTime"], 3);
    assert_eq!(body["booking"]["roomNumbers"], json!(["101", "102", "103", "104"]));
    assert_eq!(body["booking"]["totalTravelTime"], 3);
    assert!(body["booking"]["id"].is_string());
    assert_eq!(body["selectedRooms"][0]["roomNumber"], "101");
    assert_eq!(body["selectedRooms"][0]["isBooked"], true);

    let available: Vec<Value> = reqwest::get(server.url("/available-rooms"))
        .await
        .expect("http get")
        .json()
        .await
        .expect("decode json");
    assert_eq!(available.len(), 93);
    assert_eq!(available[0]["roomNumber"], "105");

    let ledger: Vec<Value> = reqwest::get(server.url("/bookings"))
        .await
        .expect("http get")
        .json()
        .await
        .expect("decode json");
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0]["id"], body["booking"]["id"]);
}

#[tokio::test]
async fn out_of_range_counts_are_rejected() {
    let server = spawn_server(0.3).await;

    for n in [0, 6] {
        let response = post_json(server.url("/book"), json!({ "numRooms": n })).await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("decode json");
        assert_eq!(body["code"], "invalid_count");
    }
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let server = spawn_server(0.3).await;

    let response = post_json(server.url("/book"), json!({ "rooms": "three" })).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("decode json");
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn full_hotel_rejects_bookings_until_reset() {
    // Ratio 1.0 occupies every available room.
    let server = spawn_server(1.0).await;

    let response = post_empty(server.url("/random-occupancy")).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("decode json");
    assert_eq!(body["success"], true);
    assert_eq!(body["roomsBooked"].as_array().map(Vec::len), Some(97));
    assert_eq!(body["message"], "Marked 97 rooms as booked");

    let response = post_json(server.url("/book"), json!({ "numRooms": 1 })).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("decode json");
    assert_eq!(body["code"], "insufficient_inventory");

    let response = post_empty(server.url("/reset")).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("decode json");
    assert_eq!(body["success"], true);

    let response = post_json(server.url("/book"), json!({ "numRooms": 1 })).await;
    assert!(response.status().is_success());

    let ledger: Vec<Value> = reqwest::get(server.url("/bookings"))
        .await
        .expect("http get")
        .json()
        .await
        .expect("decode json");
    assert_eq!(ledger.len(), 1);
}
