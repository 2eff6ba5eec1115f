#![allow(dead_code)]

use fash_ai::{FashClient, ManualClock};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const IDENTITY: &str = "00000000-0000-4000-8000-000000000000";
pub const TOKEN: &str = "challenge-token-1";
pub const CREATION_ID: &str = "creation-123";

/// A client pointed at the mock server with a fixed identity and a virtual clock.
pub fn test_client(server: &MockServer) -> (FashClient, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let client = FashClient::new_with_url(&server.uri())
        .unwrap()
        .with_identity(IDENTITY)
        .with_clock(clock.clone());
    (client, clock)
}

pub fn slot_json(server: &MockServer, i: usize) -> serde_json::Value {
    json!({
        "put": format!("{}/put/{}", server.uri(), i),
        "get": format!("https://cdn.example.com/media/{}.png", i),
    })
}

pub async fn mount_challenge(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/sys/challenge/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "challenge_token": token }
        })))
        .mount(server)
        .await;
}

/// Issues `count` slots whose write targets live on the mock server.
pub async fn mount_slots(server: &MockServer, count: usize) {
    let slots: Vec<_> = (0..count).map(|i| slot_json(server, i)).collect();
    Mock::given(method("GET"))
        .and(path("/aigc/file/upload/request"))
        .and(query_param("f_suffix", "png"))
        .and(query_param("count", count.to_string()))
        .and(query_param("unsafe", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": slots })))
        .mount(server)
        .await;
}

pub async fn mount_put_targets(server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path_regex(r"^/put/\d+$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

pub async fn mount_create(server: &MockServer, creation_id: &str) {
    Mock::given(method("POST"))
        .and(path("/aigc/task/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "creation_id": creation_id }
        })))
        .mount(server)
        .await;
}

pub fn result_list() -> serde_json::Value {
    json!([{ "url": "https://cdn.example.com/out/final.png", "width": 1024, "height": 1280 }])
}

/// Replies to successive status queries with the given codes, repeating the last one.
pub struct StatusSequence {
    codes: Vec<i64>,
    calls: AtomicUsize,
}

impl StatusSequence {
    pub fn new(codes: &[i64]) -> Self {
        Self {
            codes: codes.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl wiremock::Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let code = self.codes[n.min(self.codes.len() - 1)];
        let list = if code == 2 { result_list() } else { json!([]) };

        ResponseTemplate::new(200).set_body_json(json!({
            "data": { "status": code, "list": list }
        }))
    }
}

pub async fn mount_status(server: &MockServer, creation_id: &str, codes: &[i64]) {
    Mock::given(method("GET"))
        .and(path("/aigc/task/result/get"))
        .and(query_param("creation_id", creation_id))
        .respond_with(StatusSequence::new(codes))
        .mount(server)
        .await;
}

/// Replies to successive status queries with the given `data` payloads, repeating the last one.
pub struct DataSequence {
    payloads: Vec<serde_json::Value>,
    calls: AtomicUsize,
}

impl DataSequence {
    pub fn new(payloads: Vec<serde_json::Value>) -> Self {
        Self {
            payloads,
            calls: AtomicUsize::new(0),
        }
    }
}

impl wiremock::Respond for DataSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let data = &self.payloads[n.min(self.payloads.len() - 1)];
        ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
    }
}

/// Mounts every upstream endpoint for a run that succeeds on the first poll.
pub async fn mount_happy_path(server: &MockServer, images: usize) {
    mount_challenge(server, TOKEN).await;
    mount_slots(server, images).await;
    mount_put_targets(server).await;
    mount_create(server, CREATION_ID).await;
    mount_status(server, CREATION_ID, &[2]).await;
}

/// JSON body of the single task creation request the server received.
pub async fn create_task_body(server: &MockServer) -> serde_json::Value {
    let requests = server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|r| r.url.path() == "/aigc/task/create")
        .expect("task creation request");
    serde_json::from_slice(&create.body).unwrap()
}
