use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Character, MockServer, PageResponse, PAGE_SIZE};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::HOST, "api.test")
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn first_page_links_forward_only() {
    let resp = app().oneshot(get("/character?page=1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let page: PageResponse = body_json(resp).await;
    assert_eq!(page.info.count, 826);
    assert_eq!(page.info.pages, 42);
    assert_eq!(page.info.next.as_deref(), Some("http://api.test/character?page=2"));
    assert_eq!(page.info.prev, None);
    assert_eq!(page.results.len(), PAGE_SIZE);
    assert_eq!(page.results[0].name, "Rick Sanchez");
}

#[tokio::test]
async fn missing_page_parameter_serves_first_page() {
    let resp = app().oneshot(get("/character")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: PageResponse = body_json(resp).await;
    assert_eq!(page.results[0].id, 1);
}

#[tokio::test]
async fn page_zero_serves_first_page() {
    let resp = app().oneshot(get("/character?page=0")).await.unwrap();
    let page: PageResponse = body_json(resp).await;
    assert_eq!(page.results[0].id, 1);
}

#[tokio::test]
async fn last_page_is_partial_and_has_no_next() {
    let resp = app().oneshot(get("/character?page=42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let page: PageResponse = body_json(resp).await;
    assert_eq!(page.results.len(), 826 - 41 * PAGE_SIZE);
    assert_eq!(page.info.next, None);
    assert_eq!(page.info.prev.as_deref(), Some("http://api.test/character?page=41"));
}

#[tokio::test]
async fn page_past_the_end_returns_404() {
    let resp = app().oneshot(get("/character?page=43")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "There is nothing here");
}

// --- get ---

#[tokio::test]
async fn get_character_by_id() {
    let resp = app().oneshot(get("/character/2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let morty: Character = body_json(resp).await;
    assert_eq!(morty.id, 2);
    assert_eq!(morty.name, "Morty Smith");
}

#[tokio::test]
async fn get_character_not_found() {
    let resp = app().oneshot(get("/character/9999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Character not found");
}

#[tokio::test]
async fn get_character_bad_id_returns_500() {
    let resp = app().oneshot(get("/character/not-a-number")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_bytes(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("you must provide an id"));
}

// --- test hooks ---

#[tokio::test]
async fn injected_failure_hits_once_then_recovers() {
    let server = MockServer::new(45);
    server.fail_next(1, 500);

    let resp = server.router().oneshot(get("/character?page=1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = server.router().oneshot(get("/character?page=1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: PageResponse = body_json(resp).await;
    assert_eq!(page.info.pages, 3);

    assert_eq!(server.request_count(), 2);
}

#[tokio::test]
async fn empty_dataset_has_nothing_to_list() {
    let server = MockServer::new(0);
    let resp = server.router().oneshot(get("/character?page=1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
