//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either an expected parse result or an expected error. Comparing parsed
//! values (not raw strings) avoids false negatives from field ordering.

use character_core::{ApiError, Character, CharacterClient, HttpMethod, HttpResponse, PageResponse};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> CharacterClient {
    CharacterClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_expected_error(name: &str, err: ApiError, expected: &serde_json::Value) {
    match expected["kind"].as_str().unwrap() {
        "remote" => {
            let status = expected["status"].as_u64().unwrap() as u16;
            assert_eq!(err.status(), Some(status), "{name}: status");
            assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
        }
        "decode" => assert!(matches!(err, ApiError::Decode(_)), "{name}: expected decode error, got {err:?}"),
        other => panic!("{name}: unknown error kind {other}"),
    }
}

// ---------------------------------------------------------------------------
// Fetch page
// ---------------------------------------------------------------------------

#[test]
fn fetch_page_test_vectors() {
    let raw = include_str!("../../test-vectors/fetch_page.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let page = case["input_page"].as_u64().unwrap() as u32;
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_fetch_page(page);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        // Verify parse
        let result = c.parse_page(simulated_response(case));
        if case.get("expected_error").is_some() {
            assert_expected_error(name, result.unwrap_err(), &case["expected_error"]);
        } else {
            let expected: PageResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch by id
// ---------------------------------------------------------------------------

#[test]
fn fetch_character_test_vectors() {
    let raw = include_str!("../../test-vectors/fetch_character.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_fetch_by_id(id);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let result = c.parse_character(simulated_response(case));
        if case.get("expected_error").is_some() {
            assert_expected_error(name, result.unwrap_err(), &case["expected_error"]);
        } else {
            let expected: Character = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
