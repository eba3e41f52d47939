use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Results per page, as served by the live API.
pub const PAGE_SIZE: usize = 20;
/// Character count of the live API.
pub const DEFAULT_CHARACTER_COUNT: usize = 826;

const PUBLIC_BASE: &str = "https://rickandmortyapi.com/api";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: Place,
    pub location: Place,
    pub image: String,
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: usize,
    pub pages: usize,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

// (name, status, species, type, gender, origin, location)
const SEEDS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("Rick Sanchez", "Alive", "Human", "", "Male", "Earth (C-137)", "Citadel of Ricks"),
    ("Morty Smith", "Alive", "Human", "", "Male", "unknown", "Citadel of Ricks"),
    ("Summer Smith", "Alive", "Human", "", "Female", "Earth (Replacement Dimension)", "Earth (Replacement Dimension)"),
    ("Beth Smith", "Alive", "Human", "", "Female", "Earth (Replacement Dimension)", "Earth (Replacement Dimension)"),
    ("Jerry Smith", "Alive", "Human", "", "Male", "Earth (Replacement Dimension)", "Earth (Replacement Dimension)"),
    ("Abadango Cluster Princess", "Alive", "Alien", "", "Female", "Abadango", "Abadango"),
    ("Abradolf Lincler", "unknown", "Human", "Genetic experiment", "Male", "Earth (Replacement Dimension)", "Testicle Monster Dimension"),
    ("Adjudicator Rick", "Dead", "Human", "", "Male", "unknown", "Citadel of Ricks"),
    ("Agency Director", "Dead", "Human", "", "Male", "Earth (Replacement Dimension)", "Earth (Replacement Dimension)"),
    ("Alan Rails", "Dead", "Human", "Superhuman (Ghost trains summoner)", "Male", "unknown", "Worldender's lair"),
    ("Albert Einstein", "Dead", "Human", "", "Male", "Earth (C-137)", "Earth (Replacement Dimension)"),
    ("Alexander", "Dead", "Human", "", "Male", "Earth (C-137)", "Anatomy Park"),
    ("Alien Googah", "unknown", "Alien", "", "unknown", "unknown", "Earth (Replacement Dimension)"),
    ("Alien Morty", "unknown", "Alien", "", "Male", "unknown", "Citadel of Ricks"),
    ("Alien Rick", "unknown", "Alien", "", "Male", "unknown", "Citadel of Ricks"),
    ("Amish Cyborg", "Dead", "Alien", "Parasite", "Male", "unknown", "Earth (Replacement Dimension)"),
    ("Annie", "Alive", "Human", "", "Female", "Earth (C-137)", "Anatomy Park"),
    ("Antenna Morty", "Alive", "Human", "Human with antennae", "Male", "unknown", "Citadel of Ricks"),
    ("Antenna Rick", "unknown", "Human", "Human with antennae", "Male", "unknown", "unknown"),
    ("Ants in my Eyes Johnson", "unknown", "Human", "Human with ants in his eyes", "Male", "unknown", "Interdimensional Cable"),
];

/// Deterministic stand-in for the live dataset: ids start at 1 and names
/// cycle through a fixed list.
pub fn seed_characters(count: usize) -> Vec<Character> {
    (0..count)
        .map(|i| {
            let (name, status, species, kind, gender, origin, location) = SEEDS[i % SEEDS.len()];
            let round = i / SEEDS.len();
            let id = i as u64 + 1;
            Character {
                id,
                name: if round == 0 { name.to_string() } else { format!("{name} #{}", round + 1) },
                status: status.to_string(),
                species: species.to_string(),
                kind: kind.to_string(),
                gender: gender.to_string(),
                origin: Place {
                    name: origin.to_string(),
                    url: String::new(),
                },
                location: Place {
                    name: location.to_string(),
                    url: String::new(),
                },
                image: format!("{PUBLIC_BASE}/character/avatar/{id}.jpeg"),
                episode: vec![format!("{PUBLIC_BASE}/episode/{}", i % 51 + 1)],
                url: format!("{PUBLIC_BASE}/character/{id}"),
                created: "2017-11-04T18:48:46.250Z".to_string(),
            }
        })
        .collect()
}

struct Inner {
    characters: Vec<Character>,
    faults: Mutex<HashMap<u32, VecDeque<u16>>>,
    requests: AtomicU64,
}

/// Shared handle to the served dataset and its test hooks. Clones share
/// state, so a test can keep one while the server runs with another.
#[derive(Clone)]
pub struct MockServer {
    inner: Arc<Inner>,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new(DEFAULT_CHARACTER_COUNT)
    }
}

impl MockServer {
    pub fn new(count: usize) -> Self {
        Self::with_characters(seed_characters(count))
    }

    pub fn with_characters(characters: Vec<Character>) -> Self {
        Self {
            inner: Arc::new(Inner {
                characters,
                faults: Mutex::new(HashMap::new()),
                requests: AtomicU64::new(0),
            }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/character", get(list_characters))
            .route("/character/{id}", get(get_character))
            .layer(TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    /// Answer the next request for `page` with `status` instead of data.
    pub fn fail_next(&self, page: u32, status: u16) {
        let mut faults = self.inner.faults.lock().unwrap_or_else(|e| e.into_inner());
        faults.entry(page).or_default().push_back(status);
    }

    /// Requests served so far, failures included.
    pub fn request_count(&self) -> u64 {
        self.inner.requests.load(Ordering::SeqCst)
    }

    pub fn pages(&self) -> usize {
        self.inner.characters.len().div_ceil(PAGE_SIZE)
    }

    fn take_fault(&self, page: u32) -> Option<u16> {
        let mut faults = self.inner.faults.lock().unwrap_or_else(|e| e.into_inner());
        faults.get_mut(&page)?.pop_front()
    }

    fn count_request(&self) {
        self.inner.requests.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn app() -> Router {
    MockServer::default().router()
}

pub async fn serve(listener: TcpListener, server: MockServer) -> Result<(), std::io::Error> {
    axum::serve(listener, server.router()).await
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Scheme and authority the client used, for building `next`/`prev` links.
fn origin(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

async fn list_characters(
    State(server): State<MockServer>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    server.count_request();
    let page = query
        .page
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    if let Some(status) = server.take_fault(page) {
        tracing::warn!(page, status, "injected failure");
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error_body(status, "Injected failure");
    }

    let pages = server.pages();
    let index = page as usize;
    if index > pages {
        return error_body(StatusCode::NOT_FOUND, "There is nothing here");
    }

    let base = origin(&headers);
    let characters = &server.inner.characters;
    let start = (index - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(characters.len());
    let response = PageResponse {
        info: PageInfo {
            count: characters.len(),
            pages,
            next: (index < pages).then(|| format!("{base}/character?page={}", index + 1)),
            prev: (index > 1).then(|| format!("{base}/character?page={}", index - 1)),
        },
        results: characters[start..end].to_vec(),
    };
    Json(response).into_response()
}

async fn get_character(State(server): State<MockServer>, Path(id): Path<String>) -> Response {
    server.count_request();
    let Ok(id) = id.parse::<u64>() else {
        return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Hey! you must provide an id");
    };
    match server.inner.characters.iter().find(|c| c.id == id) {
        Some(character) => Json(character.clone()).into_response(),
        None => error_body(StatusCode::NOT_FOUND, "Character not found"),
    }
}
