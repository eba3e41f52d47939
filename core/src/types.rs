//! Domain DTOs for the character API.
//!
//! # Design
//! These types mirror the remote schema but are defined independently from
//! the mock-server crate; integration tests catch any drift between the two.
//! Every field carries `#[serde(default)]` so a 200 response whose body is
//! valid JSON but misses fields is accepted as-is and surfaces as empty
//! values downstream. Only a body that is not JSON at all fails to decode.

use serde::{Deserialize, Serialize};

/// A named reference to another API resource (origin, location).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Place {
    pub name: String,
    pub url: String,
}

/// A single character record returned by the API.
///
/// Read-only from this crate's perspective: nothing is ever sent upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Character {
    pub id: u64,
    pub name: String,
    /// Conventionally `Alive`, `Dead` or `unknown`, but free text.
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

impl Character {
    /// Label for the episode the character first appeared in, taken from the
    /// trailing segment of the first episode URL.
    pub fn first_seen(&self) -> Option<String> {
        let first = self.episode.first()?;
        let number = first.trim_end_matches('/').rsplit('/').next()?;
        if number.is_empty() {
            return None;
        }
        Some(format!("Episode {number}"))
    }
}

/// Pagination metadata of a list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageInfo {
    pub count: u64,
    pub pages: u32,
    /// URL of the next page; `None` iff this is the last page.
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of characters, in upstream order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageResponse {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl PageResponse {
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }
}
