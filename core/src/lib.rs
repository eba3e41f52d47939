//! Sans-IO core of the character browser.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! character API without touching the network (host-does-IO pattern), and
//! layers the browsing logic on top: a keyed query cache, the page
//! controller and the character cards. The host executes the actual HTTP
//! round-trips and draws the `PageView` snapshots.
//!
//! # Design
//! - `CharacterClient` is stateless; it holds only `base_url`.
//! - `QueryCache` hands out generation-tagged tickets instead of performing
//!   requests, so coalescing and stale-response handling stay deterministic.
//! - `PageController` owns all mutable UI state; `snapshot` derives an
//!   immutable view from it.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod cache;
pub mod card;
pub mod client;
pub mod controller;
pub mod error;
pub mod filter;
pub mod http;
pub mod types;

pub use cache::{Completion, FetchTicket, QueryCache, QueryKey, QueryState, Resource};
pub use card::{status_color, CardLayout, CardTarget, CharacterCard, MountedCards, StatusColor};
pub use client::{CharacterClient, DEFAULT_BASE_URL};
pub use controller::{
    FilterMode, Level, Notification, Notifier, PageController, PageTicket, PageView, Pagination,
    ViewBody,
};
pub use error::{ApiError, TransportError};
pub use filter::filter_by_name;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Character, PageInfo, PageResponse, Place};
