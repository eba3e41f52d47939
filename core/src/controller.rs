//! Page controller: navigation, search and selection over the query cache.
//!
//! # Design
//! The controller owns the only mutable UI state (`page`, `search_term`,
//! `selected`) together with the client and the page cache. It performs no
//! I/O. After every state change the host asks `pending_fetch` whether the
//! current page needs a request, runs it, and reports back through
//! `complete`. What to draw is always derived from scratch by `snapshot`, so
//! rendering is a pure function of the latest `PageView`.

use crate::cache::{Completion, FetchTicket, QueryCache, QueryKey};
use crate::client::CharacterClient;
use crate::error::{ApiError, TransportError};
use crate::filter::filter_by_name;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Character, PageResponse};

/// Title of the notification raised when a page fails to load.
pub const LOAD_ERROR_TITLE: &str = "Error loading characters";

pub type PageTicket = FetchTicket<QueryKey>;

/// Sink for transient, fire-and-forget notifications.
pub trait Notifier {
    fn success(&mut self, title: &str, description: &str);
    fn error(&mut self, title: &str, description: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: String,
}

/// Collects notifications in order, for hosts that drain them after each
/// step.
impl Notifier for Vec<Notification> {
    fn success(&mut self, title: &str, description: &str) {
        self.push(Notification {
            level: Level::Success,
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    fn error(&mut self, title: &str, description: &str) {
        self.push(Notification {
            level: Level::Error,
            title: title.to_string(),
            description: description.to_string(),
        });
    }
}

/// Highlighted quick filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// No search term: the whole page is shown.
    All,
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    /// Total page count reported upstream, at least 1.
    pub pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    Loading,
    /// Any failure, whatever its kind. The host offers a retry.
    Failed { message: String },
    Loaded {
        characters: Vec<Character>,
        pagination: Pagination,
    },
}

/// Everything needed to draw the page, detached from the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: u32,
    pub search_term: String,
    pub filter: FilterMode,
    /// Number of characters matching the search on the loaded page.
    pub match_count: usize,
    pub selected: Option<Character>,
    pub body: ViewBody,
}

#[derive(Debug)]
pub struct PageController<N> {
    client: CharacterClient,
    cache: QueryCache<QueryKey, PageResponse>,
    notifier: N,
    page: u32,
    search_term: String,
    selected: Option<Character>,
}

impl<N: Notifier> PageController<N> {
    pub fn new(client: CharacterClient, notifier: N) -> Self {
        Self {
            client,
            cache: QueryCache::new(),
            notifier,
            page: 1,
            search_term: String::new(),
            selected: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected(&self) -> Option<&Character> {
        self.selected.as_ref()
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::characters(self.page)
    }

    pub fn client(&self) -> &CharacterClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache<QueryKey, PageResponse> {
        &self.cache
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Current page's data, if loaded.
    pub fn current(&self) -> Option<&PageResponse> {
        self.cache.state(&self.key()).data
    }

    /// Jump to `page`. Rejected for page 0. Arriving at a page forgets its
    /// old error so it is fetched again.
    pub fn set_page(&mut self, page: u32) -> bool {
        if page < 1 {
            tracing::debug!(page, "rejected page number");
            return false;
        }
        if page != self.page {
            tracing::info!(from = self.page, to = page, "changing page");
            self.cache.clear_error(&QueryKey::characters(page));
            self.page = page;
        }
        true
    }

    /// No-op unless the loaded page reports a next page.
    pub fn next_page(&mut self) -> bool {
        if !self.current().is_some_and(PageResponse::has_next) {
            return false;
        }
        self.page.checked_add(1).is_some_and(|p| self.set_page(p))
    }

    /// No-op on page 1.
    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.set_page(self.page - 1)
    }

    /// Replace the search term. The page is left alone, so the search only
    /// covers the page already loaded.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
    }

    /// Request the current page needs, if any. Coalesced with a request
    /// already in flight and skipped when the page is cached.
    pub fn pending_fetch(&mut self) -> Option<PageTicket> {
        self.cache.fetch(&self.key())
    }

    /// Fetch the current page again regardless of what is cached.
    pub fn retry(&mut self) -> PageTicket {
        tracing::info!(page = self.page, "retrying");
        self.cache.refetch(&self.key())
    }

    /// Forget the in-flight request for the current page.
    pub fn cancel(&mut self) {
        self.cache.cancel(&self.key());
    }

    pub fn request_for(&self, ticket: &PageTicket) -> HttpRequest {
        self.client.build_fetch_page(ticket.key().page)
    }

    /// Parse and store the outcome of `ticket`. A failure landing on the
    /// page being viewed raises an error notification.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        response: Result<HttpResponse, TransportError>,
    ) -> Completion {
        let key = *ticket.key();
        let result = match response {
            Ok(response) => self.client.parse_page(response),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching characters");
                Err(ApiError::from(e))
            }
        };
        let failure = result.as_ref().err().map(ToString::to_string);

        let completion = self.cache.complete(ticket, result);
        if completion == Completion::Applied && key == self.key() {
            if let Some(message) = failure {
                self.notifier.error(LOAD_ERROR_TITLE, &message);
            }
        }
        completion
    }

    /// Record a card click and announce it.
    pub fn select(&mut self, character: Character) {
        let title = format!("Selected: {}", character.name);
        let description = format!("Status: {} - Species: {}", character.status, character.species);
        self.notifier.success(&title, &description);
        self.selected = Some(character);
    }

    pub fn snapshot(&self) -> PageView {
        let state = self.cache.state(&self.key());

        let body = if state.is_loading {
            ViewBody::Loading
        } else if let Some(error) = state.error {
            ViewBody::Failed {
                message: error.to_string(),
            }
        } else if let Some(data) = state.data {
            ViewBody::Loaded {
                characters: filter_by_name(&data.results, &self.search_term)
                    .into_iter()
                    .cloned()
                    .collect(),
                pagination: Pagination {
                    page: self.page,
                    pages: data.info.pages.max(1),
                    has_prev: self.page > 1,
                    has_next: data.has_next(),
                },
            }
        } else {
            ViewBody::Loading
        };

        let match_count = match &body {
            ViewBody::Loaded { characters, .. } => characters.len(),
            _ => 0,
        };

        PageView {
            page: self.page,
            search_term: self.search_term.clone(),
            filter: if self.search_term.is_empty() {
                FilterMode::All
            } else {
                FilterMode::Searching
            },
            match_count,
            selected: self.selected.clone(),
            body,
        }
    }
}
