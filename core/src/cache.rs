//! Keyed request cache that coordinates fetches without performing them.
//!
//! # Design
//! `QueryCache` follows the same host-does-IO split as the client: it never
//! touches the network. Asking for a key hands out a `FetchTicket` when a
//! request has to be made; the host executes the request and returns the
//! outcome through `complete`. Each ticket carries a generation taken from a
//! counter shared by all keys, and an entry only accepts the result of the
//! ticket it issued last. Results of superseded, cancelled or invalidated
//! tickets are discarded as `Completion::Stale`, so a slow response can
//! never overwrite a newer one.
//!
//! Entries for different keys are independent: moving to another key never
//! evicts what was cached for the previous one.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::ApiError;

/// Remote collection a cached query reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Characters,
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Characters => "characters",
        }
    }
}

/// Cache key for one page of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    pub page: u32,
}

impl QueryKey {
    pub fn characters(page: u32) -> Self {
        Self {
            resource: Resource::Characters,
            page,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource.name(), self.page)
    }
}

/// Permission to run one request for `key`. Hand it back to
/// `QueryCache::complete` together with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    key: K,
    generation: u64,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What `complete` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Stored as the key's current data or error.
    Applied,
    /// Dropped because a newer ticket was issued or the key was cancelled.
    Stale,
}

/// Read-only view of one key.
#[derive(Debug)]
pub struct QueryState<'a, T> {
    pub data: Option<&'a T>,
    pub error: Option<&'a ApiError>,
    /// A request is in flight and nothing has been cached yet.
    pub is_loading: bool,
    /// A request is in flight.
    pub is_fetching: bool,
    pub is_error: bool,
}

struct Entry<T> {
    data: Option<T>,
    error: Option<ApiError>,
    in_flight: Option<u64>,
}

impl<T> Entry<T> {
    fn empty() -> Self {
        Self {
            data: None,
            error: None,
            in_flight: None,
        }
    }
}

pub struct QueryCache<K, T> {
    entries: HashMap<K, Entry<T>>,
    last_generation: u64,
}

impl<K, T> Default for QueryCache<K, T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            last_generation: 0,
        }
    }
}

impl<K, T> fmt::Debug for QueryCache<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.len())
            .field("last_generation", &self.last_generation)
            .finish()
    }
}

impl<K, T> QueryCache<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for `key` if nothing is cached, no error is held and no
    /// request is in flight. Repeated calls while a request is pending are
    /// coalesced into that request.
    pub fn fetch(&mut self, key: &K) -> Option<FetchTicket<K>> {
        let entry = self.entries.entry(key.clone()).or_insert_with(Entry::empty);
        if entry.in_flight.is_some() {
            tracing::debug!(?key, "fetch coalesced with in-flight request");
            return None;
        }
        if entry.data.is_some() || entry.error.is_some() {
            tracing::debug!(?key, "served from cache");
            return None;
        }
        Some(self.issue(key))
    }

    /// Always issues a new ticket for `key`. The held error is cleared and
    /// any pending ticket for the key becomes stale; cached data stays
    /// visible until the new result lands.
    pub fn refetch(&mut self, key: &K) -> FetchTicket<K> {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.error = None;
        }
        self.issue(key)
    }

    fn issue(&mut self, key: &K) -> FetchTicket<K> {
        self.last_generation += 1;
        let generation = self.last_generation;
        let entry = self.entries.entry(key.clone()).or_insert_with(Entry::empty);
        entry.in_flight = Some(generation);
        tracing::debug!(?key, generation, "request issued");
        FetchTicket {
            key: key.clone(),
            generation,
        }
    }

    /// Store the outcome of `ticket` if it is still the key's latest.
    pub fn complete(&mut self, ticket: FetchTicket<K>, result: Result<T, ApiError>) -> Completion {
        let FetchTicket { key, generation } = ticket;
        let Some(entry) = self.entries.get_mut(&key) else {
            tracing::warn!(?key, generation, "discarding result for invalidated key");
            return Completion::Stale;
        };
        if entry.in_flight != Some(generation) {
            tracing::warn!(?key, generation, "discarding stale result");
            return Completion::Stale;
        }
        entry.in_flight = None;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.error = None;
            }
            Err(error) => entry.error = Some(error),
        }
        Completion::Applied
    }

    pub fn state(&self, key: &K) -> QueryState<'_, T> {
        match self.entries.get(key) {
            Some(entry) => QueryState {
                data: entry.data.as_ref(),
                error: entry.error.as_ref(),
                is_loading: entry.in_flight.is_some() && entry.data.is_none(),
                is_fetching: entry.in_flight.is_some(),
                is_error: entry.error.is_some(),
            },
            None => QueryState {
                data: None,
                error: None,
                is_loading: false,
                is_fetching: false,
                is_error: false,
            },
        }
    }

    /// Forget the error held for `key` so the next `fetch` tries again.
    pub fn clear_error(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.error = None;
        }
    }

    /// Stop waiting for the in-flight request of `key`; its result will be
    /// discarded when it arrives.
    pub fn cancel(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            if let Some(generation) = entry.in_flight.take() {
                tracing::debug!(?key, generation, "request cancelled");
            }
        }
    }

    /// Drop everything held for `key`.
    pub fn invalidate(&mut self, key: &K) {
        if self.entries.remove(key).is_some() {
            tracing::debug!(?key, "invalidated");
        }
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_cached(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|e| e.data.is_some())
    }
}
