//! One browsing session: the page controller, its mounted cards, a
//! transport, and the character lookup cache.
//!
//! # Design
//! The session is the host side of the host-does-IO split. It asks the
//! controller which request the current page needs, runs it to completion
//! on the transport, and remounts the cards from the resulting snapshot.
//! Requests are executed one at a time, so at most one is ever outstanding.

use character_core::{
    ApiError, CardLayout, CardTarget, Character, CharacterClient, MountedCards, Notification,
    PageController, PageTicket, PageView, QueryCache, ViewBody,
};

use crate::command::Command;
use crate::transport::Transport;

/// What the host should do after a command.
#[derive(Debug)]
pub enum Step {
    /// Draw the current page.
    Render(PageView),
    Detail(Result<Character, ApiError>),
    /// The command changed nothing; the text says why.
    Ignored(&'static str),
    Help,
    Quit,
}

pub struct Session<T> {
    transport: T,
    controller: PageController<Vec<Notification>>,
    details: QueryCache<u64, Character>,
    cards: MountedCards,
    layout: CardLayout,
}

impl<T: Transport> Session<T> {
    pub fn new(client: CharacterClient, transport: T, layout: CardLayout) -> Self {
        Self {
            transport,
            controller: PageController::new(client, Vec::new()),
            details: QueryCache::new(),
            cards: MountedCards::new(),
            layout,
        }
    }

    pub fn controller(&self) -> &PageController<Vec<Notification>> {
        &self.controller
    }

    pub fn cards(&self) -> &MountedCards {
        &self.cards
    }

    pub fn layout(&self) -> CardLayout {
        self.layout
    }

    /// Run the fetch the current page needs, if any, and remount the cards.
    pub fn refresh(&mut self) -> PageView {
        if let Some(ticket) = self.controller.pending_fetch() {
            self.run(ticket);
        }
        self.view()
    }

    /// "Try Again": fetch the current page regardless of the cache.
    pub fn retry(&mut self) -> PageView {
        let ticket = self.controller.retry();
        self.run(ticket);
        self.view()
    }

    fn run(&mut self, ticket: PageTicket) {
        let request = self.controller.request_for(&ticket);
        let response = self.transport.execute(&request);
        self.controller.complete(ticket, response);
    }

    fn view(&mut self) -> PageView {
        let view = self.controller.snapshot();
        match &view.body {
            ViewBody::Loaded { characters, .. } => self.cards.sync(characters),
            _ => self.cards.sync(std::iter::empty()),
        }
        view
    }

    /// Click the favorite control of card `index` (1-based).
    pub fn toggle_favorite(&mut self, index: usize) -> Option<bool> {
        let card = self.cards.get_mut(index.checked_sub(1)?)?;
        card.click(CardTarget::Favorite, |_| {});
        Some(card.is_favorite())
    }

    /// Click the body of card `index` (1-based).
    pub fn open(&mut self, index: usize) -> bool {
        let Some(card) = index.checked_sub(1).and_then(|i| self.cards.get_mut(i)) else {
            return false;
        };
        let mut clicked = None;
        card.click(CardTarget::Body, |character| clicked = Some(character.clone()));
        match clicked {
            Some(character) => {
                self.controller.select(character);
                true
            }
            None => false,
        }
    }

    /// Character by id, from the lookup cache or the network.
    pub fn lookup(&mut self, id: u64) -> Result<Character, ApiError> {
        if let Some(character) = self.details.state(&id).data {
            return Ok(character.clone());
        }
        let ticket = self.details.refetch(&id);
        let client = self.controller.client();
        let result = self
            .transport
            .execute(&client.build_fetch_by_id(id))
            .map_err(ApiError::from)
            .and_then(|response| client.parse_character(response));
        self.details.complete(ticket, result.clone());
        result
    }

    /// Notifications raised since the last call, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(self.controller.notifier_mut())
    }

    pub fn apply(&mut self, command: Command) -> Step {
        match command {
            Command::Next => {
                if !self.controller.next_page() {
                    return Step::Ignored("already on the last page");
                }
            }
            Command::Prev => {
                if !self.controller.prev_page() {
                    return Step::Ignored("already on the first page");
                }
            }
            Command::Page(page) => {
                if !self.controller.set_page(page) {
                    return Step::Ignored("pages start at 1");
                }
            }
            Command::Search(term) => self.controller.set_search_term(term),
            Command::All => self.controller.clear_search(),
            Command::Favorite(index) => {
                if self.toggle_favorite(index).is_none() {
                    return Step::Ignored("no such card");
                }
            }
            Command::Open(index) => {
                if !self.open(index) {
                    return Step::Ignored("no such card");
                }
            }
            Command::Show(id) => return Step::Detail(self.lookup(id)),
            Command::Retry => return Step::Render(self.retry()),
            Command::Layout(layout) => self.layout = layout,
            Command::Help => return Step::Help,
            Command::Quit => return Step::Quit,
        }
        Step::Render(self.refresh())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use character_core::{HttpRequest, HttpResponse, Level, PageInfo, PageResponse, TransportError};

    use super::*;

    /// Replays canned responses and records the URLs it was asked for.
    #[derive(Default)]
    struct Scripted {
        responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn then(self, response: Result<HttpResponse, TransportError>) -> Self {
            self.responses.borrow_mut().push_back(response);
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request.url.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("no scripted response")))
        }
    }

    fn character(id: u64, name: &str) -> Character {
        Character {
            id,
            name: name.to_string(),
            status: "Alive".to_string(),
            species: "Human".to_string(),
            ..Character::default()
        }
    }

    fn page(number: u32, pages: u32, characters: Vec<Character>) -> Result<HttpResponse, TransportError> {
        let body = PageResponse {
            info: PageInfo {
                count: characters.len() as u64,
                pages,
                next: (number < pages).then(|| format!("http://test/character?page={}", number + 1)),
                prev: (number > 1).then(|| format!("http://test/character?page={}", number - 1)),
            },
            results: characters,
        };
        Ok(HttpResponse::new(200, serde_json::to_string(&body).unwrap()))
    }

    fn session(transport: Scripted) -> Session<Scripted> {
        Session::new(CharacterClient::new("http://test"), transport, CardLayout::Desktop)
    }

    #[test]
    fn refresh_loads_and_mounts_cards() {
        let transport = Scripted::default()
            .then(page(1, 2, vec![character(1, "Rick Sanchez"), character(2, "Morty Smith")]));
        let mut s = session(transport);

        let view = s.refresh();
        assert!(matches!(view.body, ViewBody::Loaded { .. }));
        assert_eq!(s.cards().len(), 2);
        assert_eq!(s.transport.requests(), ["http://test/character?page=1"]);

        s.refresh();
        assert_eq!(s.transport.requests().len(), 1, "cached");
    }

    #[test]
    fn favorite_survives_search_but_not_page_change() {
        let transport = Scripted::default()
            .then(page(1, 2, vec![character(1, "Rick Sanchez"), character(2, "Morty Smith")]))
            .then(page(2, 2, vec![character(3, "Summer Smith")]));
        let mut s = session(transport);
        s.refresh();

        assert!(matches!(s.apply(Command::Favorite(1)), Step::Render(_)));
        assert!(s.cards().get(0).unwrap().is_favorite());

        s.apply(Command::Search("rick".to_string()));
        assert_eq!(s.cards().len(), 1);
        assert!(s.cards().get(0).unwrap().is_favorite());

        s.apply(Command::All);
        s.apply(Command::Next);
        s.apply(Command::Prev);
        assert!(!s.cards().get(0).unwrap().is_favorite(), "remounted");
    }

    #[test]
    fn favorite_click_does_not_select() {
        let transport = Scripted::default().then(page(1, 1, vec![character(1, "Rick Sanchez")]));
        let mut s = session(transport);
        s.refresh();
        s.apply(Command::Favorite(1));
        assert!(s.controller().selected().is_none());
        assert!(s.drain_notifications().is_empty());
    }

    #[test]
    fn open_selects_and_notifies() {
        let transport = Scripted::default().then(page(1, 1, vec![character(1, "Rick Sanchez")]));
        let mut s = session(transport);
        s.refresh();

        s.apply(Command::Open(1));
        assert_eq!(s.controller().selected().map(|c| c.id), Some(1));
        let notes = s.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Success);
        assert_eq!(notes[0].title, "Selected: Rick Sanchez");
        assert!(s.drain_notifications().is_empty());
    }

    #[test]
    fn out_of_range_cards_are_ignored() {
        let transport = Scripted::default().then(page(1, 1, vec![character(1, "Rick Sanchez")]));
        let mut s = session(transport);
        s.refresh();
        assert!(matches!(s.apply(Command::Favorite(0)), Step::Ignored(_)));
        assert!(matches!(s.apply(Command::Open(5)), Step::Ignored(_)));
    }

    #[test]
    fn boundary_navigation_is_ignored() {
        let transport = Scripted::default().then(page(1, 1, vec![character(1, "Rick Sanchez")]));
        let mut s = session(transport);
        s.refresh();
        assert!(matches!(s.apply(Command::Prev), Step::Ignored(_)));
        assert!(matches!(s.apply(Command::Next), Step::Ignored(_)));
        assert!(matches!(s.apply(Command::Page(0)), Step::Ignored(_)));
        assert_eq!(s.controller().page(), 1);
    }

    #[test]
    fn failure_then_retry() {
        let transport = Scripted::default()
            .then(Ok(HttpResponse::new(500, "")))
            .then(page(1, 1, vec![character(1, "Rick Sanchez")]));
        let mut s = session(transport);

        let view = s.refresh();
        assert!(matches!(view.body, ViewBody::Failed { .. }));
        assert!(s.cards().is_empty());
        let notes = s.drain_notifications();
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(notes[0].description, "API error: 500");

        let Step::Render(view) = s.apply(Command::Retry) else {
            panic!("retry should render");
        };
        assert!(matches!(view.body, ViewBody::Loaded { .. }));
        assert_eq!(
            s.transport.requests(),
            ["http://test/character?page=1", "http://test/character?page=1"]
        );
    }

    #[test]
    fn lookup_caches_successes_only() {
        let rick = serde_json::to_string(&character(1, "Rick Sanchez")).unwrap();
        let transport = Scripted::default()
            .then(Ok(HttpResponse::new(404, r#"{"error":"Character not found"}"#)))
            .then(Ok(HttpResponse::new(200, rick)));
        let mut s = session(transport);

        assert_eq!(s.lookup(1).unwrap_err().status(), Some(404));
        assert_eq!(s.lookup(1).unwrap().name, "Rick Sanchez");
        assert_eq!(s.lookup(1).unwrap().name, "Rick Sanchez");
        assert_eq!(
            s.transport.requests(),
            ["http://test/character/1", "http://test/character/1"]
        );
    }

    #[test]
    fn layout_command_switches_layout() {
        let transport = Scripted::default().then(page(1, 1, vec![]));
        let mut s = session(transport);
        s.apply(Command::Layout(CardLayout::Mobile));
        assert_eq!(s.layout(), CardLayout::Mobile);
    }
}
