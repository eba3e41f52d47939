//! Character cards: status colors, favorite toggling and the two text
//! templates.
//!
//! # Design
//! A card is a pure function of the character and the layout plus one local
//! flag, `is_favorite`. Nothing is shared between card instances; the flag
//! lives exactly as long as the card stays mounted in `MountedCards`.

use std::collections::HashMap;
use std::str::FromStr;

use crate::types::Character;

/// Width of the mobile template, borders included.
pub const MOBILE_WIDTH: usize = 34;
/// Width of the desktop template, borders included.
pub const DESKTOP_WIDTH: usize = 64;
const DESKTOP_ASIDE: usize = 9;

/// Display color of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Positive,
    Negative,
    Neutral,
}

/// `alive` is positive, `dead` is negative, anything else (including
/// `unknown` and the empty string) is neutral. Case-insensitive.
pub fn status_color(status: &str) -> StatusColor {
    match status.to_lowercase().as_str() {
        "alive" => StatusColor::Positive,
        "dead" => StatusColor::Negative,
        _ => StatusColor::Neutral,
    }
}

/// Which of the two fixed templates a card renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardLayout {
    /// Vertical card, one per row.
    Mobile,
    /// Horizontal card with the portrait on the left.
    #[default]
    Desktop,
}

impl CardLayout {
    /// Number of skeleton cards shown while a page loads.
    pub fn placeholder_count(&self) -> usize {
        match self {
            CardLayout::Mobile => 4,
            CardLayout::Desktop => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout {0:?}, expected \"mobile\" or \"desktop\"")]
pub struct ParseLayoutError(String);

impl FromStr for CardLayout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mobile" => Ok(CardLayout::Mobile),
            "desktop" => Ok(CardLayout::Desktop),
            _ => Err(ParseLayoutError(s.to_string())),
        }
    }
}

/// Part of a card that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTarget {
    Body,
    Favorite,
}

/// Status badge text and color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub color: StatusColor,
}

impl Badge {
    /// The badge as it appears inside a rendered line.
    pub fn text(&self) -> String {
        format!("[{}]", self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterCard {
    character: Character,
    is_favorite: bool,
}

impl CharacterCard {
    pub fn new(character: Character) -> Self {
        Self {
            character,
            is_favorite: false,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub fn toggle_favorite(&mut self) -> bool {
        self.is_favorite = !self.is_favorite;
        self.is_favorite
    }

    /// Route a click. The favorite control toggles the flag and stops
    /// there; anywhere else calls `on_click` once with this card's character.
    pub fn click(&mut self, target: CardTarget, on_click: impl FnOnce(&Character)) {
        match target {
            CardTarget::Favorite => {
                self.toggle_favorite();
            }
            CardTarget::Body => on_click(&self.character),
        }
    }

    pub fn badge(&self) -> Badge {
        let label = self.character.status.trim();
        Badge {
            label: if label.is_empty() { "unknown".to_string() } else { label.to_string() },
            color: status_color(&self.character.status),
        }
    }

    fn heart(&self) -> &'static str {
        if self.is_favorite {
            "[♥]"
        } else {
            "[♡]"
        }
    }

    fn first_seen(&self) -> String {
        self.character.first_seen().unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn render(&self, layout: CardLayout) -> Vec<String> {
        match layout {
            CardLayout::Mobile => self.render_mobile(),
            CardLayout::Desktop => self.render_desktop(),
        }
    }

    fn render_mobile(&self) -> Vec<String> {
        let inner = MOBILE_WIDTH - 4;
        let c = &self.character;
        let badge = self.badge().text();
        let image = format!("{} {}", self.heart(), c.image);
        let first_seen = self.first_seen();
        let rows = [
            image.as_str(),
            "",
            c.name.as_str(),
            c.species.as_str(),
            "Last known location:",
            c.location.name.as_str(),
            "First seen in:",
            first_seen.as_str(),
        ];

        let border = format!("+{}+", "-".repeat(MOBILE_WIDTH - 2));
        let mut lines = vec![border.clone()];
        lines.extend(rows.iter().map(|row| format!("| {} |", fit(row, inner))));
        lines.push(format!("| {:>inner$} |", fit(&badge, inner).trim_end()));
        lines.push(border);
        lines
    }

    fn render_desktop(&self) -> Vec<String> {
        let aside = DESKTOP_ASIDE - 2;
        let main = DESKTOP_WIDTH - DESKTOP_ASIDE - 5;
        let c = &self.character;
        let badge = self.badge().text();
        let name_width = main.saturating_sub(badge.chars().count() + 1);
        let title = format!("{} {badge}", fit(&c.name, name_width));
        let first_seen = self.first_seen();
        let rows: [(&str, &str); 6] = [
            (self.heart(), title.as_str()),
            ("[img]", c.species.as_str()),
            ("", "Last known location:"),
            ("", c.location.name.as_str()),
            ("", "First seen in:"),
            ("", first_seen.as_str()),
        ];

        let border = format!(
            "+{}+{}+",
            "-".repeat(DESKTOP_ASIDE),
            "-".repeat(DESKTOP_WIDTH - DESKTOP_ASIDE - 3)
        );
        let mut lines = vec![border.clone()];
        lines.extend(
            rows.iter()
                .map(|(left, right)| format!("| {} | {} |", fit(left, aside), fit(right, main))),
        );
        lines.push(border);
        lines
    }
}

/// Pad or truncate `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{text}{}", " ".repeat(width - count));
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Cards for the characters currently on screen, in display order.
///
/// `sync` is the mount/unmount boundary: a card keeps its favorite flag only
/// while its character stays visible.
#[derive(Debug, Default)]
pub struct MountedCards {
    cards: Vec<CharacterCard>,
}

impl MountedCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync<'a>(&mut self, visible: impl IntoIterator<Item = &'a Character>) {
        let mut mounted: HashMap<u64, CharacterCard> =
            self.cards.drain(..).map(|card| (card.character.id, card)).collect();
        self.cards = visible
            .into_iter()
            .map(|character| match mounted.remove(&character.id) {
                Some(mut card) => {
                    card.character = character.clone();
                    card
                }
                None => CharacterCard::new(character.clone()),
            })
            .collect();
    }

    pub fn get(&self, index: usize) -> Option<&CharacterCard> {
        self.cards.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CharacterCard> {
        self.cards.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterCard> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
