//! Text rendering of page snapshots.

use character_core::{
    CardLayout, Character, FilterMode, Level, MountedCards, Notification, PageView, Pagination,
    StatusColor, ViewBody,
};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

fn ansi(color: StatusColor) -> &'static str {
    match color {
        StatusColor::Positive => GREEN,
        StatusColor::Negative => RED,
        StatusColor::Neutral => GRAY,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn page(&self, view: &PageView, cards: &MountedCards, layout: CardLayout) -> String {
        let mut out = Vec::new();
        out.push(toolbar(view));
        out.push(String::new());

        match &view.body {
            ViewBody::Loading => out.extend(skeletons(layout)),
            ViewBody::Failed { .. } => {
                out.push("Oops! Something went wrong.".to_string());
                out.push("[ Try Again ]  (type `retry`)".to_string());
            }
            ViewBody::Loaded { pagination, .. } => {
                for (i, card) in cards.iter().enumerate() {
                    let badge = card.badge();
                    out.push(format!("#{}  (id {})", i + 1, card.character().id));
                    out.extend(card.render(layout).into_iter().map(|line| {
                        if self.color {
                            line.replacen(&badge.text(), &format!("{}{}{RESET}", ansi(badge.color), badge.text()), 1)
                        } else {
                            line
                        }
                    }));
                }
                if cards.is_empty() {
                    out.push("No characters match this search.".to_string());
                }
                out.push(String::new());
                out.push(pager(pagination));
            }
        }
        out.join("\n")
    }

    pub fn notification(&self, note: &Notification) -> String {
        let (mark, color) = match note.level {
            Level::Success => ("✔", GREEN),
            Level::Error => ("✖", RED),
        };
        if self.color {
            format!("{color}{mark}{RESET} {}: {}", note.title, note.description)
        } else {
            format!("{mark} {}: {}", note.title, note.description)
        }
    }

    pub fn detail(&self, character: &Character) -> String {
        let c = character;
        let kind = if c.kind.is_empty() { "-" } else { c.kind.as_str() };
        [
            format!("#{} {}", c.id, c.name),
            format!("  status:   {}", c.status),
            format!("  species:  {} ({kind})", c.species),
            format!("  gender:   {}", c.gender),
            format!("  origin:   {}", c.origin.name),
            format!("  location: {}", c.location.name),
            format!("  episodes: {}", c.episode.len()),
            format!("  image:    {}", c.image),
            format!("  created:  {}", c.created),
        ]
        .join("\n")
    }
}

fn toolbar(view: &PageView) -> String {
    let (all, search) = match view.filter {
        FilterMode::All => ("*All*", "Search".to_string()),
        FilterMode::Searching => ("All", format!("*Search: {}*", view.search_term)),
    };
    format!("{all}  {search}    {} characters", view.match_count)
}

fn skeletons(layout: CardLayout) -> Vec<String> {
    let block = match layout {
        CardLayout::Mobile => ["░".repeat(30), "░".repeat(22), "░".repeat(26)],
        CardLayout::Desktop => ["░".repeat(48), "░".repeat(32), "░".repeat(40)],
    };
    let mut out = Vec::new();
    for _ in 0..layout.placeholder_count() {
        out.extend(block.iter().cloned());
        out.push(String::new());
    }
    out
}

fn pager(p: &Pagination) -> String {
    let prev = if p.has_prev { "< Previous" } else { "  ---     " };
    let next = if p.has_next { "Next >" } else { " ---  " };
    format!("{prev}   Page {} of {}   {next}", p.page, p.pages)
}
