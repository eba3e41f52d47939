//! Client-side name search over the currently loaded page.

use crate::types::Character;

/// Case-insensitive substring match on the character name. An empty term
/// matches everything.
pub fn matches_name(character: &Character, term: &str) -> bool {
    character.name.to_lowercase().contains(&term.to_lowercase())
}

/// Characters whose name matches `term`, in their original order.
pub fn filter_by_name<'a>(characters: &'a [Character], term: &str) -> Vec<&'a Character> {
    characters.iter().filter(|c| matches_name(c, term)).collect()
}
