//! Line-oriented user commands.

use std::str::FromStr;

use character_core::card::ParseLayoutError;
use character_core::CardLayout;

pub const HELP: &str = "\
commands:
  n, next          next page
  p, prev          previous page
  page N           jump to page N
  /TERM, search T  filter the loaded page by name
  all              clear the search
  fav I            toggle favorite on card I
  open I           select card I
  show ID          fetch one character by id
  retry            fetch the current page again
  layout L         switch to mobile or desktop cards
  help             this text
  q, quit          exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Page(u32),
    Search(String),
    All,
    /// 1-based card index.
    Favorite(usize),
    /// 1-based card index.
    Open(usize),
    Show(u64),
    Retry,
    Layout(CardLayout),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("`{0}` expects a number")]
    NotANumber(&'static str),
    #[error(transparent)]
    Layout(#[from] ParseLayoutError),
}

fn number<T: FromStr>(name: &'static str, arg: &str) -> Result<T, CommandError> {
    arg.trim().parse().map_err(|_| CommandError::NotANumber(name))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        if let Some(term) = line.strip_prefix('/') {
            return Ok(Command::Search(term.trim().to_string()));
        }

        let (word, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word.to_lowercase().as_str() {
            "n" | "next" => Ok(Command::Next),
            "p" | "prev" => Ok(Command::Prev),
            "page" => number("page", arg).map(Command::Page),
            "search" => Ok(Command::Search(arg.trim().to_string())),
            "all" => Ok(Command::All),
            "fav" => number("fav", arg).map(Command::Favorite),
            "open" => number("open", arg).map(Command::Open),
            "show" => number("show", arg).map(Command::Show),
            "retry" => Ok(Command::Retry),
            "layout" => Ok(Command::Layout(arg.parse()?)),
            "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}
