//! Terminal host for the character browser.
//!
//! # Overview
//! Executes the core's requests with ureq, renders `PageView` snapshots as
//! text, and maps typed commands onto the page controller and the cards.
//!
//! # Design
//! - `Transport` is the only I/O seam; tests swap in scripted responses.
//! - `Session` owns the controller, the mounted cards and the by-id lookup
//!   cache, and turns each `Command` into a `Step` for the binary to draw.
//! - Notifications are collected by the controller and drained after every
//!   command, so they are shown once and never acknowledged.

pub mod command;
pub mod config;
pub mod render;
pub mod session;
pub mod transport;

pub use command::{Command, CommandError};
pub use config::{Config, ConfigError};
pub use render::Renderer;
pub use session::{Session, Step};
pub use transport::{Transport, UreqTransport};
