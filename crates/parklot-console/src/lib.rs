// ABOUTME: Console front end for parklot: configuration, text rendering, and the menu session.
// ABOUTME: Wires the core registry to the records file and to an operator's terminal.

pub mod config;
pub mod render;
pub mod session;

pub use config::{ConfigError, ParklotConfig};
pub use session::{Session, SessionError, load_registry};
