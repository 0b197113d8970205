//! Core library surface for the Personal Library Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the domain types, the in-memory collection, the JSON store, and
//! the interactive application itself.

pub mod library;
pub mod models;
pub mod store;
pub mod ui;

/// Convenience re-exports for the persistence layer. These functions are
/// typically used by `main.rs` to locate and read the library file before
/// the UI starts.
pub use store::{library_path, load_library, save_library};

/// The collection type and the two primary domain types that other layers
/// manipulate.
pub use library::Library;
pub use models::{Book, Genre};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
