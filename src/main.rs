//! Binary entry point that glues the JSON-backed library store to the TUI.
//! The bootstrapping pipeline is short: resolve the data path, load and
//! repair whatever is on disk, hydrate the initial app state, and drive the
//! Ratatui event loop until the user exits.
use personal_library_manager::{library_path, load_library, run_app, App};

/// Locate the library file, load it defensively, and launch the event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for
/// example an unreadable home directory) to the terminal instead of crashing
/// silently; once the UI is running, every error is recovered into the
/// status footer instead.
fn main() -> anyhow::Result<()> {
    let path = library_path()?;
    let outcome = load_library(&path)?;

    let mut app = App::new(path, outcome);
    run_app(&mut app)
}
