//! Persistence module split across logical submodules.

mod error;
mod file;
mod records;
mod transfer;

pub use error::StoreError;
pub use file::{library_path, load_library, save_library, LoadOutcome, LoadWarning};
pub use records::{repair_imported, repair_loaded};
pub use transfer::{export_library, import_library, ImportOutcome};
