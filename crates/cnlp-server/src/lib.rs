pub mod handlers;
pub mod registry;

pub use handlers::{AppState, router};
pub use registry::{DictionaryEntry, DictionaryKind, Registry, RegistryError};
