pub mod compare;
pub mod loader;
pub mod schema;

pub use compare::lists_equivalent;
pub use loader::{load_from_path, load_from_str, LoadError};
pub use schema::{normalize_source, DeepCopyRegexItem, DockerConfig, OwlbotConfig};
