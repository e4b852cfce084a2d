//! Owlbot Diff: structural comparison of owlbot hermetic-build configs
//!
//! Compares per-library `.owlbot-hermetic.yaml` files between a generated
//! tree and a baseline tree, and optionally folds discovered per-item
//! differences back into the central generation configuration as
//! addition/removal patch directives.
//!
//! # Architecture
//!
//! Comparison is semantic, not textual: each file parses into an
//! [`OwlbotConfig`] whose list fields compare as multisets and whose
//! copy-regex sources are normalized (see [`normalize_source`]) so that
//! equivalent version patterns written in different regex flavors agree.
//! An absent YAML key is never equal to a present-but-empty list.
//!
//! [`generate_diff`] turns two unequal configs into ordered `-`/`+` lines
//! and, when a [`GenerationConfig`] is supplied, appends each mismatched
//! list item to the owning library's addition/remove patch registry.

pub mod diff;
pub mod generation;
pub mod owlbot;

// Re-exports
pub use diff::{extract_library_name, generate_diff, ListKey};
pub use generation::{
    AdditionRemove, GenerationConfig, GenerationConfigError, LibraryConfig, OwlbotYamlConfig,
    RegistryOp,
};
pub use owlbot::{
    lists_equivalent, load_from_path, load_from_str, normalize_source, DeepCopyRegexItem,
    DockerConfig, LoadError, OwlbotConfig,
};
