//! The central generation configuration: per-library build settings, plus
//! the addition/removal patch registry this tool accumulates into.
//!
//! Only the fields this tool reads or writes are modeled explicitly; every
//! other key round-trips through a flattened map so rewriting the file does
//! not drop settings owned by other pipeline stages.

use crate::owlbot::schema::DeepCopyRegexItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationConfigError {
    #[error("failed to read generation config from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse generation config ({path}): {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to write generation config to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize generation config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Which side of the patch registry an item lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryOp {
    /// The item exists in the baseline but not the input.
    Addition,
    /// The item exists in the input but not the baseline.
    Remove,
}

/// One addition or removal directive: up to three lists mirroring the
/// owlbot config's regex fields. Lists are created on first append and
/// absent lists are skipped on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionRemove {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_copy_regex: Option<Vec<DeepCopyRegexItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_remove_regex: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_preserve_regex: Option<Vec<String>>,
}

impl AdditionRemove {
    pub fn push_deep_copy_regex(&mut self, item: DeepCopyRegexItem) {
        self.deep_copy_regex.get_or_insert_with(Vec::new).push(item);
    }

    pub fn push_deep_remove_regex(&mut self, path: String) {
        self.deep_remove_regex.get_or_insert_with(Vec::new).push(path);
    }

    pub fn push_deep_preserve_regex(&mut self, path: String) {
        self.deep_preserve_regex
            .get_or_insert_with(Vec::new)
            .push(path);
    }
}

/// The per-library patch registry node: discovered discrepancies, split
/// into items to add and items to remove.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwlbotYamlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addition: Option<AdditionRemove>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<AdditionRemove>,
}

impl OwlbotYamlConfig {
    /// The directive for `op`, created on first use.
    pub fn directive_mut(&mut self, op: RegistryOp) -> &mut AdditionRemove {
        let slot = match op {
            RegistryOp::Addition => &mut self.addition,
            RegistryOp::Remove => &mut self.remove,
        };
        slot.get_or_insert_with(AdditionRemove::default)
    }
}

/// One library entry in the generation config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub api_shortname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owlbot_yaml: Option<OwlbotYamlConfig>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl LibraryConfig {
    /// The name this library is keyed by: `library_name` when set,
    /// `api_shortname` otherwise.
    pub fn name(&self) -> &str {
        self.library_name.as_deref().unwrap_or(&self.api_shortname)
    }
}

/// The whole generation-configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub googleapis_commitish: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libraries_bom_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gapic_generator_version: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl GenerationConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, GenerationConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| GenerationConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| GenerationConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write_to_yaml(&self, path: impl AsRef<Path>) -> Result<(), GenerationConfigError> {
        let path = path.as_ref();
        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents).map_err(|source| GenerationConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn has_library(&self, name: &str) -> bool {
        self.libraries.iter().any(|library| library.name() == name)
    }

    /// The patch registry for `name`, created on the library entry on first
    /// use. `None` when no library goes by that name.
    pub fn owlbot_yaml_mut(&mut self, name: &str) -> Option<&mut OwlbotYamlConfig> {
        self.libraries
            .iter_mut()
            .find(|library| library.name() == name)
            .map(|library| library.owlbot_yaml.get_or_insert_with(OwlbotYamlConfig::default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
googleapis_commitish: abc123
gapic_generator_version: 2.37.0
libraries:
  - api_shortname: secretmanager
    name_pretty: Secret Manager
    release_level: stable
  - api_shortname: privateca
    library_name: security-private-ca
"#;

    #[test]
    fn parses_known_and_unknown_fields() {
        let config: GenerationConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.googleapis_commitish, "abc123");
        assert_eq!(config.gapic_generator_version.as_deref(), Some("2.37.0"));
        assert_eq!(config.libraries.len(), 2);
        assert!(config.libraries[0].extra.contains_key("name_pretty"));
    }

    #[test]
    fn library_name_overrides_api_shortname() {
        let config: GenerationConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(config.has_library("secretmanager"));
        assert!(config.has_library("security-private-ca"));
        assert!(!config.has_library("privateca"));
    }

    #[test]
    fn owlbot_yaml_is_created_lazily() {
        let mut config: GenerationConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(config.libraries[0].owlbot_yaml.is_none());

        let registry = config.owlbot_yaml_mut("secretmanager").unwrap();
        registry
            .directive_mut(RegistryOp::Remove)
            .push_deep_remove_regex("tmp/".to_string());

        let registry = &config.libraries[0].owlbot_yaml;
        let removed = registry
            .as_ref()
            .and_then(|r| r.remove.as_ref())
            .and_then(|d| d.deep_remove_regex.as_ref())
            .unwrap();
        assert_eq!(removed, &["tmp/".to_string()]);
    }

    #[test]
    fn unknown_library_yields_none() {
        let mut config: GenerationConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(config.owlbot_yaml_mut("nope").is_none());
    }

    #[test]
    fn directive_appends_do_not_deduplicate() {
        let mut registry = OwlbotYamlConfig::default();
        let directive = registry.directive_mut(RegistryOp::Addition);
        directive.push_deep_preserve_regex("/samples".to_string());
        directive.push_deep_preserve_regex("/samples".to_string());
        let preserved = registry
            .addition
            .unwrap()
            .deep_preserve_regex
            .unwrap();
        assert_eq!(preserved.len(), 2);
    }

    #[test]
    fn serialization_skips_absent_registry_parts() {
        let mut registry = OwlbotYamlConfig::default();
        registry
            .directive_mut(RegistryOp::Addition)
            .push_deep_remove_regex("tmp/".to_string());
        let yaml = serde_yaml::to_string(&registry).unwrap();
        assert!(yaml.contains("addition:"));
        assert!(yaml.contains("deep_remove_regex:"));
        assert!(!yaml.contains("\nremove:"));
        assert!(!yaml.contains("deep_copy_regex:"));
    }

    #[test]
    fn round_trips_unmodeled_keys() {
        let config: GenerationConfig = serde_yaml::from_str(SAMPLE).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("name_pretty"));
        assert!(yaml.contains("release_level"));
    }
}
