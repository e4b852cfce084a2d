use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Canonicalize the "any version segment" spelling in a copy-regex source.
///
/// Owlbot configs write the same intent in two flavors: the regex escape
/// `v\d` and the glob-ish `v.*`. Both collapse to the token `v*` so that
/// equivalent patterns compare equal.
///
/// # Examples
///
/// ```
/// use owlbot_diff::owlbot::normalize_source;
///
/// assert_eq!(normalize_source(r"/google/cloud/v\d"), "/google/cloud/v*");
/// assert_eq!(normalize_source("/google/cloud/v.*"), "/google/cloud/v*");
/// assert_eq!(normalize_source("/google/cloud/v1"), "/google/cloud/v1");
/// ```
pub fn normalize_source(source: &str) -> String {
    source.replace("v\\d", "v*").replace("v.*", "v*")
}

/// The `docker:` block of an owlbot config. Compared by image only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DockerConfig {
    pub image: String,
}

impl fmt::Display for DockerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DockerConfig(image={})", self.image)
    }
}

/// One `deep-copy-regex` entry: copy files matching `source` to `dest`.
///
/// Equality normalizes the source (see [`normalize_source`]) and compares
/// the dest literally. The ordering sorts by normalized source, then dest;
/// it exists only to canonicalize lists before order-independent comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepCopyRegexItem {
    pub source: String,
    pub dest: String,
}

impl PartialEq for DeepCopyRegexItem {
    fn eq(&self, other: &Self) -> bool {
        normalize_source(&self.source) == normalize_source(&other.source)
            && self.dest == other.dest
    }
}

impl Eq for DeepCopyRegexItem {}

impl Ord for DeepCopyRegexItem {
    fn cmp(&self, other: &Self) -> Ordering {
        normalize_source(&self.source)
            .cmp(&normalize_source(&other.source))
            .then_with(|| self.dest.cmp(&other.dest))
    }
}

impl PartialOrd for DeepCopyRegexItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DeepCopyRegexItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(source={}, dest={})", self.source, self.dest)
    }
}

/// Parsed content of one `.owlbot-hermetic.yaml` file.
///
/// Every field is optional: `None` means the key was absent from the YAML,
/// which is distinct from a key present with an empty list. That distinction
/// is load-bearing for comparison and diffing, so nothing here defaults an
/// absent key to an empty collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OwlbotConfig {
    #[serde(default)]
    pub api_name: Option<String>,
    #[serde(default)]
    pub begin_after_commit_hash: Option<String>,
    #[serde(default)]
    pub docker: Option<DockerConfig>,
    #[serde(default)]
    pub squash: Option<bool>,
    #[serde(default)]
    pub deep_copy_regex: Option<Vec<DeepCopyRegexItem>>,
    #[serde(default)]
    pub deep_remove_regex: Option<Vec<String>>,
    #[serde(default)]
    pub deep_preserve_regex: Option<Vec<String>>,
}
