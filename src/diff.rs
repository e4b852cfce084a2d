//! Diff generation between two owlbot configs.
//!
//! Produces `- field: value` / `+ field: value` lines (`-` is the input
//! side, `+` the baseline side) and, when a generation config is supplied,
//! records each mismatched list item as a removal or addition directive on
//! the owning library's patch registry.

use crate::generation::{GenerationConfig, RegistryOp};
use crate::owlbot::schema::{DeepCopyRegexItem, OwlbotConfig};
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

/// The three owlbot list fields a diff line or registry entry can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    DeepCopyRegex,
    DeepRemoveRegex,
    DeepPreserveRegex,
}

impl ListKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKey::DeepCopyRegex => "deep_copy_regex",
            ListKey::DeepRemoveRegex => "deep_remove_regex",
            ListKey::DeepPreserveRegex => "deep_preserve_regex",
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn fmt_opt<T: fmt::Display>(value: Option<&T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "None".to_string(),
    }
}

fn fmt_list<T: fmt::Display>(list: Option<&[T]>) -> String {
    match list {
        Some(list) => {
            let items: Vec<String> = list.iter().map(ToString::to_string).collect();
            format!("[{}]", items.join(", "))
        }
        None => "None".to_string(),
    }
}

/// Diff one optional list field.
///
/// When exactly one side is absent the whole lists are emitted as a single
/// `-`/`+` pair and `record` is not called; the registry only tracks
/// per-item discrepancies. Otherwise both sides are sorted and scanned:
/// items of the input missing from the baseline (under the field's own
/// equivalence, normalized for copy-regex items) are removals, items of the
/// baseline missing from the input are additions. The sorted scan makes the
/// emission order deterministic and yields each mismatched item exactly
/// once.
fn diff_lists<T, F>(
    key: ListKey,
    list1: Option<&[T]>,
    list2: Option<&[T]>,
    lines: &mut Vec<String>,
    mut record: F,
) where
    T: Ord + Clone + fmt::Display,
    F: FnMut(RegistryOp, &T),
{
    match (list1, list2) {
        (None, None) => {}
        (None, Some(_)) | (Some(_), None) => {
            lines.push(format!("- {key}: {}", fmt_list(list1)));
            lines.push(format!("+ {key}: {}", fmt_list(list2)));
        }
        (Some(list1), Some(list2)) => {
            let mut sorted1 = list1.to_vec();
            let mut sorted2 = list2.to_vec();
            sorted1.sort();
            sorted2.sort();

            for item in &sorted1 {
                if !sorted2.contains(item) {
                    lines.push(format!("- {key}: {item}"));
                    record(RegistryOp::Remove, item);
                }
            }
            for item in &sorted2 {
                if !sorted1.contains(item) {
                    lines.push(format!("+ {key}: {item}"));
                    record(RegistryOp::Addition, item);
                }
            }
        }
    }
}

/// Generate the ordered diff lines between two owlbot configs.
///
/// Scalar mismatches always emit both the `-` and the `+` line, even when
/// one side is `None`. List mismatches additionally update the patch
/// registry of `library_name`'s entry in `generation_config`, when one is
/// supplied and the library exists; the registry's addition/remove
/// directives and their per-key lists are created on first write.
pub fn generate_diff(
    config1: &OwlbotConfig,
    config2: &OwlbotConfig,
    library_name: &str,
    mut generation_config: Option<&mut GenerationConfig>,
) -> Vec<String> {
    let mut lines = Vec::new();

    if config1.api_name != config2.api_name {
        lines.push(format!("- api_name: {}", fmt_opt(config1.api_name.as_ref())));
        lines.push(format!("+ api_name: {}", fmt_opt(config2.api_name.as_ref())));
    }
    if config1.begin_after_commit_hash != config2.begin_after_commit_hash {
        lines.push(format!(
            "- begin_after_commit_hash: {}",
            fmt_opt(config1.begin_after_commit_hash.as_ref())
        ));
        lines.push(format!(
            "+ begin_after_commit_hash: {}",
            fmt_opt(config2.begin_after_commit_hash.as_ref())
        ));
    }
    if config1.docker != config2.docker {
        lines.push(format!("- docker: {}", fmt_opt(config1.docker.as_ref())));
        lines.push(format!("+ docker: {}", fmt_opt(config2.docker.as_ref())));
    }
    if config1.squash != config2.squash {
        lines.push(format!("- squash: {}", fmt_opt(config1.squash.as_ref())));
        lines.push(format!("+ squash: {}", fmt_opt(config2.squash.as_ref())));
    }

    diff_lists(
        ListKey::DeepCopyRegex,
        config1.deep_copy_regex.as_deref(),
        config2.deep_copy_regex.as_deref(),
        &mut lines,
        |op, item: &DeepCopyRegexItem| {
            if let Some(registry) = generation_config
                .as_deref_mut()
                .and_then(|config| config.owlbot_yaml_mut(library_name))
            {
                registry.directive_mut(op).push_deep_copy_regex(item.clone());
            }
        },
    );
    diff_lists(
        ListKey::DeepRemoveRegex,
        config1.deep_remove_regex.as_deref(),
        config2.deep_remove_regex.as_deref(),
        &mut lines,
        |op, item: &String| {
            if let Some(registry) = generation_config
                .as_deref_mut()
                .and_then(|config| config.owlbot_yaml_mut(library_name))
            {
                registry.directive_mut(op).push_deep_remove_regex(item.clone());
            }
        },
    );
    diff_lists(
        ListKey::DeepPreserveRegex,
        config1.deep_preserve_regex.as_deref(),
        config2.deep_preserve_regex.as_deref(),
        &mut lines,
        |op, item: &String| {
            if let Some(registry) = generation_config
                .as_deref_mut()
                .and_then(|config| config.owlbot_yaml_mut(library_name))
            {
                registry
                    .directive_mut(op)
                    .push_deep_preserve_regex(item.clone());
            }
        },
    );

    lines
}

/// Derive the library name from a config file's relative path.
///
/// The name is the last directory component with a leading `java-` marker
/// stripped; a path with no directory component yields an empty string.
///
/// # Examples
///
/// ```
/// use owlbot_diff::diff::extract_library_name;
/// use std::path::Path;
///
/// let name = extract_library_name(Path::new("java-security-private-ca/.OwlBot-hermetic.yaml"));
/// assert_eq!(name, "security-private-ca");
/// assert_eq!(extract_library_name(Path::new(".owlbot-hermetic.yaml")), "");
/// ```
pub fn extract_library_name(relative_path: &Path) -> String {
    let Some(dir) = relative_path.parent() else {
        return String::new();
    };
    let Some(name) = dir.file_name().and_then(OsStr::to_str) else {
        return String::new();
    };
    name.strip_prefix("java-").unwrap_or(name).to_string()
}
