use crate::owlbot::schema::OwlbotConfig;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Yaml {
        path: Option<PathBuf>,
        source: serde_yaml::Error,
    },
    /// The document parsed to nothing (empty file, or comments only).
    Empty { path: Option<PathBuf> },
}

impl LoadError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            LoadError::Io { .. } => self,
            LoadError::Yaml { path: None, source } => LoadError::Yaml {
                path: Some(path),
                source,
            },
            LoadError::Empty { path: None } => LoadError::Empty { path: Some(path) },
            other => other,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(
                    f,
                    "failed to read owlbot config from {}: {}",
                    path.display(),
                    source
                )
            }
            LoadError::Yaml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse owlbot YAML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse owlbot YAML: {}", source),
            },
            LoadError::Empty { path } => match path {
                Some(path) => write!(f, "owlbot YAML is empty ({})", path.display()),
                None => write!(f, "owlbot YAML is empty"),
            },
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Yaml { source, .. } => Some(source),
            LoadError::Empty { .. } => None,
        }
    }
}

/// Parse an owlbot config from YAML text.
///
/// Lines whose trimmed form starts with `#` are dropped before parsing,
/// independent of YAML's own comment handling; some owlbot files carry
/// commented-out directives that would otherwise trip up strict parsing.
/// A document that parses to nothing is an error so callers can skip the
/// file rather than compare against an all-`None` config.
pub fn load_from_str(input: &str) -> Result<OwlbotConfig, LoadError> {
    let stripped: String = input
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        });

    let value: serde_yaml::Value = serde_yaml::from_str(&stripped)
        .map_err(|source| LoadError::Yaml { path: None, source })?;

    if value.is_null() {
        return Err(LoadError::Empty { path: None });
    }

    serde_yaml::from_value(value).map_err(|source| LoadError::Yaml { path: None, source })
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<OwlbotConfig, LoadError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_full_config() {
        let yaml = r#"
api-name: secretmanager
begin-after-commit-hash: abc123
docker:
  image: gcr.io/cloud-devrel/owlbot-java:latest
squash: true
deep-copy-regex:
  - source: "/google/cloud/secretmanager/v\\d/.*-java/src"
    dest: "/owl-bot-staging/src"
deep-remove-regex:
  - "/grpc-google-.*/src"
deep-preserve-regex:
  - "/samples"
"#;
        let config = load_from_str(yaml).unwrap();
        assert_eq!(config.api_name.as_deref(), Some("secretmanager"));
        assert_eq!(config.begin_after_commit_hash.as_deref(), Some("abc123"));
        assert_eq!(
            config.docker.as_ref().map(|d| d.image.as_str()),
            Some("gcr.io/cloud-devrel/owlbot-java:latest")
        );
        assert_eq!(config.squash, Some(true));
        assert_eq!(config.deep_copy_regex.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            config.deep_remove_regex.as_deref(),
            Some(&["/grpc-google-.*/src".to_string()][..])
        );
        assert_eq!(
            config.deep_preserve_regex.as_deref(),
            Some(&["/samples".to_string()][..])
        );
    }

    #[test]
    fn absent_keys_stay_none() {
        let config = load_from_str("api-name: foo\n").unwrap();
        assert!(config.deep_copy_regex.is_none());
        assert!(config.deep_remove_regex.is_none());
        assert!(config.deep_preserve_regex.is_none());
        assert!(config.docker.is_none());
        assert!(config.squash.is_none());
    }

    #[test]
    fn empty_list_is_not_absent() {
        let config = load_from_str("deep-remove-regex: []\n").unwrap();
        assert_eq!(config.deep_remove_regex.as_deref(), Some(&[][..]));
    }

    #[test]
    fn comment_lines_are_stripped() {
        let yaml = "# header comment\napi-name: foo\n  # indented comment\nsquash: false\n";
        let config = load_from_str(yaml).unwrap();
        assert_eq!(config.api_name.as_deref(), Some("foo"));
        assert_eq!(config.squash, Some(false));
    }

    #[test]
    fn comment_only_document_is_empty() {
        let err = load_from_str("# nothing here\n# at all\n").unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_from_path("/definitely/not/here/.owlbot-hermetic.yaml").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = load_from_str("api-name: foo\nsome-future-key: 1\n").unwrap();
        assert_eq!(config.api_name.as_deref(), Some("foo"));
    }
}
