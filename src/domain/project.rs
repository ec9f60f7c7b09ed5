use super::ServiceNames;
use std::path::{Path, PathBuf};

/// A loaded compose project (NOT its containers)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    /// Normalized project name, used in the compose labels
    pub name: String,
    /// Directory holding the first compose file
    pub dir: PathBuf,
    /// Compose files in the order they were merged
    pub files: Vec<PathBuf>,
    /// Declared services, in declaration order
    pub services: ServiceNames,
}

impl ComposeProject {
    pub fn new(name: String, dir: PathBuf, files: Vec<PathBuf>, services: ServiceNames) -> Self {
        Self {
            name,
            dir,
            files,
            services,
        }
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.services.contains(name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Normalizes a raw project name the way compose tools do:
/// lowercase, only `[a-z0-9_-]`, no leading `_` or `-`.
pub fn normalize_project_name(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect::<String>()
        .trim_start_matches(['_', '-'])
        .to_string()
}
