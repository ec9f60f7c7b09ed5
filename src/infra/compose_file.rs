use crate::domain::project::normalize_project_name;
use crate::domain::{ComposeProject, ServiceNames};
use crate::infra::config::AppConfig;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File names probed in the working directory, in order.
pub const DEFAULT_FILE_NAMES: [&str; 4] = [
    "compose.yaml",
    "compose.yml",
    "docker-compose.yml",
    "docker-compose.yaml",
];

/// The parts of a compose file `exec` cares about.
#[derive(Deserialize, Debug, Default)]
struct ComposeDocument {
    #[serde(default)]
    name: Option<String>,
    /// Only the keys are read; service bodies are left to the runtime
    #[serde(default)]
    services: Option<serde_yml::Mapping>,
}

/// Finds the first default compose file in `dir`.
pub fn locate_default(dir: &Path) -> Result<PathBuf> {
    DEFAULT_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .with_context(|| format!("no compose file found in {:?}", dir))
}

/// Resolves the compose files to load: the configured ones, relative to
/// `work_dir`, or the default file when none are configured.
pub fn resolve_files(work_dir: &Path, configured: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if configured.is_empty() {
        return Ok(vec![locate_default(work_dir)?]);
    }

    configured
        .iter()
        .map(|file| {
            let expanded = PathBuf::from(
                shellexpand::tilde(file.to_string_lossy().as_ref()).into_owned(),
            );
            let path = if expanded.is_absolute() {
                expanded
            } else {
                work_dir.join(expanded)
            };

            if !path.is_file() {
                bail!("compose file {:?} does not exist", path);
            }
            Ok(path)
        })
        .collect()
}

fn parse_document(content: &str, path: &Path) -> Result<ComposeDocument> {
    serde_yml::from_str(content).with_context(|| format!("parsing {:?}", path))
}

fn validate_service_name(name: &str, path: &Path) -> Result<()> {
    let Some(first_char) = name.chars().next() else {
        bail!("empty service name in {:?}", path);
    };

    if !first_char.is_ascii_alphanumeric() {
        bail!(
            "service name '{}' in {:?} must start with a letter or digit",
            name,
            path
        );
    }

    if let Some(c) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '.' && *c != '-')
    {
        bail!(
            "service name '{}' in {:?} contains invalid character '{}'",
            name,
            path,
            c
        );
    }

    Ok(())
}

fn service_keys(services: &serde_yml::Mapping, path: &Path) -> Result<Vec<String>> {
    services
        .keys()
        .map(|key| -> Result<String> {
            let name = key
                .as_str()
                .with_context(|| format!("non-string service key {:?} in {:?}", key, path))?;
            validate_service_name(name, path)?;
            Ok(name.to_string())
        })
        .collect()
}

/// Loads the compose project for `work_dir` using the given configuration.
///
/// Services from every file are merged in file order. The project name is
/// the configured one, else the last `name:` found in the files, else the
/// basename of the project directory.
pub fn load_project(work_dir: &Path, config: &AppConfig) -> Result<ComposeProject> {
    let files = resolve_files(work_dir, config.compose_files())?;

    let mut services = ServiceNames::new();
    let mut declared_name = None;

    for path in &files {
        let content = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        let doc = parse_document(&content, path)?;

        let Some(mapping) = doc.services else {
            bail!("{:?} does not define any services", path);
        };

        for name in service_keys(&mapping, path)? {
            services.push(name);
        }

        if doc.name.is_some() {
            declared_name = doc.name;
        }
        debug!("loaded compose file {:?}", path);
    }

    let dir = files[0]
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| work_dir.to_path_buf());

    let raw_name = config
        .compose
        .project_name
        .clone()
        .or(declared_name)
        .or_else(|| {
            fs::canonicalize(&dir)
                .unwrap_or_else(|_| dir.clone())
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    let name = normalize_project_name(&raw_name);
    if name.is_empty() {
        bail!("invalid project name '{raw_name}'");
    }

    info!(
        "compose project '{}' with {} service(s)",
        name,
        services.len()
    );

    Ok(ComposeProject::new(name, dir, files, services))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WEB_AND_DB: &str = r#"
services:
  web:
    image: nginx
  db:
    image: postgres:16
"#;

    #[test]
    fn test_locate_default_prefers_compose_yaml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("docker-compose.yml"), WEB_AND_DB).unwrap();
        fs::write(temp.path().join("compose.yaml"), WEB_AND_DB).unwrap();

        let found = locate_default(temp.path()).unwrap();
        assert_eq!(found, temp.path().join("compose.yaml"));
    }

    #[test]
    fn test_locate_default_missing() {
        let temp = TempDir::new().unwrap();
        let err = locate_default(temp.path()).unwrap_err();
        assert!(err.to_string().contains("no compose file found"));
    }

    #[test]
    fn test_load_project_from_default_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("My_Shop");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("compose.yml"), WEB_AND_DB).unwrap();

        let project = load_project(&dir, &AppConfig::default()).unwrap();
        assert_eq!(project.name, "my_shop");
        assert_eq!(project.services.iter().collect::<Vec<_>>(), vec!["web", "db"]);
        assert_eq!(project.files, vec![dir.join("compose.yml")]);
    }

    #[test]
    fn test_declared_name_and_config_precedence() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("compose.yaml"),
            "name: Storefront\nservices:\n  web: {}\n",
        )
        .unwrap();

        let project = load_project(temp.path(), &AppConfig::default()).unwrap();
        assert_eq!(project.name, "storefront");

        let mut config = AppConfig::default();
        config.compose.project_name = Some("override".into());
        let project = load_project(temp.path(), &config).unwrap();
        assert_eq!(project.name, "override");
    }

    #[test]
    fn test_merges_configured_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("base.yaml"), WEB_AND_DB).unwrap();
        fs::write(
            temp.path().join("extra.yaml"),
            "services:\n  worker: {}\n  web: {}\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.compose.files = Some(vec!["base.yaml".into(), "extra.yaml".into()]);
        config.compose.project_name = Some("shop".into());

        let project = load_project(temp.path(), &config).unwrap();
        assert_eq!(
            project.services.iter().collect::<Vec<_>>(),
            vec!["web", "db", "worker"]
        );
        assert_eq!(project.files.len(), 2);
    }

    #[test]
    fn test_missing_configured_file() {
        let temp = TempDir::new().unwrap();
        let err = resolve_files(temp.path(), &[PathBuf::from("nope.yaml")]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_rejects_invalid_service_names() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("compose.yaml"), "services:\n  _web: {}\n").unwrap();
        let err = load_project(temp.path(), &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("must start with a letter or digit"));

        fs::write(temp.path().join("compose.yaml"), "services:\n  we$b: {}\n").unwrap();
        let err = load_project(temp.path(), &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("invalid character '$'"));
    }

    #[test]
    fn test_requires_services() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("compose.yaml"), "name: empty\n").unwrap();

        let err = load_project(temp.path(), &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("does not define any services"));
    }

    #[test]
    fn test_invalid_project_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("compose.yaml"), WEB_AND_DB).unwrap();

        let mut config = AppConfig::default();
        config.compose.project_name = Some("!!!".into());
        let err = load_project(temp.path(), &config).unwrap_err();
        assert!(err.to_string().contains("invalid project name"));
    }
}
