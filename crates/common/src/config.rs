use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::contents::{
    BackendRegistry, BundleBackend, ContentsError, FileStore, PassthroughBackend, Result,
};

const DEFAULT_EXTENSION: &str = ".ipynb";

/// Which storage engine serves an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Bundle,
    File,
}

/// Backend-specific parameters for one alias.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSpec {
    pub kind: BackendKind,
    /// Storage root; owned exclusively by this alias
    pub root: PathBuf,
    /// Trash directory; delete is `Unsupported` without one
    pub trash: Option<PathBuf>,
    /// Document extension, leading dot included
    pub extension: Option<String>,
}

/// Backend registration, read once at process startup. Not hot-reloadable.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backends: BTreeMap<String, BackendSpec>,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)
            .map_err(|e| ContentsError::Validation(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Enforce what the runtime cannot: aliases are single path segments,
    /// and no two aliases point at overlapping storage roots.
    pub fn validate(&self) -> Result<()> {
        for (alias, spec) in &self.backends {
            if alias.is_empty() || alias.contains('/') {
                return Err(ContentsError::Validation(format!(
                    "backend alias must be a single non-empty path segment: '{alias}'"
                )));
            }
            if let Some(ext) = &spec.extension {
                if !ext.starts_with('.') || ext.len() < 2 {
                    return Err(ContentsError::Validation(format!(
                        "extension for '{alias}' must start with a dot: '{ext}'"
                    )));
                }
            }
        }
        let roots: Vec<(&String, &PathBuf)> = self
            .backends
            .iter()
            .map(|(alias, spec)| (alias, &spec.root))
            .collect();
        for (i, (alias_a, root_a)) in roots.iter().enumerate() {
            for (alias_b, root_b) in roots.iter().skip(i + 1) {
                if root_a.starts_with(root_b) || root_b.starts_with(root_a) {
                    return Err(ContentsError::Validation(format!(
                        "backends '{alias_a}' and '{alias_b}' have overlapping roots"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build the registry the router is constructed with.
    pub fn build_registry(&self) -> Result<BackendRegistry> {
        self.validate()?;
        let mut registry = BackendRegistry::new();
        for (alias, spec) in &self.backends {
            let mut store = FileStore::new(&spec.root);
            if let Some(trash) = &spec.trash {
                store = store.with_trash(trash);
            }
            let extension = spec
                .extension
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
            match spec.kind {
                BackendKind::Bundle => registry.register(
                    alias,
                    Arc::new(BundleBackend::new(store).with_extension(extension)),
                )?,
                BackendKind::File => {
                    registry.register(alias, Arc::new(PassthroughBackend::new(store, extension)))?
                }
            }
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_build() {
        let raw = r#"
            [backends.docs]
            kind = "bundle"
            root = "/data/docs"
            trash = "/data/trash"

            [backends.scratch]
            kind = "file"
            root = "/data/scratch"
            extension = ".ipynb"
        "#;
        let config = Config::from_toml_str(raw).unwrap();
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends["docs"].kind, BackendKind::Bundle);

        let registry = config.build_registry().unwrap();
        assert_eq!(registry.aliases(), vec!["docs", "scratch"]);
    }

    #[test]
    fn test_overlapping_roots_rejected() {
        let raw = r#"
            [backends.outer]
            kind = "bundle"
            root = "/data"

            [backends.inner]
            kind = "file"
            root = "/data/nested"
        "#;
        let err = Config::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, ContentsError::Validation(_)));
    }

    #[test]
    fn test_bad_extension_rejected() {
        let raw = r#"
            [backends.docs]
            kind = "bundle"
            root = "/data/docs"
            extension = "ipynb"
        "#;
        assert!(Config::from_toml_str(raw).is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let raw = r#"
            [backends.docs]
            kind = "s3"
            root = "/data/docs"
        "#;
        assert!(Config::from_toml_str(raw).is_err());
    }
}
