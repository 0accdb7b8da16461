//! Core [`RuleLoader`] struct: filesystem-backed rule loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::schema::{RuleDocument, RuleEnvelope};

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// Filesystem-backed rule loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files and keeps
/// the parsed [`RuleDocument`]s keyed by `metadata.id`.
pub struct RuleLoader {
    /// Root directory containing rule YAML files.
    rules_dir: PathBuf,
    /// Parsed documents keyed by `metadata.id`, in id order.
    documents: BTreeMap<String, RuleDocument>,
}

impl RuleLoader {
    pub fn new(rules_dir: PathBuf) -> Self {
        Self {
            rules_dir,
            documents: BTreeMap::new(),
        }
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse errors are reported
    /// per-file but do not abort the scan. A missing directory is an error.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        if !self.rules_dir.is_dir() {
            return Err(RuleError::Validation(format!(
                "rules directory {} does not exist",
                self.rules_dir.display()
            )));
        }
        let mut results = Vec::new();
        let dir = self.rules_dir.clone();
        self.scan_dir_recursive(&dir, &mut results)?;
        Ok(results)
    }

    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        // Sorted: on duplicate ids the first path wins.
        paths.sort();

        for path in paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);

            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            match self.load_file(&path) {
                Ok(doc) => {
                    let rule_id = doc.metadata().id.clone();
                    if self.documents.contains_key(&rule_id) {
                        warn!(
                            rule_id = %rule_id,
                            path = %path.display(),
                            "duplicate rule id, keeping first"
                        );
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Failed {
                                error: format!("duplicate rule id '{rule_id}'"),
                            },
                        });
                        continue;
                    }
                    info!(
                        rule_id = %rule_id,
                        kind = %doc.kind(),
                        path = %path.display(),
                        "loaded rule"
                    );
                    self.documents.insert(rule_id.clone(), doc);
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { rule_id },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule file");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    /// Parse a single YAML file into a [`RuleDocument`] via two-pass deserialization.
    pub fn load_file(&self, path: &Path) -> Result<RuleDocument> {
        let contents = fs::read_to_string(path)?;
        Self::parse_str(&contents)
    }

    /// Parse YAML text into a [`RuleDocument`].
    pub fn parse_str(contents: &str) -> Result<RuleDocument> {
        let envelope: RuleEnvelope = serde_yaml::from_str(contents)?;

        if envelope.metadata.id.is_empty() {
            return Err(RuleError::Validation(
                "rule metadata.id must not be empty".to_string(),
            ));
        }

        envelope.parse_full().map_err(|e| {
            RuleError::Validation(format!(
                "failed to parse rule '{}': {}",
                envelope.metadata.id, e
            ))
        })
    }

    /// Add an already-parsed document (e.g. built in code).
    pub fn insert(&mut self, doc: RuleDocument) -> Result<()> {
        let id = doc.metadata().id.clone();
        if self.documents.contains_key(&id) {
            return Err(RuleError::Validation(format!("duplicate rule id '{id}'")));
        }
        self.documents.insert(id, doc);
        Ok(())
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// All loaded documents, in id order.
    pub fn documents(&self) -> impl Iterator<Item = &RuleDocument> {
        self.documents.values()
    }

    pub fn get(&self, id: &str) -> Option<&RuleDocument> {
        self.documents.get(id)
    }
}
