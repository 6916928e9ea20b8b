// Configuration loading and parsing (exchange.toml).

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub exchange: ExchangeConfig,
    /// Path of the history JSON file, relative to the working directory.
    pub history_path: String,
}

/// The exchange definition assembled from `exchange.toml`.
///
/// `participants` preserves configuration-file order (group order, then
/// member order within each group); the generator pairs against this
/// fixed enumeration order.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub name: String,
    /// Attempt ceiling for one draw of the rejection sampler.
    pub max_attempts: u32,
    pub participants: Vec<String>,
    group_of: HashMap<String, String>,
    gives_to: HashMap<String, Vec<String>>,
}

impl ExchangeConfig {
    /// Assemble an exchange from (group id, members, gives_to) triples.
    /// Inputs are assumed validated; the loader validates the raw file
    /// before calling this.
    pub fn from_groups(
        name: &str,
        max_attempts: u32,
        groups: &[(&str, &[&str], &[&str])],
    ) -> Self {
        let sections: Vec<GroupSection> = groups
            .iter()
            .map(|(id, members, gives_to)| GroupSection {
                id: id.to_string(),
                members: members.iter().map(|m| m.to_string()).collect(),
                gives_to: gives_to.iter().map(|g| g.to_string()).collect(),
            })
            .collect();
        Self::assemble(name.to_string(), max_attempts, &sections)
    }

    fn assemble(name: String, max_attempts: u32, groups: &[GroupSection]) -> Self {
        let mut participants = Vec::new();
        let mut group_of = HashMap::new();
        let mut gives_to = HashMap::new();

        for group in groups {
            for member in &group.members {
                participants.push(member.clone());
                group_of.insert(member.clone(), group.id.clone());
            }
            gives_to.insert(group.id.clone(), group.gives_to.clone());
        }

        ExchangeConfig {
            name,
            max_attempts,
            participants,
            group_of,
            gives_to,
        }
    }

    /// The group id `participant` belongs to, if configured.
    pub fn group_of(&self, participant: &str) -> Option<&str> {
        self.group_of.get(participant).map(String::as_str)
    }

    /// True iff group rules permit `giver` to give to `receiver`:
    /// the receiver's group appears in the giver's group allow-list.
    pub fn group_allows(&self, giver: &str, receiver: &str) -> bool {
        let (Some(giver_group), Some(receiver_group)) =
            (self.group_of.get(giver), self.group_of.get(receiver))
        else {
            return false;
        };
        self.gives_to
            .get(giver_group)
            .is_some_and(|targets| targets.iter().any(|t| t == receiver_group))
    }
}

// ---------------------------------------------------------------------------
// exchange.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire exchange.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ExchangeFile {
    exchange: ExchangeSection,
    storage: StorageSection,
    #[serde(rename = "group")]
    groups: Vec<GroupSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExchangeSection {
    name: String,
    max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct StorageSection {
    history_path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GroupSection {
    id: String,
    members: Vec<String>,
    gives_to: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/exchange.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization
/// automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = base_dir.join("config").join("exchange.toml");
    let text = read_file(&config_path)?;
    let file: ExchangeFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    validate(&file)?;

    let exchange = ExchangeConfig::assemble(
        file.exchange.name,
        file.exchange.max_attempts,
        &file.groups,
    );

    Ok(Config {
        exchange,
        history_path: file.storage.history_path,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &ExchangeFile) -> Result<(), ConfigError> {
    if file.exchange.max_attempts == 0 {
        return Err(ConfigError::ValidationError {
            field: "exchange.max_attempts".into(),
            message: "must be greater than 0".into(),
        });
    }

    if file.storage.history_path.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "storage.history_path".into(),
            message: "must not be empty".into(),
        });
    }

    if file.groups.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "group".into(),
            message: "at least one [[group]] table is required".into(),
        });
    }

    let mut group_ids = HashSet::new();
    for group in &file.groups {
        if !group_ids.insert(group.id.as_str()) {
            return Err(ConfigError::ValidationError {
                field: format!("group.{}", group.id),
                message: "duplicate group id".into(),
            });
        }
        if group.members.is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("group.{}.members", group.id),
                message: "must not be empty".into(),
            });
        }
    }

    // Every participant belongs to exactly one group.
    let mut seen = HashSet::new();
    let mut total = 0usize;
    for group in &file.groups {
        for member in &group.members {
            total += 1;
            if !seen.insert(member.as_str()) {
                return Err(ConfigError::ValidationError {
                    field: format!("group.{}.members", group.id),
                    message: format!("participant `{member}` appears more than once"),
                });
            }
        }
    }

    if total < 2 {
        return Err(ConfigError::ValidationError {
            field: "group".into(),
            message: format!("at least 2 participants are required, got {total}"),
        });
    }

    // Allow-list targets must reference known groups.
    for group in &file.groups {
        for target in &group.gives_to {
            if !group_ids.contains(target.as_str()) {
                return Err(ConfigError::ValidationError {
                    field: format!("group.{}.gives_to", group.id),
                    message: format!("unknown group id `{target}`"),
                });
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
