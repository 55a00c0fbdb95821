use crate::config::types::{Config, EntryPoints, SeedConfig};
use crate::config::validation::validate;
use crate::title::{Namespace, Title};
use crate::{ConfigError, TitleError};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// Relative `portals-file` / `categories-file` paths are resolved against the
/// directory containing the configuration file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use wikifrontier::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;

    if let Some(base) = path.parent() {
        resolve_relative(&mut config.seeds.portals_file, base);
        resolve_relative(&mut config.seeds.categories_file, base);
    }

    validate(&config)?;

    Ok(config)
}

fn resolve_relative(file: &mut Option<PathBuf>, base: &Path) {
    if let Some(path) = file {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded in the run statistics so every checkpoint can be
/// traced back to the configuration that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Resolves the configured portals and categories into canonical titles
///
/// Inline names come first, followed by the lines of the optional list files
/// (blank lines and `#` comments are skipped). Names without a namespace get
/// `Portal:` or `Category:` prepended. Duplicates are removed, keeping the
/// first occurrence.
///
/// # Errors
///
/// * `ConfigError::EntryPointList` - A list file could not be read
/// * `ConfigError::EntryPoint` - A name is not a valid title
pub fn resolve_entry_points(seeds: &SeedConfig) -> Result<EntryPoints, ConfigError> {
    let mut portal_names = seeds.portals.clone();
    if let Some(file) = &seeds.portals_file {
        portal_names.extend(read_entry_point_list(file)?);
    }

    let mut category_names = seeds.categories.clone();
    if let Some(file) = &seeds.categories_file {
        category_names.extend(read_entry_point_list(file)?);
    }

    Ok(EntryPoints {
        portals: to_titles(&portal_names, Namespace::Portal)?,
        categories: to_titles(&category_names, Namespace::Category)?,
    })
}

fn read_entry_point_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::EntryPointList {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn to_titles(names: &[String], namespace: Namespace) -> Result<Vec<Title>, ConfigError> {
    let mut titles: Vec<Title> = Vec::with_capacity(names.len());

    for name in names {
        let title = Title::parse(name).map_err(|source| ConfigError::EntryPoint {
            name: name.clone(),
            source,
        })?;

        let title = match title.namespace() {
            Some(ns) if ns == namespace => title,
            None => {
                let prefixed = format!("{}:{}", namespace.prefix(), title);
                Title::parse(&prefixed).map_err(|source| ConfigError::EntryPoint {
                    name: name.clone(),
                    source,
                })?
            }
            Some(_) => {
                return Err(ConfigError::EntryPoint {
                    name: name.clone(),
                    source: TitleError::WrongNamespace {
                        title: title.to_string(),
                        expected: namespace.prefix(),
                    },
                })
            }
        };

        if !titles.contains(&title) {
            titles.push(title);
        }
    }

    Ok(titles)
}
