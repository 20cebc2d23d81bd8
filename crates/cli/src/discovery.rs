// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Config file discovery.
//!
//! Walks from the current directory up to the git root looking for gauntlet.toml.

use std::path::{Path, PathBuf};

use crate::config::{self, CONFIG_FILE, Config};
use crate::error::{Error, Result};

/// Find gauntlet.toml starting from `start_dir` and walking up to git root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        // Stop at git root
        if current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Resolve config path from CLI arg, env var, or discovery.
///
/// Priority:
/// 1. CLI flag `-C`/`--config` (handled by clap with env = "GAUNTLET_CONFIG")
/// 2. Discovery from current directory up to git root
/// 3. None (use defaults)
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.exists() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(Error::Config {
            message: format!("config file not found: {}", path.display()),
            path: Some(path.to_path_buf()),
        }),
        None => Ok(find_config(cwd)),
    }
}

/// A loaded configuration and the directory suites run in.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing the config file, or the working directory.
    pub root: PathBuf,
    pub config: Config,
}

/// Locate and load the project configuration.
///
/// Relative paths in the config are resolved against the directory that
/// holds the config file.
pub fn load_project(explicit: Option<&Path>, cwd: &Path) -> Result<Project> {
    match resolve_config(explicit, cwd)? {
        Some(path) => {
            tracing::debug!("using config {}", path.display());
            let config = config::load(&path)?;
            let root = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => cwd.to_path_buf(),
            };
            Ok(Project { root, config })
        }
        None => {
            tracing::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(Project {
                root: cwd.to_path_buf(),
                config: Config::default(),
            })
        }
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
