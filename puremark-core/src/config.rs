//! Configuration file support for Puremark
//!
//! Loads the denylist override from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.puremarkrc.json` in project root
//! 3. `puremark.config.json` in project root
//! 4. `"puremark"` key in `package.json`
//!
//! The denylist is the single recognized option. CLI flags extend on top of
//! config file values.

use crate::denylist::Denylist;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Puremark configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuremarkConfig {
    /// Callee names that replace the built-in helper denylist entirely
    #[serde(default)]
    pub denylist: Option<Vec<String>>,

    /// Callee names added on top of the built-in (or replaced) denylist
    #[serde(default)]
    pub extend_denylist: Vec<String>,
}

impl PuremarkConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        let entries = self
            .denylist
            .iter()
            .flatten()
            .chain(self.extend_denylist.iter());

        for name in entries {
            if name.is_empty() {
                anyhow::bail!("denylist entries must not be empty");
            }
            if name.chars().any(|c| c.is_whitespace()) {
                anyhow::bail!("denylist entry {:?} must not contain whitespace", name);
            }
            // Numeric suffixes are matched structurally; a configured `$`
            // would silently never match.
            if name.contains('$') {
                anyhow::bail!("denylist entry {:?} must not contain '$'", name);
            }
        }

        Ok(())
    }

    /// Resolve config into the denylist used by the pass
    pub fn resolve(&self) -> Result<Denylist> {
        self.validate()?;

        let mut denylist = match &self.denylist {
            Some(names) => Denylist::from_names(names.iter().cloned()),
            None => Denylist::default(),
        };
        denylist.extend(self.extend_denylist.iter().cloned());

        Ok(denylist)
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.puremarkrc.json`
/// 2. `puremark.config.json`
/// 3. `"puremark"` key in `package.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(PuremarkConfig, PathBuf)>> {
    // 1. .puremarkrc.json
    let rc_path = project_root.join(".puremarkrc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    // 2. puremark.config.json
    let config_path = project_root.join("puremark.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    // 3. package.json "puremark" key
    let pkg_path = project_root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<PuremarkConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: PuremarkConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load puremark config from the "puremark" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<PuremarkConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("puremark") {
        Some(puremark_value) => {
            let config: PuremarkConfig = serde_json::from_value(puremark_value.clone())
                .with_context(|| format!("invalid puremark config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid puremark config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve the denylist for a project
///
/// If `config_path` is provided, loads from that file. Otherwise discovers
/// config from the project root. `extend` entries (CLI `--deny` flags) are
/// added on top of whatever was loaded.
pub fn load_and_resolve(
    project_root: &Path,
    config_path: Option<&Path>,
    extend: &[String],
) -> Result<Denylist> {
    let config = if let Some(path) = config_path {
        load_config_file(path)?
    } else {
        match discover_config(project_root)? {
            Some((config, _)) => config,
            None => PuremarkConfig::default(),
        }
    };

    let mut denylist = config.resolve()?;
    denylist.extend(extend.iter().cloned());
    Ok(denylist)
}

/// Compile CLI exclude patterns into a glob set
///
/// Returns `None` when no patterns are given.
pub fn compile_excludes(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {}", pattern))?;
        builder.add(glob);
    }

    Ok(Some(builder.build()?))
}
