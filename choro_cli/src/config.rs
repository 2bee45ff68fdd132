// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The TOML config file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use choro_geo::SourcePaths;
use choro_views::ViewConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) input: InputConfig,
    pub(crate) output: OutputConfig,
    #[serde(default)]
    pub(crate) view: ViewConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputConfig {
    pub(crate) records: PathBuf,
    pub(crate) counties: PathBuf,
    pub(crate) background: PathBuf,
    /// Defaults to the view's key field.
    pub(crate) key_column: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct OutputConfig {
    pub(crate) dir: PathBuf,
}

impl AppConfig {
    /// Reads `path`. Relative paths inside are resolved against the file's directory.
    pub(crate) fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    pub(crate) fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub(crate) fn source_paths(&self) -> SourcePaths {
        SourcePaths {
            records: self.input.records.clone(),
            counties: self.input.counties.clone(),
            background: self.input.background.clone(),
            key_column: self
                .input
                .key_column
                .clone()
                .unwrap_or_else(|| self.view.key_field.clone()),
        }
    }

    fn rebase(&mut self, base: &Path) {
        for p in [
            &mut self.input.records,
            &mut self.input.counties,
            &mut self.input.background,
            &mut self.output.dir,
        ] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }
}
