use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

use crate::{
    composite::{engine::CompositeOptions, transform::ResizeFilter},
    editor::area_editor::EditorSettings,
    foundation::error::{MockpressError, MockpressResult},
};

/// Settings loaded from a TOML file. Every field has a default, so an empty file is valid.
///
/// ```toml
/// storage_root = "/srv/mockpress"
/// outputs_dir = "outputs"
///
/// [editor]
/// min_size_px = 50
///
/// [compositing]
/// resize_filter = "lanczos3"
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory that root-relative asset urls resolve against.
    pub storage_root: PathBuf,
    /// Upload directory, relative to `storage_root`.
    pub uploads_dir: String,
    /// Output directory for job results, relative to `storage_root`.
    pub outputs_dir: String,
    pub editor: EditorConfig,
    pub compositing: CompositingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("."),
            uploads_dir: "uploads".to_owned(),
            outputs_dir: "outputs".to_owned(),
            editor: EditorConfig::default(),
            compositing: CompositingConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub min_size_px: f64,
    pub commit_interval_ms: u64,
    pub handle_radius_px: f64,
    pub rotation_handle_offset_px: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::from(EditorSettings::default())
    }
}

impl From<EditorSettings> for EditorConfig {
    fn from(s: EditorSettings) -> Self {
        Self {
            min_size_px: s.min_size_px,
            commit_interval_ms: u64::try_from(s.commit_interval.as_millis()).unwrap_or(u64::MAX),
            handle_radius_px: s.handle_radius_px,
            rotation_handle_offset_px: s.rotation_handle_offset_px,
        }
    }
}

impl From<EditorConfig> for EditorSettings {
    fn from(c: EditorConfig) -> Self {
        Self {
            min_size_px: c.min_size_px,
            commit_interval: Duration::from_millis(c.commit_interval_ms),
            handle_radius_px: c.handle_radius_px,
            rotation_handle_offset_px: c.rotation_handle_offset_px,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositingConfig {
    pub resize_filter: ResizeFilter,
}

impl From<CompositingConfig> for CompositeOptions {
    fn from(c: CompositingConfig) -> Self {
        Self {
            filter: c.resize_filter,
        }
    }
}

impl Config {
    /// Parse and validate TOML text.
    pub fn from_toml_str(s: &str) -> MockpressResult<Self> {
        let cfg: Self = toml::from_str(s)
            .map_err(|e| MockpressError::validation(format!("invalid config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> MockpressResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MockpressError::not_found(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn editor_settings(&self) -> EditorSettings {
        self.editor.into()
    }

    pub fn composite_options(&self) -> CompositeOptions {
        self.compositing.into()
    }

    fn validate(&self) -> MockpressResult<()> {
        for (name, dir) in [
            ("uploads_dir", &self.uploads_dir),
            ("outputs_dir", &self.outputs_dir),
        ] {
            crate::assets::store::normalize_rel_path(dir)
                .map_err(|e| MockpressError::validation(format!("{name}: {e}")))?;
        }
        let e = &self.editor;
        for (name, v) in [
            ("editor.min_size_px", e.min_size_px),
            ("editor.handle_radius_px", e.handle_radius_px),
            ("editor.rotation_handle_offset_px", e.rotation_handle_offset_px),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(MockpressError::validation(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
