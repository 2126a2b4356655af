use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{MockpressError, MockpressResult};

/// File access used by ingestion, the compositing engine and the job runner.
///
/// Urls are root-relative (`/uploads/mockups/a.png`); paths are what [`resolve`]
/// returns for them.
///
/// [`resolve`]: AssetStore::resolve
pub trait AssetStore: Send + Sync {
    /// Map a stored url to an absolute file path.
    fn resolve(&self, url: &str) -> MockpressResult<PathBuf>;

    /// Public url for a root-relative path such as `outputs/<job>/<file>`.
    fn url_for(&self, rel_path: &str) -> MockpressResult<String>;

    fn exists(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> MockpressResult<Vec<u8>>;

    /// Write `bytes` to `path`, creating parent directories as needed.
    fn write(&self, path: &Path, bytes: &[u8]) -> MockpressResult<()>;
}

/// [`AssetStore`] backed by a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used when resolving urls.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetStore for FsAssetStore {
    fn resolve(&self, url: &str) -> MockpressResult<PathBuf> {
        let rel = normalize_rel_path(url.strip_prefix('/').unwrap_or(url))?;
        Ok(self.root.join(Path::new(&rel)))
    }

    fn url_for(&self, rel_path: &str) -> MockpressResult<String> {
        Ok(format!("/{}", normalize_rel_path(rel_path)?))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> MockpressResult<Vec<u8>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(MockpressError::not_found(
                format!("file not found: {}", path.display()),
            )),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read asset bytes from '{}'", path.display()))
                .into()),
        }
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> MockpressResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

/// Normalize and validate root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> MockpressResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MockpressError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(MockpressError::validation("asset path must be non-empty"));
    }
    if s.contains(':') {
        return Err(MockpressError::validation(
            "asset paths must not contain a scheme or drive prefix",
        ));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(MockpressError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(MockpressError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
