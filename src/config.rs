use std::path::{Path, PathBuf};

use crate::error::{ImportError, Result};

pub const DEFAULT_CONTENT_DIR: &str = "content";
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_ROOT_MARKER: &str = "gallery";
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Site layout and import rules shared by every run against one Hugo site
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub site_root: PathBuf,
    pub content_dir: PathBuf,
    pub assets_dir: PathBuf,
    /// Directory name at which the collection walk stops
    pub root_marker: String,
    /// Lowercased extensions, without the dot
    pub image_extensions: Vec<String>,
}

impl ImportConfig {
    pub fn new(site_root: impl Into<PathBuf>) -> Result<Self> {
        let site_root = site_root.into();
        if site_root.as_os_str().is_empty() {
            return Err(ImportError::Configuration(
                "site root is empty; set HUGO_DIR or pass --site-root".to_string(),
            ));
        }

        Ok(ImportConfig {
            site_root,
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        })
    }

    pub fn with_root_marker(mut self, root_marker: impl Into<String>) -> Result<Self> {
        let root_marker = root_marker.into();
        if root_marker.is_empty() || root_marker.contains(['/', '\\']) {
            return Err(ImportError::Configuration(format!(
                "root marker must be a single directory name, got {:?}",
                root_marker
            )));
        }
        self.root_marker = root_marker;
        Ok(self)
    }

    pub fn with_image_extensions<I, S>(mut self, extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(ImportError::Configuration(
                "at least one image extension is required".to_string(),
            ));
        }
        self.image_extensions = extensions;
        Ok(self)
    }

    pub fn with_layout(mut self, content_dir: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        self.content_dir = content_dir.into();
        self.assets_dir = assets_dir.into();
        self
    }

    pub fn content_root(&self) -> PathBuf {
        self.site_root.join(&self.content_dir)
    }

    pub fn assets_root(&self) -> PathBuf {
        self.site_root.join(&self.assets_dir)
    }

    /// Build the request for importing `source_path` into `section`
    pub fn request(&self, source_path: &Path, section: &Path, title: &str) -> GalleryRequest {
        GalleryRequest {
            title: title.to_string(),
            source_path: source_path.to_path_buf(),
            destination_section: section.to_path_buf(),
            content_root: self.content_root(),
            assets_root: self.assets_root(),
        }
    }
}

/// Input to one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRequest {
    pub title: String,
    pub source_path: PathBuf,
    /// Section path relative to the content root, e.g. `gallery/2022/hawaii`
    pub destination_section: PathBuf,
    pub content_root: PathBuf,
    pub assets_root: PathBuf,
}

impl GalleryRequest {
    /// Directory the gallery's images and `index.md` land in
    pub fn content_path(&self) -> PathBuf {
        self.content_root.join(&self.destination_section)
    }
}
