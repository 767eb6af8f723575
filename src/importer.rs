use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::collection::{CollectionChain, WalkStop};
use crate::config::{GalleryRequest, ImportConfig};
use crate::error::{ImportError, Result};
use crate::metadata::CaptureTimeReader;
use crate::naming::{display_title, is_importable_image};
use crate::post::{PostKind, PostRecord};

const GALLERY_POST: &str = "index.md";

/// Running cover choice while images are copied.
///
/// Starts with no cover and the Unix epoch; a file only takes over when its
/// capture time is strictly later, so ties keep the file seen first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFold {
    pub cover: Option<String>,
    pub latest: DateTime<Utc>,
}

impl Default for CaptureFold {
    fn default() -> Self {
        CaptureFold {
            cover: None,
            latest: DateTime::<Utc>::default(),
        }
    }
}

impl CaptureFold {
    pub fn observe(self, file_name: &str, taken: Option<DateTime<Utc>>) -> Self {
        match taken {
            Some(taken) if taken > self.latest => CaptureFold {
                cover: Some(file_name.to_string()),
                latest: taken,
            },
            _ => self,
        }
    }
}

/// What one import run did
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub gallery_post: PathBuf,
    /// Copied file names, in listing order
    pub copied: Vec<String>,
    pub skipped: usize,
    pub cover: Option<String>,
    pub latest: DateTime<Utc>,
    pub collections: Vec<PathBuf>,
    pub walk_stop: WalkStop,
}

impl ImportSummary {
    pub fn log(&self) {
        info!("=== IMPORT COMPLETE ===");
        info!("Gallery post: {}", self.gallery_post.display());
        info!("Images copied: {}", self.copied.len());
        info!("Entries skipped: {}", self.skipped);
        match &self.cover {
            Some(cover) => info!("Cover: {} ({})", cover, self.latest.date_naive()),
            None => info!("Cover: none"),
        }
        info!("Collection posts created: {}", self.collections.len());
        for post in &self.collections {
            info!("  - {}", post.display());
        }
    }
}

pub struct Importer<R> {
    config: ImportConfig,
    reader: R,
}

impl<R: CaptureTimeReader> Importer<R> {
    pub fn new(config: ImportConfig, reader: R) -> Self {
        Importer { config, reader }
    }

    /// Copy a photo folder into its content section and write the gallery
    /// and ancestor collection posts.
    pub fn import(&mut self, request: &GalleryRequest) -> Result<ImportSummary> {
        info!(
            source = %request.source_path.display(),
            section = %request.destination_section.display(),
            "starting gallery import"
        );

        let content_path = self.ensure_destination(request)?;
        let (images, skipped) = self.collect_images(&request.source_path)?;
        if images.is_empty() {
            info!(source = %request.source_path.display(), "no matching images found");
        }

        let in_place = is_same_dir(&request.source_path, &content_path);
        let mut copied = Vec::with_capacity(images.len());
        let mut fold = CaptureFold::default();

        for (path, file_name) in images {
            let taken = self.reader.read_capture_time(&path)?;
            if !in_place {
                copy_file(&path, &content_path.join(&file_name))?;
            }
            fold = fold.observe(&file_name, taken);
            copied.push(file_name);
        }

        let date = fold.latest.date_naive();
        let gallery_post = content_path.join(GALLERY_POST);
        let post = PostRecord {
            kind: PostKind::Gallery,
            title: display_title(&request.title),
            date,
            cover: fold.cover.clone().unwrap_or_default(),
        };
        post.write_to(&gallery_post)?;
        info!(post = %gallery_post.display(), "created gallery post");

        let chain = CollectionChain::plan(
            &content_path,
            &request.content_root,
            &self.config.root_marker,
            |p| p.exists(),
        );
        match &chain.stop {
            WalkStop::Exists(post) => info!(post = %post.display(), "collection post already exists"),
            WalkStop::AtRoot(dir) => debug!(dir = %dir.display(), "reached root marker"),
            WalkStop::ContentRoot => debug!("reached content root"),
        }

        let cover_source = fold.cover.as_ref().map(|c| request.source_path.join(c));
        let collections = chain.create_posts(cover_source.as_deref(), date, &request.assets_root)?;

        Ok(ImportSummary {
            gallery_post,
            copied,
            skipped,
            cover: fold.cover,
            latest: fold.latest,
            collections,
            walk_stop: chain.stop,
        })
    }

    fn ensure_destination(&self, request: &GalleryRequest) -> Result<PathBuf> {
        let section = &request.destination_section;
        let escapes = section
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ImportError::Configuration(format!(
                "destination section must be relative to the content directory: {}",
                section.display()
            )));
        }

        let content_root = &request.content_root;
        let is_site = fs::metadata(content_root)
            .map_err(|e| ImportError::path(content_root, e))?
            .is_dir();
        if !is_site {
            return Err(ImportError::path(
                content_root,
                io::Error::new(io::ErrorKind::Other, "not a directory; is this a Hugo site?"),
            ));
        }

        let content_path = request.content_path();
        if !content_path.is_dir() {
            fs::create_dir_all(&content_path).map_err(|e| ImportError::path(&content_path, e))?;
            info!(dir = %content_path.display(), "created content directory");
        }

        Ok(content_path)
    }

    /// List `dir` one level deep and keep the images, sorted by file name.
    /// Returns the images and the number of entries passed over.
    fn collect_images(&self, dir: &Path) -> Result<(Vec<(PathBuf, String)>, usize)> {
        let is_dir = fs::metadata(dir)
            .map_err(|e| ImportError::path(dir, e))?
            .is_dir();
        if !is_dir {
            return Err(ImportError::path(
                dir,
                io::Error::new(io::ErrorKind::Other, "source is not a directory"),
            ));
        }

        let mut images = Vec::new();
        let mut skipped = 0;

        for entry_result in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(dir).to_path_buf();
                    // An unreadable entry only matters if it would have been imported
                    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                    match name {
                        Some(name)
                            if err.depth() > 0
                                && !is_importable_image(&name, &self.config.image_extensions) =>
                        {
                            debug!(file = %path.display(), "skipping unreadable non-image entry");
                            skipped += 1;
                            continue;
                        }
                        _ => return Err(ImportError::path(path, io::Error::from(err))),
                    }
                }
            };

            // Entries are not followed; a symlinked directory is still a directory
            if entry.file_type().is_dir() || entry.path().is_dir() {
                skipped += 1;
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !is_importable_image(&file_name, &self.config.image_extensions) {
                debug!(file = %entry.path().display(), "skipping non-image entry");
                skipped += 1;
                continue;
            }

            images.push((entry.into_path(), file_name));
        }

        Ok((images, skipped))
    }
}

/// Copy `from` over `to` byte for byte and sync it to disk
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let copy_error = |source: io::Error| ImportError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let mut src = File::open(from).map_err(copy_error)?;
    let mut dest = File::create(to).map_err(copy_error)?;
    io::copy(&mut src, &mut dest).map_err(copy_error)?;
    dest.sync_all().map_err(copy_error)?;

    info!(from = %from.display(), to = %to.display(), "copied file");
    Ok(())
}

fn is_same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
