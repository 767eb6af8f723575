use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ImportError, Result};
use crate::importer::copy_file;
use crate::naming::{cover_asset_reference, display_title, COVER_ASSET_DIR};
use crate::post::{PostKind, PostRecord};

/// Why the walk up the content tree ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStop {
    /// This collection post already exists; everything above is assumed done
    Exists(PathBuf),
    /// Reached the directory named after the root marker
    AtRoot(PathBuf),
    /// Reached the content root without meeting the root marker
    ContentRoot,
}

/// One ancestor directory that needs a collection post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStep {
    pub dir: PathBuf,
    pub name: String,
    /// `<parent>/<name>.md`, next to the directory itself
    pub post_path: PathBuf,
}

/// Ancestors of a gallery that receive collection posts, nearest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionChain {
    pub steps: Vec<CollectionStep>,
    pub stop: WalkStop,
}

impl CollectionChain {
    /// Walk up from the parent of `content_path`.
    ///
    /// `post_exists` is asked about each candidate post path exactly once; the
    /// first existing post ends the walk before the root marker check.
    pub fn plan(
        content_path: &Path,
        content_root: &Path,
        root_marker: &str,
        post_exists: impl Fn(&Path) -> bool,
    ) -> Self {
        let mut steps = Vec::new();
        let mut current = content_path.parent();

        let stop = loop {
            let Some(dir) = current else {
                break WalkStop::ContentRoot;
            };
            let (Some(parent), Some(name)) = (dir.parent(), dir.file_name()) else {
                break WalkStop::ContentRoot;
            };
            let name = name.to_string_lossy().into_owned();
            let post_path = parent.join(format!("{}.md", name));

            if post_exists(post_path.as_path()) {
                break WalkStop::Exists(post_path);
            }
            if name == root_marker {
                break WalkStop::AtRoot(dir.to_path_buf());
            }
            if dir == content_root || !dir.starts_with(content_root) {
                break WalkStop::ContentRoot;
            }

            steps.push(CollectionStep {
                dir: dir.to_path_buf(),
                name,
                post_path,
            });
            current = Some(parent);
        };

        CollectionChain { steps, stop }
    }

    /// Write every planned collection post, copying the cover into the assets tree.
    ///
    /// `cover_source` is the original image file; without one the posts get
    /// an empty cover reference.
    pub fn create_posts(
        &self,
        cover_source: Option<&Path>,
        date: NaiveDate,
        assets_root: &Path,
    ) -> Result<Vec<PathBuf>> {
        let cover_name = cover_source
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());

        if cover_name.is_some() && !self.steps.is_empty() {
            let images_dir = assets_root.join(COVER_ASSET_DIR);
            fs::create_dir_all(&images_dir).map_err(|e| ImportError::path(&images_dir, e))?;
        }

        let mut created = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let cover = match (cover_source, &cover_name) {
                (Some(source), Some(cover_name)) => {
                    let reference = cover_asset_reference(&step.name, cover_name);
                    copy_file(source, &assets_root.join(&reference))?;
                    reference
                }
                _ => String::new(),
            };

            let post = PostRecord {
                kind: PostKind::Collection,
                title: display_title(&step.name),
                date,
                cover,
            };
            post.write_to(&step.post_path)?;
            info!(post = %step.post_path.display(), "created collection post");

            created.push(step.post_path.clone());
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn existing(paths: &[&str]) -> impl Fn(&Path) -> bool {
        let set: HashSet<PathBuf> = paths.iter().map(PathBuf::from).collect();
        move |p: &Path| set.contains(p)
    }

    fn post_paths(chain: &CollectionChain) -> Vec<PathBuf> {
        chain.steps.iter().map(|s| s.post_path.clone()).collect()
    }

    #[test]
    fn test_walk_stops_at_root_marker() {
        let chain = CollectionChain::plan(
            Path::new("/site/content/gallery/a/b/c"),
            Path::new("/site/content"),
            "gallery",
            existing(&[]),
        );

        assert_eq!(
            post_paths(&chain),
            vec![
                PathBuf::from("/site/content/gallery/a/b.md"),
                PathBuf::from("/site/content/gallery/a.md"),
            ]
        );
        assert_eq!(
            chain.stop,
            WalkStop::AtRoot(PathBuf::from("/site/content/gallery"))
        );
        assert_eq!(chain.steps[0].name, "b");
        assert_eq!(chain.steps[0].dir, PathBuf::from("/site/content/gallery/a/b"));
    }

    #[test]
    fn test_existing_post_short_circuits() {
        let chain = CollectionChain::plan(
            Path::new("/site/content/gallery/a/b/c"),
            Path::new("/site/content"),
            "gallery",
            existing(&["/site/content/gallery/a/b.md"]),
        );

        assert!(chain.steps.is_empty());
        assert_eq!(
            chain.stop,
            WalkStop::Exists(PathBuf::from("/site/content/gallery/a/b.md"))
        );
    }

    #[test]
    fn test_existing_post_higher_up() {
        let chain = CollectionChain::plan(
            Path::new("/site/content/gallery/a/b/c"),
            Path::new("/site/content"),
            "gallery",
            existing(&["/site/content/gallery/a.md"]),
        );

        assert_eq!(
            post_paths(&chain),
            vec![PathBuf::from("/site/content/gallery/a/b.md")]
        );
        assert!(matches!(chain.stop, WalkStop::Exists(_)));
    }

    #[test]
    fn test_existence_is_checked_before_root_marker() {
        let chain = CollectionChain::plan(
            Path::new("/site/content/gallery/a"),
            Path::new("/site/content"),
            "gallery",
            existing(&["/site/content/gallery.md"]),
        );

        assert!(chain.steps.is_empty());
        assert_eq!(
            chain.stop,
            WalkStop::Exists(PathBuf::from("/site/content/gallery.md"))
        );
    }

    #[test]
    fn test_gallery_directly_under_marker() {
        let chain = CollectionChain::plan(
            Path::new("/site/content/gallery/hawaii"),
            Path::new("/site/content"),
            "gallery",
            existing(&[]),
        );

        assert!(chain.steps.is_empty());
        assert!(matches!(chain.stop, WalkStop::AtRoot(_)));
    }

    #[test]
    fn test_walk_never_leaves_content_root() {
        let chain = CollectionChain::plan(
            Path::new("/site/content/photos/2022/hawaii"),
            Path::new("/site/content"),
            "gallery",
            existing(&[]),
        );

        assert_eq!(
            post_paths(&chain),
            vec![
                PathBuf::from("/site/content/photos/2022.md"),
                PathBuf::from("/site/content/photos.md"),
            ]
        );
        assert_eq!(chain.stop, WalkStop::ContentRoot);
    }

    #[test]
    fn test_dotted_directory_names_keep_their_dots() {
        let chain = CollectionChain::plan(
            Path::new("/site/content/gallery/2022.05/day-1"),
            Path::new("/site/content"),
            "gallery",
            existing(&[]),
        );

        assert_eq!(
            post_paths(&chain),
            vec![PathBuf::from("/site/content/gallery/2022.05.md")]
        );
    }

    #[test]
    fn test_create_posts_without_cover() {
        let tmp = tempfile::TempDir::new().unwrap();
        let content_root = tmp.path().join("content");
        let content_path = content_root.join("gallery/Big-Island/kona");
        fs::create_dir_all(&content_path).unwrap();

        let chain =
            CollectionChain::plan(&content_path, &content_root, "gallery", |p| p.exists());
        let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let created = chain
            .create_posts(None, date, &tmp.path().join("assets"))
            .unwrap();

        assert_eq!(created, vec![content_root.join("gallery/Big-Island.md")]);
        let post = PostRecord::parse(&fs::read_to_string(&created[0]).unwrap()).unwrap();
        assert_eq!(post.kind, PostKind::Collection);
        assert_eq!(post.title, "Big Island");
        assert_eq!(post.cover, "");
        assert!(!tmp.path().join("assets").exists());
    }
}
