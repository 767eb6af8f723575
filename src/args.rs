use clap::Parser;
use std::path::PathBuf;

use crate::config::{ImportConfig, DEFAULT_ASSETS_DIR, DEFAULT_CONTENT_DIR, DEFAULT_ROOT_MARKER};
use crate::error::{ImportError, Result};

#[derive(Debug, Parser)]
#[command(name = "hugo-gallery")]
#[command(about = "Import a folder of photos into a Hugo gallery section")]
#[command(
    after_help = "Example:\n  HUGO_DIR=$HOME/sites/photos hugo-gallery /mnt/d/photos/2022/hawaii gallery/2022/hawaii \"Hawaii Trip\""
)]
#[command(version)]
pub struct Args {
    /// Directory holding the photos to import
    pub source_path: PathBuf,

    /// Section under the content directory, e.g. gallery/2022/hawaii
    pub section: PathBuf,

    /// Gallery title; hyphens become spaces
    pub title: String,

    /// Root of the Hugo site
    #[arg(long, env = "HUGO_DIR")]
    pub site_root: Option<PathBuf>,

    /// Content directory, relative to the site root
    #[arg(long, default_value = DEFAULT_CONTENT_DIR)]
    pub content_dir: PathBuf,

    /// Assets directory, relative to the site root
    #[arg(long, default_value = DEFAULT_ASSETS_DIR)]
    pub assets_dir: PathBuf,

    /// Directory name where collection posts stop being created
    #[arg(long, default_value = DEFAULT_ROOT_MARKER)]
    pub root_marker: String,

    /// Image extension to import (repeatable)
    #[arg(long = "extension", value_name = "EXT", default_values_t = ["jpg".to_string(), "jpeg".to_string()])]
    pub extensions: Vec<String>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the arguments into the site configuration for this run
    pub fn import_config(&self) -> Result<ImportConfig> {
        let site_root = self.site_root.clone().ok_or_else(|| {
            ImportError::Configuration(
                "no site root: set HUGO_DIR or pass --site-root".to_string(),
            )
        })?;

        Ok(ImportConfig::new(site_root)?
            .with_layout(&self.content_dir, &self.assets_dir)
            .with_root_marker(&self.root_marker)?
            .with_image_extensions(&self.extensions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let args = Args::try_parse_from([
            "hugo-gallery",
            "/photos/hawaii",
            "gallery/2022/hawaii",
            "Hawaii-Trip",
            "--site-root",
            "/site",
        ])
        .unwrap();

        assert_eq!(args.source_path, PathBuf::from("/photos/hawaii"));
        assert_eq!(args.section, PathBuf::from("gallery/2022/hawaii"));
        assert_eq!(args.title, "Hawaii-Trip");

        let config = args.import_config().unwrap();
        assert_eq!(config.content_root(), PathBuf::from("/site/content"));
        assert_eq!(config.root_marker, "gallery");
        assert_eq!(config.image_extensions, vec!["jpg", "jpeg"]);
    }

    #[test]
    fn test_fewer_than_three_positionals_is_a_usage_error() {
        let err = Args::try_parse_from(["hugo-gallery", "/photos", "gallery/x"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "hugo-gallery",
            "src",
            "photos/x",
            "X",
            "--site-root",
            "/site",
            "--root-marker",
            "photos",
            "--extension",
            "PNG",
            "--extension",
            "jpg",
        ])
        .unwrap();

        let config = args.import_config().unwrap();
        assert_eq!(config.root_marker, "photos");
        assert_eq!(config.image_extensions, vec!["png", "jpg"]);
    }
}
