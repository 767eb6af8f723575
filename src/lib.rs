pub mod args;
pub mod collection;
pub mod config;
pub mod error;
pub mod importer;
pub mod metadata;
pub mod naming;
pub mod post;

pub use config::{GalleryRequest, ImportConfig};
pub use error::ImportError;
pub use importer::{ImportSummary, Importer};
pub use metadata::{CaptureTimeReader, ExifToolReader};
