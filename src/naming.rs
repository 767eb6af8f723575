use std::path::Path;

/// Directory under the assets root that collection covers are copied into
pub const COVER_ASSET_DIR: &str = "images";

/// Whether a file name looks like an image the importer should take.
///
/// Names without an extension after the first character (dotfiles such as
/// `.DS_Store`, bare names) are rejected before the extension check.
pub fn is_importable_image(file_name: &str, extensions: &[String]) -> bool {
    let lower = file_name.to_lowercase();

    match lower.find('.') {
        Some(idx) if idx > 0 => {}
        _ => return false,
    }

    get_extension(Path::new(&lower))
        .map(|ext| extensions.iter().any(|e| *e == ext))
        .unwrap_or(false)
}

/// Post title from a directory name or user-supplied title
pub fn display_title(name: &str) -> String {
    name.replace('-', " ")
}

/// Asset-relative path of a collection cover: `images/<collection>-<cover>`
pub fn cover_asset_reference(collection_name: &str, cover_image: &str) -> String {
    format!(
        "{}/{}-{}",
        COVER_ASSET_DIR,
        collection_name.to_lowercase(),
        cover_image
    )
}

/// Get the file extension from a path
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpegs() -> Vec<String> {
        vec!["jpg".to_string(), "jpeg".to_string()]
    }

    #[test]
    fn test_importable_images() {
        assert!(is_importable_image("d.jpg", &jpegs()));
        assert!(is_importable_image("IMG_0001.JPG", &jpegs()));
        assert!(is_importable_image("holiday.Jpeg", &jpegs()));
        assert!(is_importable_image("my.trip.jpg", &jpegs()));
    }

    #[test]
    fn test_rejected_names() {
        assert!(!is_importable_image(".DS_Store", &jpegs()));
        assert!(!is_importable_image(".hidden.jpg", &jpegs()));
        assert!(!is_importable_image("README", &jpegs()));
        assert!(!is_importable_image("notes.txt", &jpegs()));
        assert!(!is_importable_image("IMG_0001.AAE", &jpegs()));
        assert!(!is_importable_image("scan.png", &jpegs()));
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("test-gallery"), "test gallery");
        assert_eq!(display_title("Hawaii Trip"), "Hawaii Trip");
        assert_eq!(display_title("2022"), "2022");
    }

    #[test]
    fn test_cover_asset_reference() {
        assert_eq!(
            cover_asset_reference("Hawaii", "IMG_0001.JPG"),
            "images/hawaii-IMG_0001.JPG"
        );
    }
}
