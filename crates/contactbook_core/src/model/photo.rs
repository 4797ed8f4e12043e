//! Photo references for contacts.
//!
//! The store never inspects image data. It keeps whatever opaque reference
//! the image-acquisition collaborator hands over: a plain URI, or an inline
//! `data:<mime>;base64,<payload>` reference built by [`encode_data_uri`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Bundled asset rendered for contacts without a photo.
pub const PLACEHOLDER_PHOTO: &str = "asset:images/image.png";

/// Outcome of a camera or gallery pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSelection {
    /// Raw image bytes with their MIME type.
    Selected { mime: String, bytes: Vec<u8> },
    /// Reference already resolved by the picker (file or content URI).
    Uri(String),
    Cancelled,
    Failed(String),
}

/// Builds an inline `data:` reference for image bytes.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime.trim(), STANDARD.encode(bytes))
}

/// Returns the photo reference to keep after a pick.
///
/// Cancellation and picker failures leave the current photo untouched.
pub fn apply_selection(current: Option<String>, selection: PhotoSelection) -> Option<String> {
    match selection {
        PhotoSelection::Selected { mime, bytes } => Some(encode_data_uri(&mime, &bytes)),
        PhotoSelection::Uri(uri) => normalize_photo_ref(Some(uri)).or(current),
        PhotoSelection::Cancelled => current,
        PhotoSelection::Failed(reason) => {
            log::warn!(
                "event=photo_pick module=model status=error reason_len={}",
                reason.len()
            );
            current
        }
    }
}

/// Maps empty or blank references to `None`; others are kept byte for byte.
pub fn normalize_photo_ref(photo: Option<String>) -> Option<String> {
    photo.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{apply_selection, encode_data_uri, normalize_photo_ref, PhotoSelection};

    #[test]
    fn encodes_bytes_as_data_uri() {
        assert_eq!(
            encode_data_uri("image/png", b"abc"),
            "data:image/png;base64,YWJj"
        );
    }

    #[test]
    fn cancelled_and_failed_picks_keep_current_photo() {
        let current = Some("file:///old.png".to_string());
        assert_eq!(
            apply_selection(current.clone(), PhotoSelection::Cancelled),
            current
        );
        assert_eq!(
            apply_selection(
                current.clone(),
                PhotoSelection::Failed("camera unavailable".to_string())
            ),
            current
        );
    }

    #[test]
    fn selected_bytes_replace_current_photo() {
        let updated = apply_selection(
            Some("file:///old.png".to_string()),
            PhotoSelection::Selected {
                mime: "image/jpeg".to_string(),
                bytes: vec![0xff, 0xd8],
            },
        );
        assert_eq!(updated.as_deref(), Some("data:image/jpeg;base64,/9g="));
    }

    #[test]
    fn blank_uri_does_not_clear_photo() {
        let current = Some("file:///old.png".to_string());
        assert_eq!(
            apply_selection(current.clone(), PhotoSelection::Uri("  ".to_string())),
            current
        );
        assert_eq!(normalize_photo_ref(Some(String::new())), None);
    }
}
