//! Media URL resolution

use crate::cart::CartLine;

/// Path segment between the storage host and the object path for publicly
/// readable objects.
const PUBLIC_OBJECT_SEGMENT: &str = "storage/v1/object/public";

/// Resolves object-storage paths to public URLs.
///
/// Product imagery lives in an object store whose public objects are served
/// from a fixed URL layout; this type only builds strings and never talks to
/// the store itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBase {
    base_url: String,
}

impl MediaBase {
    /// Creates a resolver for the given storage host, e.g.
    /// `"https://cdn.example.com"`. Trailing slashes are ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();

        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { base_url }
    }

    /// The public URL of the object at `path`.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');

        format!("{}/{PUBLIC_OBJECT_SEGMENT}/{path}", self.base_url)
    }

    /// The display image for a cart line.
    ///
    /// A direct image URL wins over a storage path; a line with neither has
    /// no image.
    #[must_use]
    pub fn line_image(&self, line: &CartLine) -> Option<String> {
        if let Some(url) = &line.image_url {
            return Some(url.clone());
        }

        line.image_path.as_deref().map(|path| self.public_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_uses_fixed_layout() {
        let media = MediaBase::new("https://cdn.example.com");

        assert_eq!(
            media.public_url("products/tee-front.png"),
            "https://cdn.example.com/storage/v1/object/public/products/tee-front.png"
        );
    }

    #[test]
    fn public_url_normalises_slashes() {
        let media = MediaBase::new("https://cdn.example.com/");

        assert_eq!(
            media.public_url("/products/tee-front.png"),
            "https://cdn.example.com/storage/v1/object/public/products/tee-front.png"
        );
    }

    #[test]
    fn line_image_prefers_direct_url() {
        let media = MediaBase::new("https://cdn.example.com");
        let line = CartLine::new("tee", "Tee", 10_00)
            .with_image_url("https://elsewhere.example.com/tee.png")
            .with_image_path("products/tee.png");

        assert_eq!(
            media.line_image(&line).as_deref(),
            Some("https://elsewhere.example.com/tee.png")
        );
    }

    #[test]
    fn line_image_falls_back_to_path() {
        let media = MediaBase::new("https://cdn.example.com");
        let line = CartLine::new("tee", "Tee", 10_00).with_image_path("products/tee.png");

        assert_eq!(
            media.line_image(&line).as_deref(),
            Some("https://cdn.example.com/storage/v1/object/public/products/tee.png")
        );
    }

    #[test]
    fn line_image_absent_when_line_has_none() {
        let media = MediaBase::new("https://cdn.example.com");
        let line = CartLine::new("tee", "Tee", 10_00);

        assert_eq!(media.line_image(&line), None);
    }
}
