//! Media type enumeration.

/// Broad type of stored content, derived from its MIME type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
)]
pub enum MediaType {
    /// Image content (PNG, JPEG, WebP, etc.)
    #[display("image")]
    Image,
    /// Audio content (WAV, MP3, OGG, etc.)
    #[display("audio")]
    Audio,
    /// Video content (MP4, WebM, etc.)
    #[display("video")]
    Video,
    /// Anything else
    #[display("other")]
    Other,
}

impl MediaType {
    /// Classify a MIME type such as `image/png` or `audio/L16;rate=24000`.
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type.split('/').next().map(str::trim) {
            Some("image") => MediaType::Image,
            Some("audio") => MediaType::Audio,
            Some("video") => MediaType::Video,
            _ => MediaType::Other,
        }
    }

    /// Directory used to group this type on disk.
    pub fn dir(&self) -> &'static str {
        match self {
            MediaType::Image => "images",
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Other => "other",
        }
    }
}

/// File extension for a MIME type, `bin` when unknown.
pub(crate) fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" => "ogg",
        "audio/l16" | "audio/pcm" => "pcm",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parameters_are_ignored() {
        assert_eq!(
            MediaType::from_content_type("audio/L16;codec=pcm;rate=24000"),
            MediaType::Audio
        );
        assert_eq!(extension_for("audio/L16;codec=pcm;rate=24000"), "pcm");
        assert_eq!(extension_for("image/PNG"), "png");
    }

    #[test]
    fn test_unknown_types_fall_back() {
        assert_eq!(MediaType::from_content_type("application/json"), MediaType::Other);
        assert_eq!(extension_for("application/json"), "bin");
    }
}
