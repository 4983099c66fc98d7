use std::path::Path;

use serde::{Deserialize, Serialize};

/// Media attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    /// A compressed photo.
    Photo,
    /// Any file sent as a document (stickers, voice notes and videos included).
    Document {
        /// MIME type reported by the sender.
        mime_type: String,
        /// Original file name, if the sender supplied one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
    },
    /// Media the front-end does not know how to classify (polls, locations, dice).
    Other,
}

/// Display category of a media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Image,
    Sticker,
    Gif,
    Video,
    Voice,
    Audio,
    Document,
    Other,
}

impl MediaCategory {
    /// Sub-directory of the download folder for this category.
    pub fn dir_name(self) -> &'static str {
        match self {
            MediaCategory::Image => "img",
            MediaCategory::Sticker => "sticker",
            MediaCategory::Gif => "gif",
            MediaCategory::Video => "video",
            MediaCategory::Voice => "voice",
            MediaCategory::Audio => "audio",
            MediaCategory::Document => "document",
            MediaCategory::Other => "media",
        }
    }

    /// Short label shown in message lines.
    pub fn label(self) -> &'static str {
        match self {
            MediaCategory::Image => "IMG",
            MediaCategory::Sticker => "STK",
            MediaCategory::Gif => "GIF",
            MediaCategory::Video => "VID",
            MediaCategory::Voice => "VCE",
            MediaCategory::Audio => "AUD",
            MediaCategory::Document => "DOC",
            MediaCategory::Other => "MEDIA",
        }
    }
}

impl Media {
    /// Creates a document attachment.
    pub fn document(mime_type: impl Into<String>, file_name: Option<String>) -> Self {
        Media::Document {
            mime_type: mime_type.into(),
            file_name,
        }
    }

    /// Guesses the attachment for a local file from its extension.
    pub fn for_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let mime_type = match ext.as_str() {
            "jpg" | "jpeg" | "png" => return Media::Photo,
            "webp" => "image/webp",
            "tgs" => "application/x-tgsticker",
            "gif" => "image/gif",
            "mp4" => "video/mp4",
            "ogg" => "audio/ogg",
            "mp3" => "audio/mpeg",
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        };
        Media::document(mime_type, file_name)
    }

    /// Classifies the attachment and picks the file extension used on download.
    pub fn classify(&self) -> (MediaCategory, String) {
        match self {
            Media::Photo => (MediaCategory::Image, ".jpg".to_string()),
            Media::Document {
                mime_type,
                file_name,
            } => {
                let name = file_name.as_deref().unwrap_or("file");
                let has_ext = |exts: &[&str]| exts.iter().any(|ext| name.ends_with(ext));
                if mime_type.contains("sticker") || has_ext(&[".webp", ".tgs"]) {
                    (MediaCategory::Sticker, ".webp".to_string())
                } else if mime_type.contains("gif") || has_ext(&[".gif"]) {
                    (MediaCategory::Gif, ".gif".to_string())
                } else if mime_type.contains("video") || has_ext(&[".mp4"]) {
                    (MediaCategory::Video, ".mp4".to_string())
                } else if mime_type.contains("voice") || has_ext(&[".ogg"]) {
                    (MediaCategory::Voice, ".ogg".to_string())
                } else if mime_type.contains("audio") || has_ext(&[".mp3"]) {
                    (MediaCategory::Audio, ".mp3".to_string())
                } else {
                    let ext = Path::new(name)
                        .extension()
                        .map(|ext| format!(".{}", ext.to_string_lossy()))
                        .unwrap_or_else(|| ".bin".to_string());
                    (MediaCategory::Document, ext)
                }
            }
            Media::Other => (MediaCategory::Other, String::new()),
        }
    }

    /// Label such as `IMG.jpg` or `MEDIA`.
    pub fn label(&self) -> String {
        let (category, ext) = self.classify();
        format!("{}{}", category.label(), ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_is_image() {
        assert_eq!(
            Media::Photo.classify(),
            (MediaCategory::Image, ".jpg".to_string())
        );
        assert_eq!(Media::Photo.label(), "IMG.jpg");
    }

    #[test]
    fn documents_by_mime_and_name() {
        let sticker = Media::document("application/x-tgsticker", Some("a.tgs".to_string()));
        assert_eq!(sticker.classify().0, MediaCategory::Sticker);
        assert_eq!(sticker.classify().1, ".webp");

        let gif = Media::document("video/mp4", Some("funny.gif".to_string()));
        assert_eq!(gif.classify().0, MediaCategory::Gif);

        let video = Media::document("video/mp4", None);
        assert_eq!(video.classify().0, MediaCategory::Video);

        let voice = Media::document("audio/voice", None);
        assert_eq!(voice.classify().0, MediaCategory::Voice);

        let audio = Media::document("audio/mpeg", Some("song.mp3".to_string()));
        assert_eq!(audio.classify().0, MediaCategory::Audio);
    }

    #[test]
    fn plain_documents_keep_extension() {
        let pdf = Media::document("application/pdf", Some("report.pdf".to_string()));
        assert_eq!(
            pdf.classify(),
            (MediaCategory::Document, ".pdf".to_string())
        );
        let blob = Media::document("application/octet-stream", None);
        assert_eq!(
            blob.classify(),
            (MediaCategory::Document, ".bin".to_string())
        );
    }

    #[test]
    fn other_media_has_no_extension() {
        assert_eq!(Media::Other.label(), "MEDIA");
    }

    #[test]
    fn guesses_from_path() {
        assert_eq!(Media::for_path(Path::new("cat.PNG")), Media::Photo);
        assert_eq!(
            Media::for_path(Path::new("notes.txt")),
            Media::document("text/plain", Some("notes.txt".to_string()))
        );
    }
}
