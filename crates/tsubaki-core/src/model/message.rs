//! Inbound message content types.
//!
//! Every message event carries a content object discriminated by its own
//! `type` field. Binary subtypes (image, video, audio, file) only carry an
//! ID here; the bytes are fetched separately through the content endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content of an inbound message, discriminated by the platform's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    /// Plain text.
    Text {
        /// Message ID.
        id: String,
        /// The text body.
        text: String,
    },
    /// An image. Fetch the bytes through the content endpoint.
    Image {
        /// Message ID.
        id: String,
    },
    /// A video. Fetch the bytes through the content endpoint.
    Video {
        /// Message ID.
        id: String,
    },
    /// An audio clip.
    Audio {
        /// Message ID.
        id: String,
        /// Clip length in milliseconds, when reported.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<i64>,
    },
    /// An uploaded file.
    #[serde(rename_all = "camelCase")]
    File {
        /// Message ID.
        id: String,
        /// Original file name.
        file_name: String,
        /// File size in bytes.
        file_size: i64,
    },
    /// A shared location.
    Location {
        /// Message ID.
        id: String,
        /// Location label, if the sender set one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Postal address, when reported.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
    /// A sticker.
    #[serde(rename_all = "camelCase")]
    Sticker {
        /// Message ID.
        id: String,
        /// Sticker package ID.
        package_id: String,
        /// Sticker ID within the package.
        sticker_id: String,
    },
}

impl MessageContent {
    /// Returns the message ID.
    pub fn id(&self) -> &str {
        match self {
            MessageContent::Text { id, .. }
            | MessageContent::Image { id }
            | MessageContent::Video { id }
            | MessageContent::Audio { id, .. }
            | MessageContent::File { id, .. }
            | MessageContent::Location { id, .. }
            | MessageContent::Sticker { id, .. } => id,
        }
    }

    /// Returns the flat subtype discriminant.
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageContent::Text { .. } => MessageKind::Text,
            MessageContent::Image { .. } => MessageKind::Image,
            MessageContent::Video { .. } => MessageKind::Video,
            MessageContent::Audio { .. } => MessageKind::Audio,
            MessageContent::File { .. } => MessageKind::File,
            MessageContent::Location { .. } => MessageKind::Location,
            MessageContent::Sticker { .. } => MessageKind::Sticker,
        }
    }

    /// Returns the text body for text messages.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Flat message subtype discriminant, used for handler classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Plain text.
    Text,
    /// Image.
    Image,
    /// Video.
    Video,
    /// Audio clip.
    Audio,
    /// Uploaded file.
    File,
    /// Shared location.
    Location,
    /// Sticker.
    Sticker,
}

impl MessageKind {
    /// Returns the platform name of this subtype.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::Audio => "audio",
            MessageKind::File => "file",
            MessageKind::Location => "location",
            MessageKind::Sticker => "sticker",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
