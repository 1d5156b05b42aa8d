//! Outbound message types.
//!
//! Reply and push operations send an ordered list of messages. The
//! [`OutgoingMessages`] wrapper converts from plain strings so the common
//! case reads naturally:
//!
//! ```rust,ignore
//! bot.reply(token, "got it").await?;
//! bot.push(user_id, vec![
//!     OutgoingMessage::text("here you go"),
//!     OutgoingMessage::image(url, preview_url),
//! ]).await?;
//! ```

use serde::{Deserialize, Serialize};

/// One message to send, discriminated by the platform's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    /// Plain text.
    Text {
        /// The text body.
        text: String,
    },
    /// An image, given as publicly reachable HTTPS URLs.
    #[serde(rename_all = "camelCase")]
    Image {
        /// URL of the full-size image.
        original_content_url: String,
        /// URL of the preview thumbnail.
        preview_image_url: String,
    },
    /// A video, given as publicly reachable HTTPS URLs.
    #[serde(rename_all = "camelCase")]
    Video {
        /// URL of the video file.
        original_content_url: String,
        /// URL of the preview thumbnail.
        preview_image_url: String,
    },
    /// An audio clip.
    #[serde(rename_all = "camelCase")]
    Audio {
        /// URL of the audio file.
        original_content_url: String,
        /// Clip length in milliseconds.
        duration: i64,
    },
    /// A location pin.
    Location {
        /// Location label.
        title: String,
        /// Postal address.
        address: String,
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
    /// A sticker from a sticker package.
    #[serde(rename_all = "camelCase")]
    Sticker {
        /// Sticker package ID.
        package_id: String,
        /// Sticker ID within the package.
        sticker_id: String,
    },
}

impl OutgoingMessage {
    /// Creates a text message.
    pub fn text(text: impl Into<String>) -> Self {
        OutgoingMessage::Text { text: text.into() }
    }

    /// Creates an image message.
    pub fn image(original: impl Into<String>, preview: impl Into<String>) -> Self {
        OutgoingMessage::Image {
            original_content_url: original.into(),
            preview_image_url: preview.into(),
        }
    }

    /// Creates a video message.
    pub fn video(original: impl Into<String>, preview: impl Into<String>) -> Self {
        OutgoingMessage::Video {
            original_content_url: original.into(),
            preview_image_url: preview.into(),
        }
    }

    /// Creates an audio message.
    pub fn audio(original: impl Into<String>, duration: i64) -> Self {
        OutgoingMessage::Audio {
            original_content_url: original.into(),
            duration,
        }
    }

    /// Creates a location message.
    pub fn location(
        title: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        OutgoingMessage::Location {
            title: title.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }

    /// Creates a sticker message.
    pub fn sticker(package_id: impl Into<String>, sticker_id: impl Into<String>) -> Self {
        OutgoingMessage::Sticker {
            package_id: package_id.into(),
            sticker_id: sticker_id.into(),
        }
    }
}

/// An ordered list of messages for one send operation.
///
/// Serializes as a bare JSON array, which is the shape the messaging
/// endpoints expect for their `messages` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutgoingMessages(Vec<OutgoingMessage>);

impl OutgoingMessages {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a message.
    pub fn push(&mut self, message: OutgoingMessage) {
        self.0.push(message);
    }

    /// Returns `true` when there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns how many messages the list holds.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the messages as a slice.
    pub fn as_slice(&self) -> &[OutgoingMessage] {
        &self.0
    }

    /// Converts the list into its backing vector.
    pub fn into_inner(self) -> Vec<OutgoingMessage> {
        self.0
    }
}

impl From<OutgoingMessage> for OutgoingMessages {
    fn from(message: OutgoingMessage) -> Self {
        Self(vec![message])
    }
}

impl From<Vec<OutgoingMessage>> for OutgoingMessages {
    fn from(messages: Vec<OutgoingMessage>) -> Self {
        Self(messages)
    }
}

impl From<&str> for OutgoingMessages {
    fn from(text: &str) -> Self {
        OutgoingMessage::text(text).into()
    }
}

impl From<String> for OutgoingMessages {
    fn from(text: String) -> Self {
        OutgoingMessage::text(text).into()
    }
}

impl FromIterator<OutgoingMessage> for OutgoingMessages {
    fn from_iter<I: IntoIterator<Item = OutgoingMessage>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for OutgoingMessages {
    type Item = OutgoingMessage;
    type IntoIter = std::vec::IntoIter<OutgoingMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OutgoingMessages {
    type Item = &'a OutgoingMessage;
    type IntoIter = std::slice::Iter<'a, OutgoingMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
