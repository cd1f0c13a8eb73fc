//! Core types for the Tox event dispatcher
//!
//! This module defines the typed domain values that listeners receive. Every
//! raw wire field is translated into one of these before a capability is
//! invoked, so listener code never sees protobuf integers or enumerators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Size of a Tox public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Errors that can occur while decoding and dispatching a batch
///
/// Decoding failures are fatal for the dispatch pass that produced them: the
/// native layer broke its contract, and the batch is never replaced by a
/// default.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Malformed event batch: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Unrecognized {kind} enumerator: {value}")]
    UnknownEnumerator { kind: &'static str, value: i32 },

    #[error("Invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Frame buffer for {plane} plane too small: need {required} bytes, have {available}")]
    FrameBufferTooSmall {
        plane: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Session is closed")]
    SessionClosed,
}

macro_rules! number_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw numeric value
            pub fn value(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

number_type!(
    /// Index of a friend in the native friend list
    FriendNumber
);
number_type!(
    /// Per-friend file transfer number
    FileNumber
);
number_type!(
    /// Audio or video bit rate in kbit/s
    BitRate
);
number_type!(
    /// Number of interleaved audio channels
    AudioChannels
);
number_type!(
    /// Audio sampling rate in Hz
    SamplingRate
);
number_type!(
    /// Video frame width in pixels
    Width
);
number_type!(
    /// Video frame height in pixels
    Height
);
number_type!(
    /// Kind of an incoming file transfer
    ///
    /// Kinds other than [`FileKind::DATA`] and [`FileKind::AVATAR`] are legal
    /// and passed through untouched.
    FileKind
);

impl FileKind {
    /// Arbitrary file data
    pub const DATA: FileKind = FileKind(0);
    /// Avatar image of the sending friend
    pub const AVATAR: FileKind = FileKind(1);
}

macro_rules! bytes_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Wrap raw bytes without validation
            pub fn new(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn into_bytes(self) -> Vec<u8> {
                self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", String::from_utf8_lossy(&self.0))
            }
        }
    };
}

bytes_type!(
    /// Friend display name
    Nickname
);
bytes_type!(
    /// Friend status message
    StatusMessage
);
bytes_type!(
    /// Message attached to an incoming friend request
    FriendRequestMessage
);
bytes_type!(
    /// Text of a friend message
    FriendMessage
);
bytes_type!(
    /// Name of an incoming file
    FileName
);
bytes_type!(
    /// Custom lossy packet payload
    LossyPacket
);
bytes_type!(
    /// Custom lossless packet payload
    LosslessPacket
);

/// Long-term public key of a peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }
}

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = DispatchError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let key: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| DispatchError::InvalidLength {
                what: "public key",
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(key))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Network connection status of ourselves or a friend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connection {
    /// Not connected
    None,
    /// Connected through a TCP relay
    Tcp,
    /// Direct UDP connection
    Udp,
}

/// Presence status a friend advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    None,
    Away,
    Busy,
}

/// Kind of a friend message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Plain text message
    Normal,
    /// Action message (e.g. "/me waves")
    Action,
}

/// File transfer control command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileControl {
    Resume,
    Pause,
    Cancel,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::None => write!(f, "none"),
            Connection::Tcp => write!(f, "tcp"),
            Connection::Udp => write!(f, "udp"),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::None => write!(f, "none"),
            UserStatus::Away => write!(f, "away"),
            UserStatus::Busy => write!(f, "busy"),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Normal => write!(f, "normal"),
            MessageType::Action => write!(f, "action"),
        }
    }
}

impl fmt::Display for FileControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileControl::Resume => write!(f, "resume"),
            FileControl::Pause => write!(f, "pause"),
            FileControl::Cancel => write!(f, "cancel"),
        }
    }
}

/// Three plane buffers (Y, U, V) of a YUV420 video frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameBuffers {
    pub y: Vec<u8>,
    pub u: Vec<u8>,
    pub v: Vec<u8>,
}

impl FrameBuffers {
    pub fn new(y: Vec<u8>, u: Vec<u8>, v: Vec<u8>) -> Self {
        Self { y, u, v }
    }

    /// Allocate zeroed planes large enough for a frame with the given
    /// dimensions and strides
    ///
    /// A plane row spans the larger of the pixel width and the stride
    /// magnitude (negative strides describe bottom-up frames). Chroma planes
    /// have half the width and half the rows of the luma plane.
    pub fn for_frame(
        width: Width,
        height: Height,
        y_stride: i32,
        u_stride: i32,
        v_stride: i32,
    ) -> Self {
        let rows = height.0 as usize;
        let luma_row = width.0 as usize;
        let chroma_row = luma_row / 2;
        Self {
            y: zeroed_plane(luma_row, y_stride, rows),
            u: zeroed_plane(chroma_row, u_stride, rows / 2),
            v: zeroed_plane(chroma_row, v_stride, rows / 2),
        }
    }
}

fn zeroed_plane(row: usize, stride: i32, rows: usize) -> Vec<u8> {
    vec![0; row.max(stride.unsigned_abs() as usize) * rows]
}

/// A received video frame, ready to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: Width,
    pub height: Height,
    pub planes: FrameBuffers,
    pub y_stride: i32,
    pub u_stride: i32,
    pub v_stride: i32,
}

impl VideoFrame {
    /// Give the plane buffers back, e.g. to return them to a frame cache
    pub fn into_buffers(self) -> FrameBuffers {
        self.planes
    }
}
