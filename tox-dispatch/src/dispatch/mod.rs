//! Event dispatchers
//!
//! Each dispatcher decodes one batch and folds its records through a
//! listener in a fixed category order. Connection and identity categories
//! come first so that a listener knows about a friend before it sees
//! messages, files, or media from that friend.
//!
//! ## Contract
//! - No batch: the state comes back untouched and nothing is decoded
//! - Malformed batch or unknown enumerator: fatal [`DispatchError`](crate::DispatchError)
//! - Within a category, records are replayed in arrival order, one
//!   invocation each, with the state returned by one invocation passed to
//!   the next

use crate::types::Result;
use std::fmt;

pub mod av;
pub mod protocol;

/// Fold one category's records through `invoke`, left to right
fn fold_records<S, R>(
    category: impl fmt::Display,
    records: Vec<R>,
    state: S,
    mut invoke: impl FnMut(R, S) -> Result<S>,
) -> Result<S> {
    if !records.is_empty() {
        log::trace!("Dispatching {} {} record(s)", records.len(), category);
    }
    records
        .into_iter()
        .try_fold(state, |state, record| invoke(record, state))
}

/// Categories of the protocol surface, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoreCategory {
    SelfConnectionStatus,
    FriendName,
    FriendStatusMessage,
    FriendStatus,
    FriendConnectionStatus,
    FriendTyping,
    FriendReadReceipt,
    FriendRequest,
    FriendMessage,
    FileRecvControl,
    FileChunkRequest,
    FileRecv,
    FileRecvChunk,
    FriendLossyPacket,
    FriendLosslessPacket,
}

impl CoreCategory {
    /// Every category, in the order the dispatcher visits them
    pub const ALL: [CoreCategory; 15] = [
        CoreCategory::SelfConnectionStatus,
        CoreCategory::FriendName,
        CoreCategory::FriendStatusMessage,
        CoreCategory::FriendStatus,
        CoreCategory::FriendConnectionStatus,
        CoreCategory::FriendTyping,
        CoreCategory::FriendReadReceipt,
        CoreCategory::FriendRequest,
        CoreCategory::FriendMessage,
        CoreCategory::FileRecvControl,
        CoreCategory::FileChunkRequest,
        CoreCategory::FileRecv,
        CoreCategory::FileRecvChunk,
        CoreCategory::FriendLossyPacket,
        CoreCategory::FriendLosslessPacket,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoreCategory::SelfConnectionStatus => "self_connection_status",
            CoreCategory::FriendName => "friend_name",
            CoreCategory::FriendStatusMessage => "friend_status_message",
            CoreCategory::FriendStatus => "friend_status",
            CoreCategory::FriendConnectionStatus => "friend_connection_status",
            CoreCategory::FriendTyping => "friend_typing",
            CoreCategory::FriendReadReceipt => "friend_read_receipt",
            CoreCategory::FriendRequest => "friend_request",
            CoreCategory::FriendMessage => "friend_message",
            CoreCategory::FileRecvControl => "file_recv_control",
            CoreCategory::FileChunkRequest => "file_chunk_request",
            CoreCategory::FileRecv => "file_recv",
            CoreCategory::FileRecvChunk => "file_recv_chunk",
            CoreCategory::FriendLossyPacket => "friend_lossy_packet",
            CoreCategory::FriendLosslessPacket => "friend_lossless_packet",
        }
    }
}

impl fmt::Display for CoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Categories of the audio/video surface, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AvCategory {
    Call,
    CallState,
    AudioBitRate,
    VideoBitRate,
    AudioReceiveFrame,
    VideoReceiveFrame,
}

impl AvCategory {
    /// Every category, in the order the dispatcher visits them
    pub const ALL: [AvCategory; 6] = [
        AvCategory::Call,
        AvCategory::CallState,
        AvCategory::AudioBitRate,
        AvCategory::VideoBitRate,
        AvCategory::AudioReceiveFrame,
        AvCategory::VideoReceiveFrame,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AvCategory::Call => "call",
            AvCategory::CallState => "call_state",
            AvCategory::AudioBitRate => "audio_bit_rate",
            AvCategory::VideoBitRate => "video_bit_rate",
            AvCategory::AudioReceiveFrame => "audio_receive_frame",
            AvCategory::VideoReceiveFrame => "video_receive_frame",
        }
    }
}

impl fmt::Display for AvCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_declaration() {
        assert!(CoreCategory::ALL.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(AvCategory::ALL.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(CoreCategory::ALL[0].name(), "self_connection_status");
        assert_eq!(AvCategory::ALL[5].to_string(), "video_receive_frame");
    }
}
