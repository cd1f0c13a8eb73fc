//! Wire schema of the native event batches
//!
//! The native layer hands back one protobuf payload per iteration: a
//! [`CoreEvents`] message for the protocol surface and an [`AvEvents`]
//! message for the audio/video surface. Each category is a repeated field
//! whose tag matches its dispatch position. Repeated fields concatenate when
//! a payload is merged, so the physical field order on the wire never
//! changes the dispatch order.
//!
//! These are raw wire records. Enumerations are carried as `i32` and only
//! become typed values in [`crate::convert`].

/// Network connection status enumerator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Connection {
    None = 0,
    Tcp = 1,
    Udp = 2,
}

/// User status enumerator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum UserStatus {
    None = 0,
    Away = 1,
    Busy = 2,
}

/// Message type enumerator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    Normal = 0,
    Action = 1,
}

/// File control enumerator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FileControl {
    Resume = 0,
    Pause = 1,
    Cancel = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SelfConnectionStatus {
    #[prost(enumeration = "Connection", tag = "1")]
    pub connection_status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendName {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub name: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendStatusMessage {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub message: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendStatus {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(enumeration = "UserStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendConnectionStatus {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(enumeration = "Connection", tag = "2")]
    pub connection_status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendTyping {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(bool, tag = "2")]
    pub is_typing: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendReadReceipt {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub message_id: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub public_key: Vec<u8>,
    #[prost(int32, tag = "2")]
    pub time_delta: i32,
    #[prost(bytes = "vec", tag = "3")]
    pub message: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendMessage {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(enumeration = "MessageType", tag = "2")]
    pub r#type: i32,
    #[prost(int32, tag = "3")]
    pub time_delta: i32,
    #[prost(bytes = "vec", tag = "4")]
    pub message: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileRecvControl {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub file_number: u32,
    #[prost(enumeration = "FileControl", tag = "3")]
    pub control: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileChunkRequest {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub file_number: u32,
    #[prost(uint64, tag = "3")]
    pub position: u64,
    #[prost(uint32, tag = "4")]
    pub length: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileRecv {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub file_number: u32,
    #[prost(uint32, tag = "3")]
    pub kind: u32,
    #[prost(uint64, tag = "4")]
    pub file_size: u64,
    #[prost(bytes = "vec", tag = "5")]
    pub filename: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileRecvChunk {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub file_number: u32,
    #[prost(uint64, tag = "3")]
    pub position: u64,
    #[prost(bytes = "vec", tag = "4")]
    pub data: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendLossyPacket {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendLosslessPacket {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

/// One iteration's worth of protocol events
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CoreEvents {
    #[prost(message, repeated, tag = "1")]
    pub self_connection_status: Vec<SelfConnectionStatus>,
    #[prost(message, repeated, tag = "2")]
    pub friend_name: Vec<FriendName>,
    #[prost(message, repeated, tag = "3")]
    pub friend_status_message: Vec<FriendStatusMessage>,
    #[prost(message, repeated, tag = "4")]
    pub friend_status: Vec<FriendStatus>,
    #[prost(message, repeated, tag = "5")]
    pub friend_connection_status: Vec<FriendConnectionStatus>,
    #[prost(message, repeated, tag = "6")]
    pub friend_typing: Vec<FriendTyping>,
    #[prost(message, repeated, tag = "7")]
    pub friend_read_receipt: Vec<FriendReadReceipt>,
    #[prost(message, repeated, tag = "8")]
    pub friend_request: Vec<FriendRequest>,
    #[prost(message, repeated, tag = "9")]
    pub friend_message: Vec<FriendMessage>,
    #[prost(message, repeated, tag = "10")]
    pub file_recv_control: Vec<FileRecvControl>,
    #[prost(message, repeated, tag = "11")]
    pub file_chunk_request: Vec<FileChunkRequest>,
    #[prost(message, repeated, tag = "12")]
    pub file_recv: Vec<FileRecv>,
    #[prost(message, repeated, tag = "13")]
    pub file_recv_chunk: Vec<FileRecvChunk>,
    #[prost(message, repeated, tag = "14")]
    pub friend_lossy_packet: Vec<FriendLossyPacket>,
    #[prost(message, repeated, tag = "15")]
    pub friend_lossless_packet: Vec<FriendLosslessPacket>,
}

impl CoreEvents {
    /// Total number of records across all categories
    pub fn len(&self) -> usize {
        self.self_connection_status.len()
            + self.friend_name.len()
            + self.friend_status_message.len()
            + self.friend_status.len()
            + self.friend_connection_status.len()
            + self.friend_typing.len()
            + self.friend_read_receipt.len()
            + self.friend_request.len()
            + self.friend_message.len()
            + self.file_recv_control.len()
            + self.file_chunk_request.len()
            + self.file_recv.len()
            + self.file_recv_chunk.len()
            + self.friend_lossy_packet.len()
            + self.friend_lossless_packet.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub mod call_state {
    /// Call state enumerator, one per flag bit
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Kind {
        Error = 0,
        Finished = 1,
        SendingA = 2,
        SendingV = 3,
        AcceptingA = 4,
        AcceptingV = 5,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Call {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(bool, tag = "2")]
    pub audio_enabled: bool,
    #[prost(bool, tag = "3")]
    pub video_enabled: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CallState {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(enumeration = "call_state::Kind", repeated, tag = "2")]
    pub call_state: Vec<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AudioBitRate {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub audio_bit_rate: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VideoBitRate {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub video_bit_rate: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AudioReceiveFrame {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    /// Big-endian 16-bit samples
    #[prost(bytes = "vec", tag = "2")]
    pub pcm: Vec<u8>,
    #[prost(uint32, tag = "3")]
    pub channels: u32,
    #[prost(uint32, tag = "4")]
    pub sampling_rate: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VideoReceiveFrame {
    #[prost(uint32, tag = "1")]
    pub friend_number: u32,
    #[prost(uint32, tag = "2")]
    pub width: u32,
    #[prost(uint32, tag = "3")]
    pub height: u32,
    #[prost(bytes = "vec", tag = "4")]
    pub y: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub u: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub v: Vec<u8>,
    #[prost(int32, tag = "7")]
    pub y_stride: i32,
    #[prost(int32, tag = "8")]
    pub u_stride: i32,
    #[prost(int32, tag = "9")]
    pub v_stride: i32,
}

/// One iteration's worth of audio/video events
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AvEvents {
    #[prost(message, repeated, tag = "1")]
    pub call: Vec<Call>,
    #[prost(message, repeated, tag = "2")]
    pub call_state: Vec<CallState>,
    #[prost(message, repeated, tag = "3")]
    pub audio_bit_rate: Vec<AudioBitRate>,
    #[prost(message, repeated, tag = "4")]
    pub video_bit_rate: Vec<VideoBitRate>,
    #[prost(message, repeated, tag = "5")]
    pub audio_receive_frame: Vec<AudioReceiveFrame>,
    #[prost(message, repeated, tag = "6")]
    pub video_receive_frame: Vec<VideoReceiveFrame>,
}

impl AvEvents {
    /// Total number of records across all categories
    pub fn len(&self) -> usize {
        self.call.len()
            + self.call_state.len()
            + self.audio_bit_rate.len()
            + self.video_bit_rate.len()
            + self.audio_receive_frame.len()
            + self.video_receive_frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
