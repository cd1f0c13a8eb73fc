//! Listener capability traits
//!
//! A listener implements one method per event kind. Every method receives the
//! current application state and returns the next one; the default bodies
//! return the state unchanged, so a listener only overrides the capabilities
//! it cares about.
//!
//! The state type `S` is owned by the caller and threaded through each
//! invocation in turn. Listeners never share it behind the dispatcher's back.

use crate::call_state::CallStateFlags;
use crate::types::{
    AudioChannels, BitRate, Connection, FileControl, FileKind, FileName, FileNumber,
    FrameBuffers, FriendMessage, FriendNumber, FriendRequestMessage, Height, LosslessPacket,
    LossyPacket, MessageType, Nickname, PublicKey, SamplingRate, StatusMessage, UserStatus,
    VideoFrame,
};

/// Capabilities for the primary protocol surface
#[allow(unused_variables)]
pub trait CoreEventListener<S> {
    /// Our own connection to the network changed
    fn self_connection_status(&mut self, connection_status: Connection, state: S) -> S {
        state
    }

    fn friend_name(&mut self, friend_number: FriendNumber, name: Nickname, state: S) -> S {
        state
    }

    fn friend_status_message(
        &mut self,
        friend_number: FriendNumber,
        message: StatusMessage,
        state: S,
    ) -> S {
        state
    }

    fn friend_status(&mut self, friend_number: FriendNumber, status: UserStatus, state: S) -> S {
        state
    }

    fn friend_connection_status(
        &mut self,
        friend_number: FriendNumber,
        connection_status: Connection,
        state: S,
    ) -> S {
        state
    }

    fn friend_typing(&mut self, friend_number: FriendNumber, is_typing: bool, state: S) -> S {
        state
    }

    /// A message we sent was received by the friend
    fn friend_read_receipt(&mut self, friend_number: FriendNumber, message_id: u32, state: S) -> S {
        state
    }

    /// Someone asked to be added as a friend
    ///
    /// `time_delta` is the age of the request in milliseconds.
    fn friend_request(
        &mut self,
        public_key: PublicKey,
        time_delta: i32,
        message: FriendRequestMessage,
        state: S,
    ) -> S {
        state
    }

    fn friend_message(
        &mut self,
        friend_number: FriendNumber,
        message_type: MessageType,
        time_delta: i32,
        message: FriendMessage,
        state: S,
    ) -> S {
        state
    }

    fn file_recv_control(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        control: FileControl,
        state: S,
    ) -> S {
        state
    }

    /// The friend wants the next chunk of a file we are sending
    fn file_chunk_request(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        position: u64,
        length: u32,
        state: S,
    ) -> S {
        state
    }

    /// The friend offers us a file
    fn file_recv(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        kind: FileKind,
        file_size: u64,
        filename: FileName,
        state: S,
    ) -> S {
        state
    }

    fn file_recv_chunk(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        position: u64,
        data: Vec<u8>,
        state: S,
    ) -> S {
        state
    }

    fn friend_lossy_packet(
        &mut self,
        friend_number: FriendNumber,
        data: LossyPacket,
        state: S,
    ) -> S {
        state
    }

    fn friend_lossless_packet(
        &mut self,
        friend_number: FriendNumber,
        data: LosslessPacket,
        state: S,
    ) -> S {
        state
    }
}

/// Capabilities for the audio/video surface
#[allow(unused_variables)]
pub trait AvEventListener<S> {
    /// A friend is calling us
    fn call(
        &mut self,
        friend_number: FriendNumber,
        audio_enabled: bool,
        video_enabled: bool,
        state: S,
    ) -> S {
        state
    }

    fn call_state(&mut self, friend_number: FriendNumber, call_state: CallStateFlags, state: S) -> S {
        state
    }

    fn audio_bit_rate(&mut self, friend_number: FriendNumber, audio_bit_rate: BitRate, state: S) -> S {
        state
    }

    fn video_bit_rate(&mut self, friend_number: FriendNumber, video_bit_rate: BitRate, state: S) -> S {
        state
    }

    fn audio_receive_frame(
        &mut self,
        friend_number: FriendNumber,
        pcm: Vec<i16>,
        channels: AudioChannels,
        sampling_rate: SamplingRate,
        state: S,
    ) -> S {
        state
    }

    /// A video frame arrived; its planes are always ready to read
    fn video_receive_frame(&mut self, friend_number: FriendNumber, frame: VideoFrame, state: S) -> S {
        state
    }

    /// Offer reusable plane buffers for the next video frame
    ///
    /// Returning `Some` makes the dispatcher copy the frame into these
    /// buffers instead of handing over freshly allocated ones. Each buffer
    /// must be at least as long as the corresponding wire plane.
    fn video_frame_cached_yuv(
        &mut self,
        height: Height,
        y_stride: i32,
        u_stride: i32,
        v_stride: i32,
    ) -> Option<FrameBuffers> {
        None
    }
}
