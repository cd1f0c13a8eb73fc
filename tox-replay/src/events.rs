//! Listener that folds every dispatched event into a [`ReplayState`]

use crate::state::ReplayState;
use tox_dispatch::{
    AudioChannels, AvCategory, AvEventListener, BitRate, CallStateFlags, Connection,
    CoreCategory, CoreEventListener, FileControl, FileKind, FileName, FileNumber, FrameBuffers,
    FriendMessage, FriendNumber, FriendRequestMessage, Height, LosslessPacket, LossyPacket,
    MessageType, Nickname, PublicKey, SamplingRate, StatusMessage, UserStatus, VideoFrame,
};

/// Records events into the threaded state
///
/// With frame reuse enabled the listener keeps the planes of the last video
/// frame and offers them back to the dispatcher for the next frame of the
/// same shape. Any other frame gets no cached buffers, so the dispatcher
/// moves the wire planes out instead.
#[derive(Debug, Default)]
pub struct ReplayListener {
    reuse_frame_buffers: bool,
    spare: Option<(FrameShape, FrameBuffers)>,
    reused: u64,
}

/// Height and strides a set of plane buffers was filled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameShape {
    height: u32,
    strides: (i32, i32, i32),
}

impl ReplayListener {
    pub fn new(reuse_frame_buffers: bool) -> Self {
        Self {
            reuse_frame_buffers,
            ..Self::default()
        }
    }

    /// Number of video frames decoded into recycled buffers
    pub fn reused_frame_buffers(&self) -> u64 {
        self.reused
    }
}

impl CoreEventListener<ReplayState> for ReplayListener {
    fn self_connection_status(&mut self, connection_status: Connection, state: ReplayState) -> ReplayState {
        state.record(CoreCategory::SelfConnectionStatus, None, || {
            format!("connection {}", connection_status)
        })
    }

    fn friend_name(&mut self, friend_number: FriendNumber, name: Nickname, state: ReplayState) -> ReplayState {
        state.record(CoreCategory::FriendName, Some(friend_number), || {
            format!("name \"{}\"", name)
        })
    }

    fn friend_status_message(
        &mut self,
        friend_number: FriendNumber,
        message: StatusMessage,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FriendStatusMessage, Some(friend_number), || {
            format!("status message \"{}\"", message)
        })
    }

    fn friend_status(&mut self, friend_number: FriendNumber, status: UserStatus, state: ReplayState) -> ReplayState {
        state.record(CoreCategory::FriendStatus, Some(friend_number), || {
            format!("status {}", status)
        })
    }

    fn friend_connection_status(
        &mut self,
        friend_number: FriendNumber,
        connection_status: Connection,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FriendConnectionStatus, Some(friend_number), || {
            format!("connection {}", connection_status)
        })
    }

    fn friend_typing(&mut self, friend_number: FriendNumber, is_typing: bool, state: ReplayState) -> ReplayState {
        state.record(CoreCategory::FriendTyping, Some(friend_number), || {
            let what = if is_typing { "typing" } else { "stopped typing" };
            what.to_string()
        })
    }

    fn friend_read_receipt(&mut self, friend_number: FriendNumber, message_id: u32, state: ReplayState) -> ReplayState {
        state.record(CoreCategory::FriendReadReceipt, Some(friend_number), || {
            format!("read message {}", message_id)
        })
    }

    fn friend_request(
        &mut self,
        public_key: PublicKey,
        time_delta: i32,
        message: FriendRequestMessage,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FriendRequest, None, || {
            format!("request from {} (+{}ms): \"{}\"", public_key, time_delta, message)
        })
    }

    fn friend_message(
        &mut self,
        friend_number: FriendNumber,
        message_type: MessageType,
        time_delta: i32,
        message: FriendMessage,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FriendMessage, Some(friend_number), || {
            format!("{} message (+{}ms): \"{}\"", message_type, time_delta, message)
        })
    }

    fn file_recv_control(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        control: FileControl,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FileRecvControl, Some(friend_number), || {
            format!("file {} {}", file_number, control)
        })
    }

    fn file_chunk_request(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        position: u64,
        length: u32,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FileChunkRequest, Some(friend_number), || {
            format!("file {} wants {} bytes at {}", file_number, length, position)
        })
    }

    fn file_recv(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        kind: FileKind,
        file_size: u64,
        filename: FileName,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FileRecv, Some(friend_number), || {
            let kind = match kind {
                FileKind::DATA => "data".to_string(),
                FileKind::AVATAR => "avatar".to_string(),
                other => format!("kind {}", other),
            };
            format!("file {} \"{}\" ({}, {} bytes)", file_number, filename, kind, file_size)
        })
    }

    fn file_recv_chunk(
        &mut self,
        friend_number: FriendNumber,
        file_number: FileNumber,
        position: u64,
        data: Vec<u8>,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FileRecvChunk, Some(friend_number), || {
            format!("file {} chunk of {} bytes at {}", file_number, data.len(), position)
        })
    }

    fn friend_lossy_packet(&mut self, friend_number: FriendNumber, data: LossyPacket, state: ReplayState) -> ReplayState {
        state.record(CoreCategory::FriendLossyPacket, Some(friend_number), || {
            format!("lossy packet of {} bytes", data.len())
        })
    }

    fn friend_lossless_packet(
        &mut self,
        friend_number: FriendNumber,
        data: LosslessPacket,
        state: ReplayState,
    ) -> ReplayState {
        state.record(CoreCategory::FriendLosslessPacket, Some(friend_number), || {
            format!("lossless packet of {} bytes", data.len())
        })
    }
}

impl AvEventListener<ReplayState> for ReplayListener {
    fn call(
        &mut self,
        friend_number: FriendNumber,
        audio_enabled: bool,
        video_enabled: bool,
        state: ReplayState,
    ) -> ReplayState {
        state.record(AvCategory::Call, Some(friend_number), || {
            format!("incoming call (audio: {}, video: {})", audio_enabled, video_enabled)
        })
    }

    fn call_state(&mut self, friend_number: FriendNumber, call_state: CallStateFlags, state: ReplayState) -> ReplayState {
        state
            .record(AvCategory::CallState, Some(friend_number), || {
                format!("call state {:?}", call_state)
            })
            .with_call_state(call_state)
    }

    fn audio_bit_rate(&mut self, friend_number: FriendNumber, audio_bit_rate: BitRate, state: ReplayState) -> ReplayState {
        state.record(AvCategory::AudioBitRate, Some(friend_number), || {
            format!("audio bit rate {} kbit/s", audio_bit_rate)
        })
    }

    fn video_bit_rate(&mut self, friend_number: FriendNumber, video_bit_rate: BitRate, state: ReplayState) -> ReplayState {
        state.record(AvCategory::VideoBitRate, Some(friend_number), || {
            format!("video bit rate {} kbit/s", video_bit_rate)
        })
    }

    fn audio_receive_frame(
        &mut self,
        friend_number: FriendNumber,
        pcm: Vec<i16>,
        channels: AudioChannels,
        sampling_rate: SamplingRate,
        state: ReplayState,
    ) -> ReplayState {
        state.record(AvCategory::AudioReceiveFrame, Some(friend_number), || {
            format!("{} samples, {} channel(s) at {} Hz", pcm.len(), channels, sampling_rate)
        })
    }

    fn video_receive_frame(&mut self, friend_number: FriendNumber, frame: VideoFrame, state: ReplayState) -> ReplayState {
        let state = state.record(AvCategory::VideoReceiveFrame, Some(friend_number), || {
            format!("{}x{} frame", frame.width, frame.height)
        });
        if self.reuse_frame_buffers {
            let shape = FrameShape {
                height: frame.height.value(),
                strides: (frame.y_stride, frame.u_stride, frame.v_stride),
            };
            self.spare = Some((shape, frame.into_buffers()));
        }
        state
    }

    fn video_frame_cached_yuv(
        &mut self,
        height: Height,
        y_stride: i32,
        u_stride: i32,
        v_stride: i32,
    ) -> Option<FrameBuffers> {
        if !self.reuse_frame_buffers {
            return None;
        }
        let shape = FrameShape {
            height: height.value(),
            strides: (y_stride, u_stride, v_stride),
        };
        match self.spare.take() {
            Some((spare_shape, buffers)) if spare_shape == shape => {
                self.reused += 1;
                Some(buffers)
            }
            _ => None,
        }
    }
}
