//! Audio/video event dispatch
//!
//! Decodes an [`AvEvents`] batch and replays it through an
//! [`AvEventListener`]. Video frames are written into listener-owned buffers
//! when the listener offers them through
//! [`AvEventListener::video_frame_cached_yuv`].

use super::{fold_records, AvCategory};
use crate::call_state::CallStateFlags;
use crate::convert;
use crate::listener::AvEventListener;
use crate::proto::{self, AvEvents};
use crate::types::{
    AudioChannels, BitRate, FriendNumber, Height, Result, SamplingRate, VideoFrame, Width,
};
use prost::Message;

fn dispatch_call<S, L>(listener: &mut L, records: Vec<proto::Call>, state: S) -> Result<S>
where
    L: AvEventListener<S> + ?Sized,
{
    fold_records(AvCategory::Call, records, state, |record, state| {
        Ok(listener.call(
            FriendNumber(record.friend_number),
            record.audio_enabled,
            record.video_enabled,
            state,
        ))
    })
}

fn dispatch_call_state<S, L>(listener: &mut L, records: Vec<proto::CallState>, state: S) -> Result<S>
where
    L: AvEventListener<S> + ?Sized,
{
    fold_records(AvCategory::CallState, records, state, |record, state| {
        Ok(listener.call_state(
            FriendNumber(record.friend_number),
            CallStateFlags::decode(&record.call_state)?,
            state,
        ))
    })
}

fn dispatch_audio_bit_rate<S, L>(
    listener: &mut L,
    records: Vec<proto::AudioBitRate>,
    state: S,
) -> Result<S>
where
    L: AvEventListener<S> + ?Sized,
{
    fold_records(AvCategory::AudioBitRate, records, state, |record, state| {
        Ok(listener.audio_bit_rate(
            FriendNumber(record.friend_number),
            BitRate(record.audio_bit_rate),
            state,
        ))
    })
}

fn dispatch_video_bit_rate<S, L>(
    listener: &mut L,
    records: Vec<proto::VideoBitRate>,
    state: S,
) -> Result<S>
where
    L: AvEventListener<S> + ?Sized,
{
    fold_records(AvCategory::VideoBitRate, records, state, |record, state| {
        Ok(listener.video_bit_rate(
            FriendNumber(record.friend_number),
            BitRate(record.video_bit_rate),
            state,
        ))
    })
}

fn dispatch_audio_receive_frame<S, L>(
    listener: &mut L,
    records: Vec<proto::AudioReceiveFrame>,
    state: S,
) -> Result<S>
where
    L: AvEventListener<S> + ?Sized,
{
    fold_records(AvCategory::AudioReceiveFrame, records, state, |record, state| {
        Ok(listener.audio_receive_frame(
            FriendNumber(record.friend_number),
            convert::pcm_samples(&record.pcm)?,
            AudioChannels(record.channels),
            SamplingRate(record.sampling_rate),
            state,
        ))
    })
}

fn dispatch_video_receive_frame<S, L>(
    listener: &mut L,
    records: Vec<proto::VideoReceiveFrame>,
    state: S,
) -> Result<S>
where
    L: AvEventListener<S> + ?Sized,
{
    fold_records(AvCategory::VideoReceiveFrame, records, state, |record, state| {
        let height = Height(record.height);

        let cached = listener.video_frame_cached_yuv(
            height,
            record.y_stride,
            record.u_stride,
            record.v_stride,
        );
        let planes = convert::frame_planes(cached, record.y, record.u, record.v)?;

        let frame = VideoFrame {
            width: Width(record.width),
            height,
            planes,
            y_stride: record.y_stride,
            u_stride: record.u_stride,
            v_stride: record.v_stride,
        };
        Ok(listener.video_receive_frame(FriendNumber(record.friend_number), frame, state))
    })
}

/// Replay one audio/video event batch through `listener`
///
/// # Arguments
/// * `listener` - Receives one invocation per record
/// * `event_data` - Raw batch from the native layer, `None` if nothing happened
/// * `state` - Current application state
///
/// # Returns
/// * `Result<S>` - The state after the last invocation, or a fatal decode error
pub fn dispatch<S, L>(listener: &mut L, event_data: Option<&[u8]>, state: S) -> Result<S>
where
    L: AvEventListener<S> + ?Sized,
{
    let Some(event_data) = event_data else {
        return Ok(state);
    };

    let events = AvEvents::decode(event_data)?;
    log::debug!("Decoded audio/video event batch with {} record(s)", events.len());

    let AvEvents {
        call,
        call_state,
        audio_bit_rate,
        video_bit_rate,
        audio_receive_frame,
        video_receive_frame,
    } = events;

    let state = dispatch_call(listener, call, state)?;
    let state = dispatch_call_state(listener, call_state, state)?;
    let state = dispatch_audio_bit_rate(listener, audio_bit_rate, state)?;
    let state = dispatch_video_bit_rate(listener, video_bit_rate, state)?;
    let state = dispatch_audio_receive_frame(listener, audio_receive_frame, state)?;
    dispatch_video_receive_frame(listener, video_receive_frame, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::call_state::Kind;
    use crate::types::DispatchError;

    struct CallStates;

    impl AvEventListener<Vec<CallStateFlags>> for CallStates {
        fn call_state(
            &mut self,
            _friend_number: FriendNumber,
            call_state: CallStateFlags,
            mut state: Vec<CallStateFlags>,
        ) -> Vec<CallStateFlags> {
            state.push(call_state);
            state
        }
    }

    fn call_state_batch(kinds: Vec<i32>) -> Vec<u8> {
        AvEvents {
            call_state: vec![proto::CallState { friend_number: 0, call_state: kinds }],
            ..Default::default()
        }
        .encode_to_vec()
    }

    #[test]
    fn test_call_state_flags_translated() {
        let bytes = call_state_batch(vec![Kind::SendingA as i32, Kind::AcceptingV as i32]);
        let state = dispatch(&mut CallStates, Some(bytes.as_slice()), Vec::new()).unwrap();
        assert_eq!(
            state,
            vec![CallStateFlags::SENDING_AUDIO | CallStateFlags::ACCEPTING_VIDEO]
        );
    }

    // An empty enumerator list is dispatched as the empty flag set rather
    // than rejected.
    #[test]
    fn test_empty_call_state_is_valid() {
        let bytes = call_state_batch(Vec::new());
        let state = dispatch(&mut CallStates, Some(bytes.as_slice()), Vec::new()).unwrap();
        assert_eq!(state, vec![CallStateFlags::empty()]);
    }

    #[test]
    fn test_unknown_call_state_is_fatal() {
        let bytes = call_state_batch(vec![Kind::Error as i32, 12]);
        let err = dispatch(&mut CallStates, Some(bytes.as_slice()), Vec::new()).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownEnumerator { value: 12, .. }));
    }

    #[test]
    fn test_audio_frame_samples() {
        struct Audio;
        impl AvEventListener<Vec<i16>> for Audio {
            fn audio_receive_frame(
                &mut self,
                _friend_number: FriendNumber,
                pcm: Vec<i16>,
                channels: AudioChannels,
                sampling_rate: SamplingRate,
                mut state: Vec<i16>,
            ) -> Vec<i16> {
                assert_eq!(channels, AudioChannels(2));
                assert_eq!(sampling_rate, SamplingRate(48_000));
                state.extend(pcm);
                state
            }
        }

        let bytes = AvEvents {
            audio_receive_frame: vec![proto::AudioReceiveFrame {
                friend_number: 1,
                pcm: vec![0x01, 0x00, 0x80, 0x00],
                channels: 2,
                sampling_rate: 48_000,
            }],
            ..Default::default()
        }
        .encode_to_vec();

        let state = dispatch(&mut Audio, Some(bytes.as_slice()), Vec::new()).unwrap();
        assert_eq!(state, vec![256, i16::MIN]);
    }

    #[test]
    fn test_video_frame_without_cache_gets_fresh_planes() {
        struct Frames;
        impl AvEventListener<Option<VideoFrame>> for Frames {
            fn video_receive_frame(
                &mut self,
                _friend_number: FriendNumber,
                frame: VideoFrame,
                _state: Option<VideoFrame>,
            ) -> Option<VideoFrame> {
                Some(frame)
            }
        }

        let bytes = AvEvents {
            video_receive_frame: vec![proto::VideoReceiveFrame {
                friend_number: 2,
                width: 2,
                height: 2,
                y: vec![1, 2, 3, 4],
                u: vec![5],
                v: vec![6],
                y_stride: 2,
                u_stride: 1,
                v_stride: 1,
            }],
            ..Default::default()
        }
        .encode_to_vec();

        let frame = dispatch(&mut Frames, Some(bytes.as_slice()), None).unwrap().unwrap();
        assert_eq!(frame.width, Width(2));
        assert_eq!(frame.planes.y, vec![1, 2, 3, 4]);
        assert_eq!(frame.planes.u, vec![5]);
        assert_eq!(frame.planes.v, vec![6]);
        assert_eq!((frame.y_stride, frame.u_stride, frame.v_stride), (2, 1, 1));
    }
}
