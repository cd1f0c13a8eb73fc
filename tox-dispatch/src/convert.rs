//! Wire-to-domain conversions
//!
//! Translates raw protobuf fields into typed values. Enumerators outside
//! their declared range are fatal; nothing is dropped or defaulted here.

use crate::proto;
use crate::types::{
    Connection, DispatchError, FileControl, FrameBuffers, MessageType, Result, UserStatus,
};
use byteorder::{BigEndian, ByteOrder};

fn unknown(kind: &'static str, value: i32) -> DispatchError {
    DispatchError::UnknownEnumerator { kind, value }
}

pub(crate) fn connection(raw: i32) -> Result<Connection> {
    match proto::Connection::try_from(raw).map_err(|_| unknown("Connection", raw))? {
        proto::Connection::None => Ok(Connection::None),
        proto::Connection::Tcp => Ok(Connection::Tcp),
        proto::Connection::Udp => Ok(Connection::Udp),
    }
}

pub(crate) fn user_status(raw: i32) -> Result<UserStatus> {
    match proto::UserStatus::try_from(raw).map_err(|_| unknown("UserStatus", raw))? {
        proto::UserStatus::None => Ok(UserStatus::None),
        proto::UserStatus::Away => Ok(UserStatus::Away),
        proto::UserStatus::Busy => Ok(UserStatus::Busy),
    }
}

pub(crate) fn message_type(raw: i32) -> Result<MessageType> {
    match proto::MessageType::try_from(raw).map_err(|_| unknown("MessageType", raw))? {
        proto::MessageType::Normal => Ok(MessageType::Normal),
        proto::MessageType::Action => Ok(MessageType::Action),
    }
}

pub(crate) fn file_control(raw: i32) -> Result<FileControl> {
    match proto::FileControl::try_from(raw).map_err(|_| unknown("FileControl", raw))? {
        proto::FileControl::Resume => Ok(FileControl::Resume),
        proto::FileControl::Pause => Ok(FileControl::Pause),
        proto::FileControl::Cancel => Ok(FileControl::Cancel),
    }
}

/// Decode big-endian 16-bit PCM samples
pub(crate) fn pcm_samples(bytes: &[u8]) -> Result<Vec<i16>> {
    if bytes.len() % 2 != 0 {
        return Err(DispatchError::InvalidData(format!(
            "PCM payload of {} bytes is not a whole number of 16-bit samples",
            bytes.len()
        )));
    }

    let mut samples = vec![0i16; bytes.len() / 2];
    BigEndian::read_i16_into(bytes, &mut samples);
    Ok(samples)
}

/// Produce ready-to-read plane buffers for a video frame
///
/// With a cached triple, each source plane is copied into the start of the
/// matching buffer and the same allocations are handed back. Without one,
/// the wire buffers are moved out as fresh planes.
pub(crate) fn frame_planes(
    cached: Option<FrameBuffers>,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
) -> Result<FrameBuffers> {
    match cached {
        Some(mut buffers) => {
            copy_plane("Y", &y, &mut buffers.y)?;
            copy_plane("U", &u, &mut buffers.u)?;
            copy_plane("V", &v, &mut buffers.v)?;
            Ok(buffers)
        }
        None => Ok(FrameBuffers::new(y, u, v)),
    }
}

fn copy_plane(plane: &'static str, source: &[u8], target: &mut [u8]) -> Result<()> {
    if target.len() < source.len() {
        return Err(DispatchError::FrameBufferTooSmall {
            plane,
            required: source.len(),
            available: target.len(),
        });
    }
    target[..source.len()].copy_from_slice(source);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_conversions() {
        assert_eq!(connection(2).unwrap(), Connection::Udp);
        assert_eq!(user_status(1).unwrap(), UserStatus::Away);
        assert_eq!(message_type(1).unwrap(), MessageType::Action);
        assert_eq!(file_control(2).unwrap(), FileControl::Cancel);
    }

    #[test]
    fn test_unknown_enumerators_rejected() {
        assert!(matches!(
            connection(3),
            Err(DispatchError::UnknownEnumerator { kind: "Connection", value: 3 })
        ));
        assert!(user_status(-1).is_err());
        assert!(message_type(2).is_err());
        assert!(file_control(99).is_err());
    }

    #[test]
    fn test_pcm_is_big_endian() {
        let samples = pcm_samples(&[0x00, 0x01, 0xFF, 0xFE]).unwrap();
        assert_eq!(samples, vec![1, -2]);
    }

    #[test]
    fn test_pcm_odd_length_rejected() {
        assert!(matches!(pcm_samples(&[1, 2, 3]), Err(DispatchError::InvalidData(_))));
    }

    #[test]
    fn test_cached_planes_overwritten_in_place() {
        let cached = FrameBuffers::new(vec![9; 4], vec![9; 2], vec![9; 2]);
        let y_ptr = cached.y.as_ptr();

        let planes = frame_planes(Some(cached), vec![1, 2, 3], vec![4, 5], vec![6, 7]).unwrap();
        assert_eq!(planes.y.as_ptr(), y_ptr);
        assert_eq!(planes.y, vec![1, 2, 3, 9]);
        assert_eq!(planes.u, vec![4, 5]);
        assert_eq!(planes.v, vec![6, 7]);
    }

    #[test]
    fn test_short_cached_plane_rejected() {
        let cached = FrameBuffers::new(vec![0; 4], vec![0; 1], vec![0; 2]);
        let err = frame_planes(Some(cached), vec![1; 4], vec![1; 2], vec![1; 2]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::FrameBufferTooSmall { plane: "U", required: 2, available: 1 }
        ));
    }
}
