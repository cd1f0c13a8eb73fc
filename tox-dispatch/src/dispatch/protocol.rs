//! Protocol event dispatch
//!
//! Decodes a [`CoreEvents`] batch and replays it through a
//! [`CoreEventListener`].

use super::{fold_records, CoreCategory};
use crate::convert;
use crate::listener::CoreEventListener;
use crate::proto::{self, CoreEvents};
use crate::types::{
    FileKind, FileName, FileNumber, FriendMessage, FriendNumber, FriendRequestMessage,
    LosslessPacket, LossyPacket, Nickname, PublicKey, Result, StatusMessage,
};
use prost::Message;

fn dispatch_self_connection_status<S, L>(
    listener: &mut L,
    records: Vec<proto::SelfConnectionStatus>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::SelfConnectionStatus, records, state, |record, state| {
        Ok(listener.self_connection_status(convert::connection(record.connection_status)?, state))
    })
}

fn dispatch_friend_name<S, L>(listener: &mut L, records: Vec<proto::FriendName>, state: S) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendName, records, state, |record, state| {
        Ok(listener.friend_name(
            FriendNumber(record.friend_number),
            Nickname::new(record.name),
            state,
        ))
    })
}

fn dispatch_friend_status_message<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendStatusMessage>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendStatusMessage, records, state, |record, state| {
        Ok(listener.friend_status_message(
            FriendNumber(record.friend_number),
            StatusMessage::new(record.message),
            state,
        ))
    })
}

fn dispatch_friend_status<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendStatus>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendStatus, records, state, |record, state| {
        Ok(listener.friend_status(
            FriendNumber(record.friend_number),
            convert::user_status(record.status)?,
            state,
        ))
    })
}

fn dispatch_friend_connection_status<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendConnectionStatus>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendConnectionStatus, records, state, |record, state| {
        Ok(listener.friend_connection_status(
            FriendNumber(record.friend_number),
            convert::connection(record.connection_status)?,
            state,
        ))
    })
}

fn dispatch_friend_typing<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendTyping>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendTyping, records, state, |record, state| {
        Ok(listener.friend_typing(FriendNumber(record.friend_number), record.is_typing, state))
    })
}

fn dispatch_friend_read_receipt<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendReadReceipt>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendReadReceipt, records, state, |record, state| {
        Ok(listener.friend_read_receipt(
            FriendNumber(record.friend_number),
            record.message_id,
            state,
        ))
    })
}

fn dispatch_friend_request<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendRequest>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendRequest, records, state, |record, state| {
        Ok(listener.friend_request(
            PublicKey::try_from(record.public_key.as_slice())?,
            record.time_delta,
            FriendRequestMessage::new(record.message),
            state,
        ))
    })
}

fn dispatch_friend_message<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendMessage>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendMessage, records, state, |record, state| {
        Ok(listener.friend_message(
            FriendNumber(record.friend_number),
            convert::message_type(record.r#type)?,
            record.time_delta,
            FriendMessage::new(record.message),
            state,
        ))
    })
}

fn dispatch_file_recv_control<S, L>(
    listener: &mut L,
    records: Vec<proto::FileRecvControl>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FileRecvControl, records, state, |record, state| {
        Ok(listener.file_recv_control(
            FriendNumber(record.friend_number),
            FileNumber(record.file_number),
            convert::file_control(record.control)?,
            state,
        ))
    })
}

fn dispatch_file_chunk_request<S, L>(
    listener: &mut L,
    records: Vec<proto::FileChunkRequest>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FileChunkRequest, records, state, |record, state| {
        Ok(listener.file_chunk_request(
            FriendNumber(record.friend_number),
            FileNumber(record.file_number),
            record.position,
            record.length,
            state,
        ))
    })
}

fn dispatch_file_recv<S, L>(listener: &mut L, records: Vec<proto::FileRecv>, state: S) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FileRecv, records, state, |record, state| {
        Ok(listener.file_recv(
            FriendNumber(record.friend_number),
            FileNumber(record.file_number),
            FileKind(record.kind),
            record.file_size,
            FileName::new(record.filename),
            state,
        ))
    })
}

fn dispatch_file_recv_chunk<S, L>(
    listener: &mut L,
    records: Vec<proto::FileRecvChunk>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FileRecvChunk, records, state, |record, state| {
        Ok(listener.file_recv_chunk(
            FriendNumber(record.friend_number),
            FileNumber(record.file_number),
            record.position,
            record.data,
            state,
        ))
    })
}

fn dispatch_friend_lossy_packet<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendLossyPacket>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendLossyPacket, records, state, |record, state| {
        Ok(listener.friend_lossy_packet(
            FriendNumber(record.friend_number),
            LossyPacket::new(record.data),
            state,
        ))
    })
}

fn dispatch_friend_lossless_packet<S, L>(
    listener: &mut L,
    records: Vec<proto::FriendLosslessPacket>,
    state: S,
) -> Result<S>
where
    L: CoreEventListener<S> + ?Sized,
{
    fold_records(CoreCategory::FriendLosslessPacket, records, state, |record, state| {
        Ok(listener.friend_lossless_packet(
            FriendNumber(record.friend_number),
            LosslessPacket::new(record.data),
            state,
        ))
    })
}

/// Replay one protocol event batch through `listener`
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
    L: CoreEventListener<S> + ?Sized,
{
    let Some(event_data) = event_data else {
        return Ok(state);
    };

    let events = CoreEvents::decode(event_data)?;
    log::debug!("Decoded protocol event batch with {} record(s)", events.len());

    let CoreEvents {
        self_connection_status,
        friend_name,
        friend_status_message,
        friend_status,
        friend_connection_status,
        friend_typing,
        friend_read_receipt,
        friend_request,
        friend_message,
        file_recv_control,
        file_chunk_request,
        file_recv,
        file_recv_chunk,
        friend_lossy_packet,
        friend_lossless_packet,
    } = events;

    let state = dispatch_self_connection_status(listener, self_connection_status, state)?;
    let state = dispatch_friend_name(listener, friend_name, state)?;
    let state = dispatch_friend_status_message(listener, friend_status_message, state)?;
    let state = dispatch_friend_status(listener, friend_status, state)?;
    let state = dispatch_friend_connection_status(listener, friend_connection_status, state)?;
    let state = dispatch_friend_typing(listener, friend_typing, state)?;
    let state = dispatch_friend_read_receipt(listener, friend_read_receipt, state)?;
    let state = dispatch_friend_request(listener, friend_request, state)?;
    let state = dispatch_friend_message(listener, friend_message, state)?;
    let state = dispatch_file_recv_control(listener, file_recv_control, state)?;
    let state = dispatch_file_chunk_request(listener, file_chunk_request, state)?;
    let state = dispatch_file_recv(listener, file_recv, state)?;
    let state = dispatch_file_recv_chunk(listener, file_recv_chunk, state)?;
    let state = dispatch_friend_lossy_packet(listener, friend_lossy_packet, state)?;
    dispatch_friend_lossless_packet(listener, friend_lossless_packet, state)
}
