//! Tox Event Dispatch Library
//!
//! Turns the opaque per-iteration event batches produced by the native Tox
//! library into a deterministic sequence of typed listener invocations over
//! an application-owned state value.
//!
//! # Architecture
//!
//! - The native layer has no event loop of its own. Each iteration it hands
//!   back a snapshot of everything that happened since the last poll.
//! - A dispatcher decodes that snapshot and replays it through a listener,
//!   category by category in a fixed order, record by record in arrival
//!   order, threading the caller's state through every invocation.
//! - A callback registry lets independent subsystems hook session lifecycle
//!   transitions with stable handles.
//!
//! The library does NOT:
//! - Implement the Tox protocol or manage calls
//! - Catch or retry faults raised by listener code
//! - Load the native library
//!
//! # Example Usage
//!
//! ```no_run
//! use tox_dispatch::{dispatch, CoreEventListener, FriendMessage, FriendNumber, MessageType};
//!
//! struct Inbox;
//!
//! impl CoreEventListener<Vec<String>> for Inbox {
//!     fn friend_message(
//!         &mut self,
//!         friend_number: FriendNumber,
//!         _message_type: MessageType,
//!         _time_delta: i32,
//!         message: FriendMessage,
//!         mut state: Vec<String>,
//!     ) -> Vec<String> {
//!         state.push(format!("{}: {}", friend_number, message));
//!         state
//!     }
//! }
//!
//! # fn native_iterate() -> Option<Vec<u8>> { None }
//! let batch: Option<Vec<u8>> = native_iterate();
//! let state = dispatch::protocol::dispatch(&mut Inbox, batch.as_deref(), Vec::new()).unwrap();
//! println!("{} new message(s)", state.len());
//! ```

// Public modules
pub mod call_state;
pub mod dispatch;
pub mod listener;
pub mod proto;
pub mod registry;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use call_state::CallStateFlags;
pub use dispatch::{AvCategory, CoreCategory};
pub use listener::{AvEventListener, CoreEventListener};
pub use registry::{CallbackId, CallbackRegistry};
pub use session::{AvSession, CallStateSink, CoreSession, EventSource};
pub use types::{
    AudioChannels, BitRate, Connection, DispatchError, FileControl, FileKind, FileName,
    FileNumber, FrameBuffers, FriendMessage, FriendNumber, FriendRequestMessage, Height,
    LosslessPacket, LossyPacket, MessageType, Nickname, PublicKey, Result, SamplingRate,
    StatusMessage, UserStatus, VideoFrame, Width, PUBLIC_KEY_SIZE,
};

// Internal modules (not exposed in public API)
mod convert;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an absent batch is the normal idle tick
        struct Idle;
        impl CoreEventListener<u8> for Idle {}

        let state = dispatch::protocol::dispatch(&mut Idle, None, 7).unwrap();
        assert_eq!(state, 7);
    }
}
