//! Call-state flag set and its native bitmask codec
//!
//! A friend's call state is a set of six independent flags. Incoming events
//! carry the set as a list of enumerators; outgoing call-state changes are
//! pushed to the native layer as a packed integer with one bit per flag.

use crate::proto::call_state::Kind;
use crate::types::{DispatchError, Result};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Call state of a friend
    ///
    /// The empty set is a valid state: the native layer reports it between
    /// transitions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CallStateFlags: u32 {
        const ERROR = 1 << 0;
        const FINISHED = 1 << 1;
        const SENDING_AUDIO = 1 << 2;
        const SENDING_VIDEO = 1 << 3;
        const ACCEPTING_AUDIO = 1 << 4;
        const ACCEPTING_VIDEO = 1 << 5;
    }
}

impl CallStateFlags {
    /// Pack the set into the native bitmask
    pub fn encode(self) -> u32 {
        self.bits()
    }

    /// Unpack a native bitmask; bits above position 5 are ignored
    pub fn from_mask(mask: u32) -> Self {
        Self::from_bits_truncate(mask)
    }

    /// Build the set from a list of raw wire enumerators
    ///
    /// An empty list yields the empty set. Any enumerator outside the known
    /// range is a fatal decode error.
    pub fn decode(kinds: &[i32]) -> Result<Self> {
        kinds.iter().try_fold(Self::empty(), |flags, &raw| {
            let kind = Kind::try_from(raw).map_err(|_| DispatchError::UnknownEnumerator {
                kind: "CallState.Kind",
                value: raw,
            })?;
            Ok(flags | Self::from(kind))
        })
    }

    /// Wire enumerators for every flag in the set, lowest bit first
    pub fn to_kinds(self) -> Vec<i32> {
        self.iter().map(|flag| Kind::from(flag) as i32).collect()
    }
}

impl From<Kind> for CallStateFlags {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Error => CallStateFlags::ERROR,
            Kind::Finished => CallStateFlags::FINISHED,
            Kind::SendingA => CallStateFlags::SENDING_AUDIO,
            Kind::SendingV => CallStateFlags::SENDING_VIDEO,
            Kind::AcceptingA => CallStateFlags::ACCEPTING_AUDIO,
            Kind::AcceptingV => CallStateFlags::ACCEPTING_VIDEO,
        }
    }
}

// Only called with single-flag values produced by `iter()`.
impl From<CallStateFlags> for Kind {
    fn from(flag: CallStateFlags) -> Self {
        match flag.bits().trailing_zeros() {
            0 => Kind::Error,
            1 => Kind::Finished,
            2 => Kind::SendingA,
            3 => Kind::SendingV,
            4 => Kind::AcceptingA,
            _ => Kind::AcceptingV,
        }
    }
}
