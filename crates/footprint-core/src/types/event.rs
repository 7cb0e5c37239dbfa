//! Raw usage events as delivered by the event source.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Event kinds reported by applications.
///
/// The numeric codes are the ones used on the wire; unknown codes are
/// rejected by [`EventType::from_code`]. A rescore request arrives either as
/// the user event type (32) or as the update-score code derived from it (33).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Resource was accessed, duration unknown.
    Accessed,
    Opened,
    Modified,
    Closed,
    FocussedIn,
    FocussedOut,
    /// Explicit "please rescore this resource" request.
    UserUpdateScore,
}

const USER_EVENT_TYPE: i32 = 32;
const UPDATE_SCORE: i32 = USER_EVENT_TYPE + 1;

impl EventType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Accessed),
            1 => Some(Self::Opened),
            2 => Some(Self::Modified),
            3 => Some(Self::Closed),
            4 => Some(Self::FocussedIn),
            5 => Some(Self::FocussedOut),
            USER_EVENT_TYPE | UPDATE_SCORE => Some(Self::UserUpdateScore),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Accessed => 0,
            Self::Opened => 1,
            Self::Modified => 2,
            Self::Closed => 3,
            Self::FocussedIn => 4,
            Self::FocussedOut => 5,
            Self::UserUpdateScore => USER_EVENT_TYPE,
        }
    }

    /// Whether the event changes the score of its resource.
    /// `Opened` only starts an interval whose contribution is unknown until close.
    pub fn triggers_rescore(self) -> bool {
        matches!(self, Self::Accessed | Self::Closed | Self::UserUpdateScore)
    }
}

/// One event from the external event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub application: String,
    pub window_id: u64,
    pub uri: String,
    pub event_type: EventType,
    pub timestamp: Timestamp,
}

impl RawEvent {
    pub fn new(
        application: impl Into<String>,
        window_id: u64,
        uri: impl Into<String>,
        event_type: EventType,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            application: application.into(),
            window_id,
            uri: uri.into(),
            event_type,
            timestamp,
        }
    }
}
