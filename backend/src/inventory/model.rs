use allocator::RoomNumber;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BookingId = Uuid;

/// A committed entry of the booking ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub room_numbers: Vec<RoomNumber>,
    pub total_travel_time: u32,
    pub created_ms: i64,
}

/// A booking that has been selected and priced but not yet committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub room_numbers: Vec<RoomNumber>,
    pub total_travel_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(Booking),
    /// `room` was no longer available; nothing was written.
    Conflict { room: RoomNumber },
}
