use allocator::{Room, RoomNumber};
use anyhow::Result;
use async_trait::async_trait;

use crate::inventory::model::{Booking, CommitOutcome, NewBooking};

/// Storage port for room occupancy and the booking ledger.
///
/// Every write is atomic: either all of its room updates and ledger rows land,
/// or none do.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// All rooms, ordered by floor then room number.
    async fn fetch_all(&self) -> Result<Vec<Room>>;

    /// Unbooked rooms, ordered by floor then room number.
    async fn fetch_available(&self) -> Result<Vec<Room>>;

    /// Mark every room of `booking` booked and append it to the ledger.
    /// Returns `Conflict` without writing if any room is already booked.
    async fn commit_booking(&self, booking: &NewBooking) -> Result<CommitOutcome>;

    /// Mark each given room booked with its own single-room ledger entry.
    /// Rooms that are already booked are skipped. Returns the rooms occupied.
    async fn occupy(&self, rooms: &[RoomNumber]) -> Result<Vec<RoomNumber>>;

    /// The ledger, oldest first.
    async fn fetch_bookings(&self) -> Result<Vec<Booking>>;

    /// Free every room and clear the ledger.
    async fn reset(&self) -> Result<()>;
}
