//! Travel-time metric between the extreme rooms of a booking.

use tracing::{debug, instrument};

use crate::error::AllocError;
use crate::room::RoomNumber;

/// Cost units per floor crossed by elevator.
pub const FLOOR_COST: u32 = 2;

/// Travel time between the numerically lowest and highest room of a set.
///
/// Vertical cost is `FLOOR_COST` per floor crossed. Horizontal cost is the
/// position difference, counted only when both extremes are on the same floor.
/// Rooms between the two extremes do not contribute.
#[instrument(target = "allocator", skip_all, fields(rooms))]
pub fn estimate_travel_time<'a, I>(rooms: I) -> Result<u32, AllocError>
where
    I: IntoIterator<Item = &'a RoomNumber>,
{
    let rooms: Vec<&RoomNumber> = rooms.into_iter().collect();
    tracing::Span::current().record("rooms", rooms.len());

    // Zero or one room never moves, whatever its code.
    if rooms.len() <= 1 {
        return Ok(0);
    }

    let mut keyed = rooms
        .into_iter()
        .map(|r| r.numeric().map(|n| (n, r)))
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by_key(|(n, _)| *n);

    let (_, first) = keyed[0];
    let (_, last) = keyed[keyed.len() - 1];

    let a = first.locate()?;
    let b = last.locate()?;

    let vertical = u32::from(a.floor.abs_diff(b.floor)) * FLOOR_COST;
    let horizontal = if a.floor == b.floor {
        a.position.abs_diff(b.position)
    } else {
        0
    };

    debug!(%first, %last, vertical, horizontal, "travel time estimated");

    Ok(vertical + horizontal)
}
