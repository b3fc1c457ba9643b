//! Room selection for a booking request.
//!
//! Two rules, applied in order:
//!   1. Single floor: the lowest floor that can hold the whole request wins,
//!      and its lowest-positioned rooms are taken.
//!   2. Global fallback: rooms are sorted by (floor, position) across the hotel
//!      and the first `count` are taken.
//!
//! Rule 1 always wins over rule 2, even where a cross-floor pick would have a
//! lower travel time. Rule 2 is greedy and does not search combinations, so it
//! can miss the minimum of [`estimate_travel_time`](crate::travel::estimate_travel_time).

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::error::AllocError;
use crate::room::{Room, RoomLocation};

/// Largest number of rooms a single booking may request.
pub const MAX_ROOMS_PER_BOOKING: usize = 5;

/// Which rule produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    SingleFloor { floor: u8 },
    GlobalOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub rooms: Vec<Room>,
    pub rule: SelectionRule,
}

/// Reject counts outside `1..=MAX_ROOMS_PER_BOOKING`.
pub fn validate_count(count: usize) -> Result<(), AllocError> {
    if (1..=MAX_ROOMS_PER_BOOKING).contains(&count) {
        Ok(())
    } else {
        Err(AllocError::InvalidCount { requested: count })
    }
}

/// Choose `count` rooms out of `available`, which must all be unbooked.
///
/// Pure: the input is not modified and equal inputs give equal outputs.
pub fn select_rooms(available: &[Room], count: usize) -> Result<Vec<Room>, AllocError> {
    select_rooms_explained(available, count).map(|s| s.rooms)
}

/// Same as [`select_rooms`], also reporting which rule applied.
#[instrument(target = "allocator", skip(available), fields(available = available.len()))]
pub fn select_rooms_explained(available: &[Room], count: usize) -> Result<Selection, AllocError> {
    validate_count(count)?;

    if available.len() < count {
        return Err(AllocError::InsufficientInventory {
            requested: count,
            available: available.len(),
        });
    }

    // Every room is decoded up front so a bad number fails the whole request.
    let located = available
        .iter()
        .map(|r| r.location().map(|loc| (loc, r)))
        .collect::<Result<Vec<(RoomLocation, &Room)>, _>>()?;

    let mut by_floor: BTreeMap<u8, Vec<(RoomLocation, &Room)>> = BTreeMap::new();
    for entry in &located {
        by_floor.entry(entry.1.floor).or_default().push(*entry);
    }

    for (floor, rooms) in by_floor.iter_mut() {
        if rooms.len() < count {
            continue;
        }

        rooms.sort_by_key(|(loc, _)| loc.position);
        let picked: Vec<Room> = rooms
            .iter()
            .take(count)
            .map(|(_, r)| (*r).clone())
            .collect();

        debug!(floor = *floor, "single floor has capacity");
        return Ok(Selection {
            rooms: picked,
            rule: SelectionRule::SingleFloor { floor: *floor },
        });
    }

    let mut global = located;
    global.sort_by_key(|(loc, _)| *loc);

    if global.len() < count {
        return Err(AllocError::InternalInconsistency(format!(
            "global ordering yielded {} rooms for a request of {count} that passed the inventory check",
            global.len()
        )));
    }

    debug!("no single floor has capacity; falling back to global order");
    Ok(Selection {
        rooms: global
            .into_iter()
            .take(count)
            .map(|(_, r)| r.clone())
            .collect(),
        rule: SelectionRule::GlobalOrder,
    })
}
