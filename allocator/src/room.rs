//! Room numbers and the fixed hotel inventory.
//!
//! A room number encodes its floor and its position on that floor:
//! floors 1-9 use one floor digit plus two position digits ("305" is floor 3,
//! position 5), floor 10 uses "10" plus two position digits ("1007").

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AllocError;

pub const MIN_FLOOR: u8 = 1;
pub const MAX_FLOOR: u8 = 10;

/// Rooms per floor on floors 1-9.
pub const ROOMS_PER_FLOOR: u16 = 10;

/// Rooms on the top floor.
pub const TOP_FLOOR_ROOMS: u16 = 7;

/// Display code of a room, e.g. "305" or "1007".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomNumber(String);

impl RoomNumber {
    pub fn new(v: impl Into<String>) -> Self {
        Self(v.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the code, used to order room numbers numerically.
    pub fn numeric(&self) -> Result<u64, AllocError> {
        self.0
            .parse::<u64>()
            .map_err(|e| AllocError::malformed(&self.0, format!("not a number: {e}")))
    }

    pub fn locate(&self) -> Result<RoomLocation, AllocError> {
        parse_room_number(&self.0)
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomNumber {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

/// Decoded position of a room. Orders by floor, then by position on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomLocation {
    pub floor: u8,
    pub position: u32,
}

/// Decode a room number into its floor and position.
///
/// A code of four or more characters starting with "10" is on floor 10 and
/// the rest is the position; otherwise the first character is the floor, so
/// "101" through "109" stay on floor 1. Positions must fit in a `u32`.
pub fn parse_room_number(raw: &str) -> Result<RoomLocation, AllocError> {
    if raw.is_empty() {
        return Err(AllocError::malformed(raw, "empty room number"));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AllocError::malformed(raw, "contains non-digit characters"));
    }

    // All bytes are ASCII digits, so splitting on a byte index is safe.
    let (floor_part, position_part) = if raw.len() >= 4 && raw.starts_with("10") {
        raw.split_at(2)
    } else {
        raw.split_at(1)
    };

    if position_part.is_empty() {
        return Err(AllocError::malformed(raw, "missing position digits"));
    }

    let floor: u8 = floor_part
        .parse()
        .map_err(|e| AllocError::malformed(raw, format!("bad floor: {e}")))?;
    if !(MIN_FLOOR..=MAX_FLOOR).contains(&floor) {
        return Err(AllocError::malformed(
            raw,
            format!("floor {floor} outside {MIN_FLOOR}..={MAX_FLOOR}"),
        ));
    }

    let position: u32 = position_part
        .parse()
        .map_err(|e| AllocError::malformed(raw, format!("bad position: {e}")))?;

    Ok(RoomLocation { floor, position })
}

/// A room of the inventory and its occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_number: RoomNumber,
    /// Stored alongside the number for floor queries; always equals the decoded floor.
    pub floor: u8,
    pub is_booked: bool,
}

impl Room {
    /// An unbooked room with the floor taken from its number.
    pub fn new(room_number: RoomNumber) -> Result<Self, AllocError> {
        let loc = room_number.locate()?;
        Ok(Self {
            room_number,
            floor: loc.floor,
            is_booked: false,
        })
    }

    /// Rebuild a room from stored fields, rejecting a floor that disagrees with the number.
    pub fn from_parts(
        room_number: RoomNumber,
        floor: u8,
        is_booked: bool,
    ) -> Result<Self, AllocError> {
        let loc = room_number.locate()?;
        if loc.floor != floor {
            return Err(AllocError::malformed(
                room_number.as_str(),
                format!("stored floor {floor} but number decodes to floor {}", loc.floor),
            ));
        }
        Ok(Self {
            room_number,
            floor,
            is_booked,
        })
    }

    pub fn location(&self) -> Result<RoomLocation, AllocError> {
        self.room_number.locate()
    }
}

/// Number of rooms on `floor` in the standard layout.
pub fn rooms_on_floor(floor: u8) -> u16 {
    match floor {
        MAX_FLOOR => TOP_FLOOR_ROOMS,
        MIN_FLOOR..MAX_FLOOR => ROOMS_PER_FLOOR,
        _ => 0,
    }
}

/// The full hotel: floors 1-9 with ten rooms each and floor 10 with seven,
/// ordered by floor then position.
pub fn standard_inventory() -> Vec<Room> {
    (MIN_FLOOR..=MAX_FLOOR)
        .flat_map(|floor| {
            (1..=rooms_on_floor(floor)).map(move |position| Room {
                room_number: RoomNumber::new(format!("{floor}{position:02}")),
                floor,
                is_booked: false,
            })
        })
        .collect()
}
