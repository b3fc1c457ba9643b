//! Room allocation core: room number decoding, the travel-time metric and
//! room selection. Everything here is pure and synchronous.

pub mod error;
pub mod room;
pub mod selector;
pub mod travel;

pub use error::AllocError;
pub use room::{Room, RoomLocation, RoomNumber, parse_room_number, standard_inventory};
pub use selector::{
    MAX_ROOMS_PER_BOOKING, Selection, SelectionRule, select_rooms, select_rooms_explained,
    validate_count,
};
pub use travel::estimate_travel_time;
