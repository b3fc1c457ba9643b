use allocator::{Room, RoomNumber};
use rand::Rng;

/// Pick each room independently with probability `ratio`.
///
/// `ratio` must be within 0.0..=1.0; the config layer enforces this.
pub fn pick_random_rooms<R>(available: &[Room], ratio: f64, rng: &mut R) -> Vec<RoomNumber>
where
    R: Rng,
{
    available
        .iter()
        .filter(|_| rng.gen_bool(ratio))
        .map(|r| r.room_number.clone())
        .collect()
}
