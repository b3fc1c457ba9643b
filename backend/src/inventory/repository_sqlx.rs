use allocator::{Room, RoomNumber};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, AnyPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::inventory::model::{Booking, CommitOutcome, NewBooking};
use crate::inventory::repository::InventoryRepository;
use crate::time::now_ms;

/// SQLx-backed implementation of InventoryRepository.
/// Responsible only for persistence and row mapping.
pub struct SqlxInventoryRepository {
    pool: AnyPool,
}

impl SqlxInventoryRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryRepository for SqlxInventoryRepository {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Room>> {
        let rows = sqlx::query(
            r#"
SELECT room_number, floor, is_booked
FROM rooms
ORDER BY floor, room_number;
"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_room).collect()
    }

    async fn fetch_available(&self) -> anyhow::Result<Vec<Room>> {
        let rows = sqlx::query(
            r#"
SELECT room_number, floor, is_booked
FROM rooms
WHERE is_booked = 0
ORDER BY floor, room_number;
"#,
        )
        .fetch_all(&self.pool)
        .await?;

        // A bad row fails the read; skipping it would hide an inventory fault.
        rows.iter().map(row_to_room).collect()
    }

    #[instrument(skip(self), target = "inventory", fields(rooms = booking.room_numbers.len()))]
    async fn commit_booking(&self, booking: &NewBooking) -> anyhow::Result<CommitOutcome> {
        if booking.room_numbers.is_empty() {
            return Err(anyhow!("refusing to commit a booking without rooms"));
        }

        let mut tx = self.pool.begin().await?;

        for room in &booking.room_numbers {
            if !claim_room(&mut tx, room).await? {
                // Dropping the transaction rolls back rooms claimed so far.
                debug!(%room, "room already taken; rolling back");
                return Ok(CommitOutcome::Conflict { room: room.clone() });
            }
        }

        let committed = Booking {
            id: Uuid::new_v4(),
            room_numbers: booking.room_numbers.clone(),
            total_travel_time: booking.total_travel_time,
            created_ms: now_ms(),
        };
        insert_ledger_row(&mut tx, &committed).await?;

        tx.commit().await.context("commit booking transaction")?;

        Ok(CommitOutcome::Committed(committed))
    }

    #[instrument(skip(self, rooms), target = "inventory", fields(candidates = rooms.len()))]
    async fn occupy(&self, rooms: &[RoomNumber]) -> anyhow::Result<Vec<RoomNumber>> {
        let mut tx = self.pool.begin().await?;
        let created_ms = now_ms();
        let mut occupied = Vec::with_capacity(rooms.len());

        for room in rooms {
            if !claim_room(&mut tx, room).await? {
                debug!(%room, "room already booked; skipping");
                continue;
            }

            let entry = Booking {
                id: Uuid::new_v4(),
                room_numbers: vec![room.clone()],
                total_travel_time: 0,
                created_ms,
            };
            insert_ledger_row(&mut tx, &entry).await?;
            occupied.push(room.clone());
        }

        tx.commit().await.context("commit occupancy transaction")?;

        Ok(occupied)
    }

    async fn fetch_bookings(&self) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
SELECT booking_id, room_numbers, total_travel_time, created_ms
FROM bookings
ORDER BY seq, booking_id;
"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_booking).collect()
    }

    #[instrument(skip(self), target = "inventory")]
    async fn reset(&self) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE rooms SET is_booked = 0 WHERE is_booked = 1;")
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM bookings;")
            .execute(&mut *tx)
            .await?;

        tx.commit().await.context("commit reset transaction")?;

        Ok(())
    }
}

/* =========================
Transaction steps
========================= */

/// Flip one room to booked if it is still free. Returns false if it was not.
async fn claim_room(conn: &mut AnyConnection, room: &RoomNumber) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
UPDATE rooms
SET is_booked = 1
WHERE room_number = $1 AND is_booked = 0;
"#,
    )
    .bind(room.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(res.rows_affected() == 1)
}

async fn insert_ledger_row(conn: &mut AnyConnection, booking: &Booking) -> anyhow::Result<()> {
    let rooms_json = serde_json::to_string(&booking.room_numbers)?;

    sqlx::query(
        r#"
INSERT INTO bookings (booking_id, room_numbers, total_travel_time, created_ms, seq)
VALUES ($1, $2, $3, $4, (SELECT COALESCE(MAX(seq), 0) + 1 FROM bookings));
"#,
    )
    .bind(booking.id.to_string())
    .bind(rooms_json)
    .bind(i64::from(booking.total_travel_time))
    .bind(booking.created_ms)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/* =========================
Row mapping
========================= */

fn row_to_room(r: &AnyRow) -> anyhow::Result<Room> {
    let number: String = r.try_get("room_number")?;
    let floor: i64 = r.try_get("floor")?;
    let is_booked: i64 = r.try_get("is_booked")?;

    let floor = u8::try_from(floor)
        .map_err(|_| anyhow!("floor out of range for room {number}: {floor}"))?;

    Ok(Room::from_parts(RoomNumber::new(number), floor, is_booked == 1)?)
}

fn row_to_booking(r: &AnyRow) -> anyhow::Result<Booking> {
    let id_str: String = r.try_get("booking_id")?;
    let id = Uuid::parse_str(&id_str).context("invalid booking_id")?;

    let rooms_json: String = r.try_get("room_numbers")?;
    let room_numbers: Vec<RoomNumber> = serde_json::from_str(&rooms_json)
        .with_context(|| format!("invalid room_numbers JSON for booking {id}"))?;

    let travel: i64 = r.try_get("total_travel_time")?;
    let total_travel_time =
        u32::try_from(travel).map_err(|_| anyhow!("travel time out of range: {travel}"))?;

    Ok(Booking {
        id,
        room_numbers,
        total_travel_time,
        created_ms: r.try_get("created_ms")?,
    })
}
