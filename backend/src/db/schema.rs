use allocator::standard_inventory;
use sqlx::AnyPool;

pub async fn migrate(pool: &AnyPool) -> anyhow::Result<()> {
    // Rooms
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS rooms (
  room_number TEXT PRIMARY KEY,
  floor BIGINT NOT NULL CHECK (floor BETWEEN 1 AND 10),
  is_booked BIGINT NOT NULL DEFAULT 0 CHECK (is_booked IN (0,1))
);
"#,
    )
    .execute(pool)
    .await?;

    // Booking ledger; room_numbers holds a JSON array of room numbers.
    // seq is the insertion order, since created_ms repeats within a batch.
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS bookings (
  booking_id TEXT PRIMARY KEY,
  room_numbers TEXT NOT NULL,
  total_travel_time BIGINT NOT NULL,
  created_ms BIGINT NOT NULL,
  seq BIGINT NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_rooms_available ON rooms(is_booked, floor);"#)
        .execute(pool)
        .await?;

    sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_bookings_seq ON bookings(seq);"#)
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert the fixed inventory. Existing rooms keep their occupancy.
pub async fn seed_inventory(pool: &AnyPool) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    for room in standard_inventory() {
        sqlx::query(
            r#"
INSERT INTO rooms (room_number, floor, is_booked)
VALUES ($1, $2, 0)
ON CONFLICT (room_number) DO NOTHING;
"#,
        )
        .bind(room.room_number.as_str())
        .bind(i64::from(room.floor))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(target: "inventory", "room inventory seeded");
    Ok(())
}
