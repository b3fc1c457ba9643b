use std::sync::Arc;
use std::time::Duration;

use allocator::{
    Room, RoomNumber, SelectionRule, estimate_travel_time, select_rooms_explained, validate_count,
};
use anyhow::Context;
use common::logger::{TraceId, annotate_booking, root_span, warn_if_slow};
use tracing::{Instrument, debug, info, instrument, warn};

use crate::booking::occupancy::pick_random_rooms;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::inventory::model::{Booking, CommitOutcome, NewBooking};
use crate::inventory::repository::InventoryRepository;

#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Attempts per booking before a conflict is reported; at least 1.
    pub max_attempts: usize,
    /// Per-room probability used by random occupancy.
    pub occupancy_ratio: f64,
}

impl From<&AppConfig> for BookingPolicy {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            max_attempts: cfg.max_booking_attempts,
            occupancy_ratio: cfg.random_occupancy_ratio,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub booking: Booking,
    /// Selected rooms in selection order, as they stand after the commit.
    pub rooms: Vec<Room>,
    pub rule: SelectionRule,
    pub attempts: usize,
}

/// Runs bookings against the injected storage port.
///
/// A booking is read -> select -> price -> commit. The commit is atomic in the
/// repository; when it reports a conflict the selection is thrown away and the
/// whole sequence restarts from a fresh read.
pub struct BookingService {
    repo: Arc<dyn InventoryRepository>,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(repo: Arc<dyn InventoryRepository>, policy: BookingPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn rooms(&self) -> Result<Vec<Room>, AppError> {
        Ok(self
            .repo
            .fetch_all()
            .await
            .context("failed to read rooms")?)
    }

    pub async fn available_rooms(&self) -> Result<Vec<Room>, AppError> {
        Ok(self
            .repo
            .fetch_available()
            .await
            .context("failed to read available rooms")?)
    }

    pub async fn bookings(&self) -> Result<Vec<Booking>, AppError> {
        Ok(self
            .repo
            .fetch_bookings()
            .await
            .context("failed to read bookings")?)
    }

    pub async fn book(&self, count: usize) -> Result<BookingOutcome, AppError> {
        let span = root_span("book", &TraceId::default());
        self.book_with_retry(count).instrument(span).await
    }

    async fn book_with_retry(&self, count: usize) -> Result<BookingOutcome, AppError> {
        validate_count(count)?;

        for attempt in 1..=self.policy.max_attempts {
            let available = warn_if_slow(
                "db_fetch_available",
                Duration::from_millis(100),
                self.repo.fetch_available(),
            )
            .await
            .context("failed to read available rooms")?;

            let selection = select_rooms_explained(&available, count)?;
            let room_numbers: Vec<RoomNumber> = selection
                .rooms
                .iter()
                .map(|r| r.room_number.clone())
                .collect();
            let total_travel_time = estimate_travel_time(&room_numbers)?;

            debug!(
                attempt,
                rule = ?selection.rule,
                total_travel_time,
                "selection priced"
            );

            let pending = NewBooking {
                room_numbers,
                total_travel_time,
            };

            let outcome = warn_if_slow(
                "db_commit_booking",
                Duration::from_millis(200),
                self.repo.commit_booking(&pending),
            )
            .await
            .context("failed to commit booking")?;

            match outcome {
                CommitOutcome::Committed(booking) => {
                    annotate_booking(&booking.id, &booking.room_numbers);
                    info!(
                        booking_id = %booking.id,
                        rooms = booking.room_numbers.len(),
                        total_travel_time,
                        attempt,
                        "booking committed"
                    );

                    let rooms = selection
                        .rooms
                        .into_iter()
                        .map(|mut r| {
                            r.is_booked = true;
                            r
                        })
                        .collect();

                    return Ok(BookingOutcome {
                        booking,
                        rooms,
                        rule: selection.rule,
                        attempts: attempt,
                    });
                }
                CommitOutcome::Conflict { room } => {
                    warn!(attempt, %room, "room taken by a concurrent booking; retrying");
                }
            }
        }

        Err(AppError::BookingConflict {
            attempts: self.policy.max_attempts,
        })
    }

    /// Mark a random share of the available rooms booked. Returns the rooms
    /// that were occupied.
    #[instrument(skip(self), target = "booking")]
    pub async fn randomize_occupancy(&self) -> Result<Vec<RoomNumber>, AppError> {
        let available = self
            .repo
            .fetch_available()
            .await
            .context("failed to read available rooms")?;

        let picks = {
            let mut rng = rand::thread_rng();
            pick_random_rooms(&available, self.policy.occupancy_ratio, &mut rng)
        };

        if picks.is_empty() {
            info!("random occupancy picked no rooms");
            return Ok(Vec::new());
        }

        let occupied = self
            .repo
            .occupy(&picks)
            .await
            .context("failed to write random occupancy")?;

        info!(
            picked = picks.len(),
            occupied = occupied.len(),
            "random occupancy applied"
        );
        Ok(occupied)
    }

    #[instrument(skip(self), target = "booking")]
    pub async fn reset(&self) -> Result<(), AppError> {
        self.repo.reset().await.context("failed to reset bookings")?;
        info!("all bookings reset");
        Ok(())
    }
}
