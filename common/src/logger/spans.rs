use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{Span, field};

use super::TraceId;

/// Root span for one request.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id.as_str(),
        booking_id = field::Empty,
        rooms = field::Empty
    )
}

/// Record the outcome of a booking on the current span.
pub fn annotate_booking(booking_id: &uuid::Uuid, rooms: &[impl AsRef<str>]) {
    let span = Span::current();
    span.record("booking_id", field::display(booking_id));
    let joined = rooms.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
    span.record("rooms", field::display(joined));
}

/// Await `fut` and warn under target `performance` if it took longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}
