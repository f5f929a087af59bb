//! # Reservations
//!
//! Table reservations and the availability check run before booking or
//! rescheduling one.
//!
//! ## Interval Model
//! ```text
//! Every reservation holds its table for the half-open span [start, end):
//!
//!   14:00                16:00
//!     [═══════════════════)            existing, CONFIRMED
//!               [══════════)           15:00 + 60 min   → conflict
//!                         [══════════) 16:00 + 60 min   → free (touching)
//!
//! [s1, e1) and [s2, e2) conflict  ⇔  s1 < e2  AND  s2 < e1
//! ```
//!
//! ## Status Lifecycle
//! ```text
//!   PENDING ──► CONFIRMED ──► COMPLETED
//!      │            │
//!      ├────────────┼──► CANCELLED
//!      └────────────┴──► NO_SHOW
//! ```
//! Only PENDING and CONFIRMED reservations hold a table.
//!
//! [`is_available`] works on a snapshot it is handed. Two callers checking
//! the same slot at once can both see it free; whoever commits the booking
//! must serialize check and insert.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::{validate_name, validate_table_id};

// =============================================================================
// Reservation Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Requested, not yet confirmed with the guest.
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    /// Guests were seated and have left.
    Completed,
    NoShow,
}

impl ReservationStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::Completed | ReservationStatus::NoShow
        )
    }

    /// Whether a reservation in this state takes part in conflict checks.
    pub fn holds_table(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Pending, NoShow)
                | (Confirmed, NoShow)
        )
    }
}

// =============================================================================
// Reservation Interval
// =============================================================================

/// The half-open span `[start, end)` during which a table is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReservationInterval {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

impl ReservationInterval {
    /// Builds `[start, start + duration_minutes)`.
    ///
    /// ## Errors
    /// - `InvalidDuration` for zero or negative minutes
    /// - `TimeOutOfRange` if the end instant is not representable
    pub fn new(start: DateTime<Utc>, duration_minutes: i64) -> CoreResult<Self> {
        if duration_minutes <= 0 {
            return Err(CoreError::InvalidDuration {
                minutes: duration_minutes,
            });
        }

        let end = Duration::try_minutes(duration_minutes)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or_else(|| {
                CoreError::TimeOutOfRange(format!(
                    "{} + {} minutes",
                    start.to_rfc3339(),
                    duration_minutes
                ))
            })?;

        Ok(ReservationInterval { start, end })
    }

    /// Half-open overlap test. Symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
    #[inline]
    pub fn overlaps(&self, other: &ReservationInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

// =============================================================================
// Reservation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub table_id: String,
    pub guest_name: String,
    pub party_size: u32,
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: ReservationStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Reservation {
    /// Creates a PENDING reservation after validating its fields.
    pub fn new(
        id: impl Into<String>,
        table_id: impl Into<String>,
        guest_name: impl Into<String>,
        party_size: u32,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> CoreResult<Self> {
        let table_id = table_id.into();
        let guest_name = guest_name.into();

        validate_table_id(&table_id)?;
        validate_name("guest_name", &guest_name)?;
        if party_size == 0 {
            return Err(ValidationError::MustBePositive {
                field: "party_size".to_string(),
            }
            .into());
        }
        // Rejects non-positive or unrepresentable durations up front.
        ReservationInterval::new(start, duration_minutes)?;

        Ok(Reservation {
            id: id.into(),
            table_id,
            guest_name,
            party_size,
            start,
            duration_minutes,
            status: ReservationStatus::Pending,
            notes: None,
        })
    }

    pub fn interval(&self) -> CoreResult<ReservationInterval> {
        ReservationInterval::new(self.start, self.duration_minutes)
    }

    /// The span this reservation blocks, or `None` if it blocks nothing:
    /// released status, or a degenerate stored duration.
    pub fn blocking_interval(&self) -> Option<ReservationInterval> {
        if !self.status.holds_table() {
            return None;
        }
        self.interval().ok()
    }

    /// Moves to `next` if the lifecycle allows it.
    pub fn transition(&mut self, next: ReservationStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::transition(
                format!("reservation {}", self.id),
                self.status,
                next,
            ));
        }
        self.status = next;
        Ok(())
    }
}

// =============================================================================
// Availability Check
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available: bool,
    /// The blocking reservation with the earliest start, when not available.
    pub conflict: Option<Reservation>,
}

impl Availability {
    fn free() -> Self {
        Availability {
            available: true,
            conflict: None,
        }
    }

    fn blocked_by(reservation: &Reservation) -> Self {
        Availability {
            available: false,
            conflict: Some(reservation.clone()),
        }
    }
}

/// Checks whether `table_id` is free for `[requested_start, requested_start + duration)`.
///
/// ## Candidates
/// Reservations on the same table, other than `exclude_reservation_id` (the
/// reservation being edited), whose status still holds the table.
///
/// ## Result
/// The conflicting candidate with the earliest start (first in input order
/// on equal starts), or `available: true`.
///
/// ## Errors
/// - `InvalidDuration` for a zero or negative requested duration
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use mesa_core::reservation::{is_available, Reservation, ReservationStatus};
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 5, 1, h, 0, 0).unwrap();
/// let mut existing = Reservation::new("r1", "T1", "Okafor", 4, at(14), 120).unwrap();
/// existing.transition(ReservationStatus::Confirmed).unwrap();
///
/// let clash = is_available("T1", at(15), 60, &[existing.clone()], None).unwrap();
/// assert!(!clash.available);
///
/// let later = is_available("T1", at(16), 60, &[existing], None).unwrap();
/// assert!(later.available);
/// ```
pub fn is_available(
    table_id: &str,
    requested_start: DateTime<Utc>,
    requested_duration_minutes: i64,
    existing: &[Reservation],
    exclude_reservation_id: Option<&str>,
) -> CoreResult<Availability> {
    let requested = ReservationInterval::new(requested_start, requested_duration_minutes)?;

    let conflict = existing
        .iter()
        .filter(|r| r.table_id == table_id)
        .filter(|r| exclude_reservation_id != Some(r.id.as_str()))
        .filter(|r| {
            r.blocking_interval()
                .map_or(false, |held| held.overlaps(&requested))
        })
        .min_by_key(|r| r.start);

    Ok(match conflict {
        Some(r) => Availability::blocked_by(r),
        None => Availability::free(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, hour, minute, 0).unwrap()
    }

    fn booking(
        id: &str,
        table: &str,
        start: DateTime<Utc>,
        minutes: i64,
        status: ReservationStatus,
    ) -> Reservation {
        let mut r = Reservation::new(id, table, "Guest", 2, start, minutes).unwrap();
        r.status = status;
        r
    }

    fn confirmed_two_to_four() -> Reservation {
        booking("r1", "T", at(14, 0), 120, ReservationStatus::Confirmed)
    }

    #[test]
    fn test_overlapping_request_conflicts() {
        let existing = vec![confirmed_two_to_four()];
        let result = is_available("T", at(15, 0), 60, &existing, None).unwrap();

        assert!(!result.available);
        assert_eq!(result.conflict.unwrap().id, "r1");
    }

    #[test]
    fn test_touching_boundaries_do_not_conflict() {
        let existing = vec![confirmed_two_to_four()];

        assert!(is_available("T", at(16, 0), 60, &existing, None).unwrap().available);
        assert!(is_available("T", at(13, 0), 60, &existing, None).unwrap().available);
        assert!(!is_available("T", at(13, 0), 61, &existing, None).unwrap().available);
    }

    #[test]
    fn test_containing_and_contained_requests_conflict() {
        let existing = vec![confirmed_two_to_four()];

        assert!(!is_available("T", at(12, 0), 360, &existing, None).unwrap().available);
        assert!(!is_available("T", at(14, 30), 15, &existing, None).unwrap().available);
    }

    #[test]
    fn test_released_reservations_are_ignored() {
        for status in [
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
            ReservationStatus::NoShow,
        ] {
            let existing = vec![booking("r1", "T", at(14, 0), 120, status)];
            let result = is_available("T", at(14, 0), 120, &existing, None).unwrap();
            assert!(result.available, "{:?} should not block", status);
            assert!(result.conflict.is_none());
        }

        let pending = vec![booking("r1", "T", at(14, 0), 120, ReservationStatus::Pending)];
        assert!(!is_available("T", at(14, 0), 120, &pending, None).unwrap().available);
    }

    #[test]
    fn test_other_tables_are_ignored() {
        let existing = vec![booking("r1", "U", at(14, 0), 120, ReservationStatus::Confirmed)];
        assert!(is_available("T", at(15, 0), 60, &existing, None).unwrap().available);
    }

    #[test]
    fn test_excluded_reservation_is_ignored() {
        let existing = vec![confirmed_two_to_four()];

        // Extending the same reservation by an hour must not clash with itself.
        let result = is_available("T", at(14, 0), 180, &existing, Some("r1")).unwrap();
        assert!(result.available);

        let result = is_available("T", at(14, 0), 180, &existing, Some("other")).unwrap();
        assert!(!result.available);
    }

    #[test]
    fn test_earliest_conflict_is_reported() {
        let existing = vec![
            booking("late", "T", at(18, 0), 60, ReservationStatus::Confirmed),
            booking("early", "T", at(16, 0), 60, ReservationStatus::Pending),
            booking("mid", "T", at(17, 0), 60, ReservationStatus::Confirmed),
        ];

        let result = is_available("T", at(15, 30), 240, &existing, None).unwrap();
        assert_eq!(result.conflict.unwrap().id, "early");
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let existing = vec![
            booking("first", "T", at(16, 0), 60, ReservationStatus::Confirmed),
            booking("second", "T", at(16, 0), 90, ReservationStatus::Confirmed),
        ];

        let result = is_available("T", at(16, 0), 30, &existing, None).unwrap();
        assert_eq!(result.conflict.unwrap().id, "first");
    }

    #[test]
    fn test_non_positive_duration_is_rejected() {
        let existing = vec![confirmed_two_to_four()];

        assert_eq!(
            is_available("T", at(10, 0), 0, &existing, None),
            Err(CoreError::InvalidDuration { minutes: 0 })
        );
        assert_eq!(
            is_available("T", at(10, 0), -30, &[], None),
            Err(CoreError::InvalidDuration { minutes: -30 })
        );
        assert!(matches!(
            Reservation::new("r", "T", "Guest", 2, at(10, 0), 0),
            Err(CoreError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_degenerate_stored_reservation_never_blocks() {
        let mut broken = confirmed_two_to_four();
        broken.duration_minutes = -60;

        assert!(is_available("T", at(12, 0), 240, &[broken], None).unwrap().available);
    }

    #[test]
    fn test_empty_snapshot_is_available() {
        let result = is_available("T", at(9, 0), 90, &[], None).unwrap();
        assert_eq!(result, Availability::free());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let starts = [10, 11, 12, 13, 14];
        let lengths = [30, 60, 90, 120];

        for &s1 in &starts {
            for &l1 in &lengths {
                for &s2 in &starts {
                    for &l2 in &lengths {
                        let a = ReservationInterval::new(at(s1, 0), l1).unwrap();
                        let b = ReservationInterval::new(at(s2, 0), l2).unwrap();
                        assert_eq!(a.overlaps(&b), b.overlaps(&a));

                        // Checking through is_available agrees with the raw test
                        // in both directions.
                        let existing_a = booking("a", "T", a.start, l1, ReservationStatus::Confirmed);
                        let existing_b = booking("b", "T", b.start, l2, ReservationStatus::Confirmed);
                        let ab = !is_available("T", b.start, l2, &[existing_a], None)
                            .unwrap()
                            .available;
                        let ba = !is_available("T", a.start, l1, &[existing_b], None)
                            .unwrap()
                            .available;
                        assert_eq!(ab, ba);
                        assert_eq!(ab, a.overlaps(&b));
                    }
                }
            }
        }
    }

    #[test]
    fn test_status_transitions() {
        use ReservationStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(NoShow));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!NoShow.can_transition_to(Pending));

        for s in [Cancelled, Completed, NoShow] {
            assert!(s.is_terminal());
            assert!(!s.holds_table());
        }
    }

    #[test]
    fn test_reservation_transition_guards() {
        let mut r = booking("r1", "T", at(19, 0), 90, ReservationStatus::Pending);
        r.transition(ReservationStatus::Confirmed).unwrap();
        r.transition(ReservationStatus::Cancelled).unwrap();

        let err = r.transition(ReservationStatus::Confirmed).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));
        assert_eq!(r.status, ReservationStatus::Cancelled);
    }

    #[test]
    fn test_reservation_constructor_validation() {
        assert!(Reservation::new("r", "T 1", "Guest", 2, at(10, 0), 60).is_err());
        assert!(Reservation::new("r", "T1", "", 2, at(10, 0), 60).is_err());
        assert!(Reservation::new("r", "T1", "Guest", 0, at(10, 0), 60).is_err());

        let r = Reservation::new("r", "T1", "Guest", 2, at(10, 0), 60).unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.interval().unwrap().end, at(11, 0));
        assert_eq!(r.interval().unwrap().duration_minutes(), 60);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ReservationStatus::NoShow).unwrap();
        assert_eq!(json, "\"NO_SHOW\"");
        let parsed: ReservationStatus = serde_json::from_str("\"CONFIRMED\"").unwrap();
        assert_eq!(parsed, ReservationStatus::Confirmed);
    }
}
