//! # Reservation Book
//!
//! Table bookings with conflict checking.
//!
//! ## Booking Flow
//! ```text
//! book(request)
//!     │
//!     ├── party size within [reservations] max_party_size?
//!     ├── duration given? else default_duration_minutes
//!     │
//!     ▼  ┌──────────── reservations lock held ─────────────┐
//!        │  is_available(table, start, duration, all)      │
//!        │      conflict ──► ServiceError::Conflict        │
//!        │      free     ──► insert as PENDING             │
//!        └─────────────────────────────────────────────────┘
//! ```
//!
//! Checking and inserting under the same lock means two concurrent bookings
//! for one slot cannot both succeed inside this process.

use chrono::{DateTime, Utc};
use mesa_core::validation::validate_party_size;
use mesa_core::{is_available, Availability, CoreError, Reservation, ReservationStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ReservationSettings;
use crate::error::{ServiceError, ServiceResult};

/// What the host stand enters to book a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub table_id: String,
    pub guest_name: String,
    pub party_size: u32,
    pub start: DateTime<Utc>,
    /// Falls back to the configured default.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    pub fn new(
        table_id: impl Into<String>,
        guest_name: impl Into<String>,
        party_size: u32,
        start: DateTime<Utc>,
    ) -> Self {
        BookingRequest {
            table_id: table_id.into(),
            guest_name: guest_name.into(),
            party_size,
            start,
            duration_minutes: None,
            notes: None,
        }
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

#[derive(Debug)]
pub struct ReservationBook {
    settings: ReservationSettings,
    /// Insertion order; the availability check breaks start-time ties by it.
    reservations: Mutex<Vec<Reservation>>,
}

impl ReservationBook {
    pub fn new(settings: ReservationSettings) -> Self {
        ReservationBook {
            settings,
            reservations: Mutex::new(Vec::new()),
        }
    }

    fn duration_or_default(&self, minutes: Option<i64>) -> i64 {
        minutes.unwrap_or(self.settings.default_duration_minutes)
    }

    /// Checks a slot without booking it.
    pub async fn check(
        &self,
        table_id: &str,
        start: DateTime<Utc>,
        duration_minutes: Option<i64>,
        exclude_reservation_id: Option<&str>,
    ) -> ServiceResult<Availability> {
        let duration = self.duration_or_default(duration_minutes);
        let reservations = self.reservations.lock().await;
        let availability = is_available(table_id, start, duration, &reservations, exclude_reservation_id)?;

        debug!(
            table_id,
            %start,
            duration,
            available = availability.available,
            "Checked table availability"
        );
        Ok(availability)
    }

    /// Books a table if the slot is free. New reservations start PENDING.
    pub async fn book(&self, request: BookingRequest) -> ServiceResult<Reservation> {
        validate_party_size(request.party_size, self.settings.max_party_size)?;

        let duration = self.duration_or_default(request.duration_minutes);
        let mut reservation = Reservation::new(
            Uuid::new_v4().to_string(),
            request.table_id,
            request.guest_name,
            request.party_size,
            request.start,
            duration,
        )?;
        reservation.notes = request.notes;

        let mut reservations = self.reservations.lock().await;
        let availability = is_available(
            &reservation.table_id,
            reservation.start,
            reservation.duration_minutes,
            &reservations,
            None,
        )?;
        if let Some(conflict) = availability.conflict {
            warn!(
                table_id = %reservation.table_id,
                start = %reservation.start,
                conflict_id = %conflict.id,
                "Booking rejected: slot taken"
            );
            return Err(conflict_error(&conflict));
        }

        reservations.push(reservation.clone());
        info!(
            reservation_id = %reservation.id,
            table_id = %reservation.table_id,
            start = %reservation.start,
            party_size = reservation.party_size,
            "Reservation booked"
        );
        Ok(reservation)
    }

    /// Moves a reservation to a new time, ignoring its own current slot.
    pub async fn reschedule(
        &self,
        reservation_id: &str,
        start: DateTime<Utc>,
        duration_minutes: Option<i64>,
    ) -> ServiceResult<Reservation> {
        let mut reservations = self.reservations.lock().await;
        let idx = position(&reservations, reservation_id)?;

        let current = &reservations[idx];
        if current.status.is_terminal() {
            return Err(CoreError::transition(
                format!("reservation {}", reservation_id),
                current.status,
                format_args!("Rescheduled"),
            )
            .into());
        }

        let duration = duration_minutes.unwrap_or(current.duration_minutes);
        let mut moved = current.clone();
        moved.start = start;
        moved.duration_minutes = duration;
        // Re-validates the interval.
        moved.interval()?;

        let availability = is_available(&moved.table_id, start, duration, &reservations, Some(reservation_id))?;
        if let Some(conflict) = availability.conflict {
            warn!(reservation_id, conflict_id = %conflict.id, "Reschedule rejected: slot taken");
            return Err(conflict_error(&conflict));
        }

        reservations[idx] = moved.clone();
        info!(reservation_id, %start, duration, "Reservation rescheduled");
        Ok(moved)
    }

    /// Confirms, cancels, completes or marks a no-show.
    pub async fn transition(&self, reservation_id: &str, next: ReservationStatus) -> ServiceResult<Reservation> {
        let mut reservations = self.reservations.lock().await;
        let idx = position(&reservations, reservation_id)?;

        let reservation = &mut reservations[idx];
        let from = reservation.status;
        reservation.transition(next)?;

        info!(reservation_id, ?from, to = ?next, "Reservation status changed");
        Ok(reservation.clone())
    }

    pub async fn get(&self, reservation_id: &str) -> ServiceResult<Reservation> {
        let reservations = self.reservations.lock().await;
        let idx = position(&reservations, reservation_id)?;
        Ok(reservations[idx].clone())
    }

    /// All reservations for a table, earliest first.
    pub async fn list_for_table(&self, table_id: &str) -> Vec<Reservation> {
        let reservations = self.reservations.lock().await;
        let mut list: Vec<_> = reservations
            .iter()
            .filter(|r| r.table_id == table_id)
            .cloned()
            .collect();
        list.sort_by_key(|r| r.start);
        list
    }
}

fn position(reservations: &[Reservation], reservation_id: &str) -> ServiceResult<usize> {
    reservations
        .iter()
        .position(|r| r.id == reservation_id)
        .ok_or_else(|| ServiceError::not_found("Reservation", reservation_id))
}

fn conflict_error(conflict: &Reservation) -> ServiceError {
    ServiceError::Conflict {
        table_id: conflict.table_id.clone(),
        reservation_id: conflict.id.clone(),
        start: conflict.start.to_rfc3339(),
    }
}
