//! # Receipt Numbers
//!
//! Human-readable, per-device, per-day receipt numbers.
//!
//! ```text
//! 20250614-T1-0042
//! ^^^^^^^^ ^^ ^^^^
//!   date   │  sequence, restarts at 0001 every day
//!          device code (2 chars)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_device_code;

/// Highest sequence number a device can issue in one day.
pub const MAX_DAILY_RECEIPTS: u32 = 9999;

/// Daily counter for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSequence {
    device_code: String,
    date: Option<NaiveDate>,
    last: u32,
}

impl ReceiptSequence {
    pub fn new(device_code: impl Into<String>) -> CoreResult<Self> {
        let device_code = device_code.into();
        validate_device_code(&device_code)?;
        Ok(ReceiptSequence {
            device_code,
            date: None,
            last: 0,
        })
    }

    pub fn device_code(&self) -> &str {
        &self.device_code
    }

    /// Number of receipts issued on the current day.
    pub fn issued_today(&self, date: NaiveDate) -> u32 {
        if self.date == Some(date) {
            self.last
        } else {
            0
        }
    }

    /// Issues the next receipt number for `date`.
    ///
    /// The counter resets when the date moves forward. A date earlier than
    /// the current one keeps counting on the current date, so a till clock
    /// set back never reissues a number.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use mesa_core::receipt::ReceiptSequence;
    ///
    /// let mut seq = ReceiptSequence::new("T1").unwrap();
    /// let day = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    /// assert_eq!(seq.next(day).unwrap(), "20250614-T1-0001");
    /// assert_eq!(seq.next(day).unwrap(), "20250614-T1-0002");
    /// ```
    pub fn next(&mut self, date: NaiveDate) -> CoreResult<String> {
        let date = match self.date {
            Some(current) if date < current => current,
            _ => date,
        };
        let seq = self.issued_today(date) + 1;
        if seq > MAX_DAILY_RECEIPTS {
            return Err(CoreError::ReceiptSequenceExhausted {
                date: date.format("%Y-%m-%d").to_string(),
            });
        }

        self.date = Some(date);
        self.last = seq;
        Ok(format_receipt_number(date, &self.device_code, seq))
    }
}

pub fn format_receipt_number(date: NaiveDate, device_code: &str, seq: u32) -> String {
    format!("{}-{}-{:04}", date.format("%Y%m%d"), device_code, seq)
}
