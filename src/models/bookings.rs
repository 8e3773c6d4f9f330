use crate::schema::bookings;
use anyhow::bail;
use chrono::NaiveDateTime;

#[derive(Queryable, Clone)]
pub struct BookingData {
    pub id: i64,
    pub student_id: String,
    pub provider_id: String,
    pub status: String,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    pub price_cents: i64,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "bookings"]
pub struct NewBooking {
    pub student_id: String,
    pub provider_id: String,
    pub status: String,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    pub price_cents: i64,
    pub notes: Option<String>,
}

/// Lifecycle of a booking.
///
/// `pending_approval` -> `approved_pending_payment` -> `confirmed`, with
/// `rejected` and `cancelled` as terminals. "Completed" is never stored:
/// a confirmed booking whose scheduled end has passed reads as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    PendingApproval,
    ApprovedPendingPayment,
    Confirmed,
    Rejected,
    Cancelled,
}

pub const STATUS_LABEL_COMPLETED: &str = "completed";

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::PendingApproval => "pending_approval",
            BookingStatus::ApprovedPendingPayment => "approved_pending_payment",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let status = match s {
            "pending_approval" => BookingStatus::PendingApproval,
            "approved_pending_payment" => BookingStatus::ApprovedPendingPayment,
            "confirmed" => BookingStatus::Confirmed,
            "rejected" => BookingStatus::Rejected,
            "cancelled" => BookingStatus::Cancelled,
            _ => bail!("Unknown booking status '{}'", s),
        };
        Ok(status)
    }

    /// No further lifecycle transition is permitted (deletion aside).
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }

    pub fn can_cancel(self) -> bool {
        !self.is_terminal()
    }

    /// Only bookings that ended in a terminal non-confirmed state may be
    /// purged from history.
    pub fn can_delete(self) -> bool {
        self.is_terminal()
    }

    /// Read-time label: a confirmed booking whose end has passed is shown
    /// as completed.
    pub fn display_at(self, scheduled_end: NaiveDateTime, now: NaiveDateTime) -> &'static str {
        if self == BookingStatus::Confirmed && scheduled_end < now {
            STATUS_LABEL_COMPLETED
        } else {
            self.as_str()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            BookingStatus::PendingApproval,
            BookingStatus::ApprovedPendingPayment,
            BookingStatus::Confirmed,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
        ]
        .iter()
        {
            assert_eq!(BookingStatus::parse(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(BookingStatus::parse("completed").is_err());
        assert!(BookingStatus::parse("").is_err());
    }

    #[test]
    fn terminals_forbid_cancel_and_allow_delete() {
        assert!(BookingStatus::Rejected.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());

        assert!(!BookingStatus::Rejected.can_cancel());
        assert!(!BookingStatus::Cancelled.can_cancel());
        assert!(BookingStatus::PendingApproval.can_cancel());
        assert!(BookingStatus::ApprovedPendingPayment.can_cancel());
        assert!(BookingStatus::Confirmed.can_cancel());

        assert!(BookingStatus::Rejected.can_delete());
        assert!(BookingStatus::Cancelled.can_delete());
        assert!(!BookingStatus::PendingApproval.can_delete());
        assert!(!BookingStatus::Confirmed.can_delete());
    }

    #[test]
    fn confirmed_past_end_reads_as_completed() {
        let end = NaiveDate::from_ymd(2024, 5, 6).and_hms(11, 0, 0);
        let before = NaiveDate::from_ymd(2024, 5, 6).and_hms(10, 0, 0);
        let after = NaiveDate::from_ymd(2024, 5, 6).and_hms(12, 0, 0);

        assert_eq!(
            BookingStatus::Confirmed.display_at(end, before),
            "confirmed"
        );
        assert_eq!(
            BookingStatus::Confirmed.display_at(end, after),
            STATUS_LABEL_COMPLETED
        );
        // Only confirmed bookings complete by passage of time.
        assert_eq!(
            BookingStatus::PendingApproval.display_at(end, after),
            "pending_approval"
        );
    }
}
