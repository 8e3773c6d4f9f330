use anyhow::bail;
use chrono::NaiveDateTime;

use crate::models::slots::{SlotData, SLOT_MINUTES};

pub fn required_units(duration_minutes: i64) -> anyhow::Result<i64> {
    if duration_minutes <= 0 || duration_minutes % SLOT_MINUTES != 0 {
        bail!(
            "Duration must be a positive multiple of {} minutes",
            SLOT_MINUTES
        );
    }
    Ok(duration_minutes / SLOT_MINUTES)
}

/// Pick the run of `units` slots covering the requested start out of a
/// provider's open slot sequence (ordered by start time). Each slot must
/// begin exactly where the previous one ends. A missing first slot, a gap
/// and running off the end of the sequence are all the same answer.
pub fn select_contiguous(
    slots: &[SlotData],
    start: NaiveDateTime,
    units: i64,
) -> anyhow::Result<Vec<i64>> {
    let first = match slots.iter().position(|slot| slot.start_time == start) {
        Some(idx) => idx,
        None => bail!("Not enough consecutive availability"),
    };

    let mut ids = Vec::with_capacity(units as usize);
    let mut expected_start = start;
    for slot in slots.iter().skip(first).take(units as usize) {
        if slot.start_time != expected_start {
            bail!("Not enough consecutive availability");
        }
        ids.push(slot.id);
        expected_start = slot.end_time;
    }
    if (ids.len() as i64) < units {
        bail!("Not enough consecutive availability");
    }
    Ok(ids)
}

/// Session price, frozen onto the booking row at creation time.
pub fn session_price_cents(hourly_rate_cents: i64, duration_minutes: i64) -> i64 {
    hourly_rate_cents * duration_minutes / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn slot(id: i64, hour: u32, min: u32) -> SlotData {
        let start = NaiveDate::from_ymd(2024, 5, 6).and_hms(hour, min, 0);
        SlotData {
            id,
            provider_id: "prov-1".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(SLOT_MINUTES),
            is_booked: false,
        }
    }

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd(2024, 5, 6).and_hms(hour, min, 0)
    }

    #[test]
    fn unit_count_requires_multiples_of_thirty() {
        assert_eq!(required_units(30).unwrap(), 1);
        assert_eq!(required_units(60).unwrap(), 2);
        assert_eq!(required_units(90).unwrap(), 3);
        assert!(required_units(0).is_err());
        assert!(required_units(-30).is_err());
        assert!(required_units(45).is_err());
    }

    #[test]
    fn picks_adjacent_run_from_requested_start() {
        let slots = vec![slot(1, 10, 0), slot(2, 10, 30), slot(3, 11, 0), slot(4, 11, 30)];
        assert_eq!(select_contiguous(&slots, at(10, 0), 2).unwrap(), vec![1, 2]);
        assert_eq!(
            select_contiguous(&slots, at(10, 30), 3).unwrap(),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn missing_start_slot_fails() {
        let slots = vec![slot(1, 10, 0), slot(2, 10, 30)];
        assert!(select_contiguous(&slots, at(9, 0), 1).is_err());
    }

    #[test]
    fn gap_in_sequence_fails() {
        // 10:30 is taken by someone else, so it is absent from the open set.
        let slots = vec![slot(1, 10, 0), slot(3, 11, 0), slot(4, 11, 30)];
        assert!(select_contiguous(&slots, at(10, 0), 2).is_err());
        // A single unit before the gap is still fine.
        assert_eq!(select_contiguous(&slots, at(10, 0), 1).unwrap(), vec![1]);
    }

    #[test]
    fn running_off_the_end_fails() {
        let slots = vec![slot(1, 10, 0), slot(2, 10, 30)];
        assert!(select_contiguous(&slots, at(10, 30), 2).is_err());
    }

    #[test]
    fn price_scales_with_duration() {
        // $60/hr
        assert_eq!(session_price_cents(6_000, 30), 3_000);
        assert_eq!(session_price_cents(6_000, 60), 6_000);
        assert_eq!(session_price_cents(6_000, 90), 9_000);
    }
}
