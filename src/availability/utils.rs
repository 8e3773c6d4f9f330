use anyhow::{anyhow, bail, Context};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, HashSet};

use crate::models::slots::{NewSlot, SlotData, SLOT_MINUTES};

/// How far into the future a weekly schedule is materialized.
pub const GENERATION_HORIZON_DAYS: i64 = 28;

pub struct SlotSpan {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Expand a weekly recurring schedule into concrete slot rows.
///
/// The schedule maps weekday abbreviations (`Mon` .. `Sun`) to lists of
/// `HH:MM-HH:MM` ranges. Each range is stepped in 30-minute increments;
/// a unit is emitted only if it fits entirely inside the range and starts
/// strictly after `now`. Duplicate starts (overlapping ranges) collapse
/// to one slot, keeping the per-provider no-overlap invariant.
pub fn expand_weekly_template(
    provider_id: &str,
    schedule: &std::collections::HashMap<String, Vec<String>>,
    now: NaiveDateTime,
) -> anyhow::Result<Vec<NewSlot>> {
    let mut by_start = BTreeMap::new();

    for offset in 0..GENERATION_HORIZON_DAYS {
        let date = now.date() + Duration::days(offset);
        let weekday = date.format("%a").to_string();
        let ranges = match schedule.get(&weekday) {
            Some(ranges) => ranges,
            None => continue,
        };

        for range in ranges {
            let (range_start, range_end) = parse_clock_range(range)?;
            let range_end = date.and_time(range_end);
            let mut cursor = date.and_time(range_start);
            while cursor + Duration::minutes(SLOT_MINUTES) <= range_end {
                let end_time = cursor + Duration::minutes(SLOT_MINUTES);
                if cursor > now {
                    by_start.entry(cursor).or_insert_with(|| NewSlot {
                        provider_id: provider_id.to_string(),
                        start_time: cursor,
                        end_time,
                        is_booked: false,
                    });
                }
                cursor = end_time;
            }
        }
    }

    Ok(by_start.into_iter().map(|(_, slot)| slot).collect())
}

fn parse_clock_range(range: &str) -> anyhow::Result<(NaiveTime, NaiveTime)> {
    let mut parts = range.splitn(2, '-');
    let start = parts.next().unwrap_or("");
    let end = parts
        .next()
        .ok_or_else(|| anyhow!("Wrong format on range '{}'", range))?;

    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M")
        .with_context(|| format!("Wrong format on range '{}'", range))?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M")
        .with_context(|| format!("Wrong format on range '{}'", range))?;
    if start >= end {
        bail!("Invalid time interval '{}'", range);
    }
    Ok((start, end))
}

/// Every desired span must be one 30-minute unit inside `[week_start, week_end)`.
pub fn validate_week_spans(
    desired: &[SlotSpan],
    week_start: NaiveDateTime,
    week_end: NaiveDateTime,
) -> anyhow::Result<()> {
    for span in desired {
        if span.end_time - span.start_time != Duration::minutes(SLOT_MINUTES) {
            bail!("Desired slots must be exactly {} minutes", SLOT_MINUTES);
        }
        if span.start_time < week_start || span.end_time > week_end {
            bail!("Desired slot outside the requested week");
        }
    }
    Ok(())
}

/// Additive/subtractive diff of the desired open-slot set against the
/// ledger. Slots match on start time. Reserved slots are never deleted,
/// whether or not they appear in the desired set.
pub fn diff_against_desired(
    existing: &[SlotData],
    desired: &[SlotSpan],
) -> (Vec<i64>, Vec<SlotSpan>) {
    let desired_starts: HashSet<_> = desired.iter().map(|span| span.start_time).collect();
    let existing_starts: HashSet<_> = existing.iter().map(|slot| slot.start_time).collect();

    let to_delete = existing
        .iter()
        .filter(|slot| !slot.is_booked && !desired_starts.contains(&slot.start_time))
        .map(|slot| slot.id)
        .collect();

    let mut seen = HashSet::new();
    let to_insert = desired
        .iter()
        .filter(|span| !existing_starts.contains(&span.start_time) && seen.insert(span.start_time))
        .map(|span| SlotSpan {
            start_time: span.start_time,
            end_time: span.end_time,
        })
        .collect();

    (to_delete, to_insert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn schedule(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(day, ranges)| {
                (
                    day.to_string(),
                    ranges.iter().map(|r| r.to_string()).collect(),
                )
            })
            .collect()
    }

    // 2024-05-01 is a Wednesday.
    fn wednesday_morning() -> NaiveDateTime {
        NaiveDate::from_ymd(2024, 5, 1).and_hms(9, 0, 0)
    }

    fn slot(id: i64, start: NaiveDateTime, is_booked: bool) -> SlotData {
        SlotData {
            id,
            provider_id: "prov-1".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(SLOT_MINUTES),
            is_booked,
        }
    }

    #[test]
    fn monday_morning_range_yields_four_units() {
        let schedule = schedule(&[("Mon", &["10:00-12:00"])]);
        let slots = expand_weekly_template("prov-1", &schedule, wednesday_morning()).unwrap();

        // Four Mondays fall inside the 28-day horizon from Wed May 1st.
        assert_eq!(slots.len(), 16);

        let first_monday = NaiveDate::from_ymd(2024, 5, 6);
        let expected: Vec<_> = [(10, 0), (10, 30), (11, 0), (11, 30)]
            .iter()
            .map(|&(h, m)| first_monday.and_hms(h, m, 0))
            .collect();
        let actual: Vec<_> = slots.iter().take(4).map(|s| s.start_time).collect();
        assert_eq!(actual, expected);

        for slot in &slots {
            assert_eq!(slot.end_time - slot.start_time, Duration::minutes(30));
            assert!(!slot.is_booked);
        }
    }

    #[test]
    fn never_emits_at_or_before_now() {
        // Today is Wednesday; the 08:00-10:00 range is already half over.
        let schedule = schedule(&[("Wed", &["08:00-10:00"])]);
        let now = wednesday_morning();
        let slots = expand_weekly_template("prov-1", &schedule, now).unwrap();

        let today: Vec<_> = slots
            .iter()
            .filter(|s| s.start_time.date() == now.date())
            .collect();
        // 08:00, 08:30 are past; 09:00 equals now and is also skipped.
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].start_time, now.date().and_hms(9, 30, 0));
    }

    #[test]
    fn expansion_is_deterministic() {
        let schedule = schedule(&[("Mon", &["10:00-12:00"]), ("Fri", &["14:00-15:00"])]);
        let now = wednesday_morning();
        let first = expand_weekly_template("prov-1", &schedule, now).unwrap();
        let second = expand_weekly_template("prov-1", &schedule, now).unwrap();

        let starts = |batch: &[NewSlot]| batch.iter().map(|s| s.start_time).collect::<Vec<_>>();
        assert_eq!(starts(&first), starts(&second));
    }

    #[test]
    fn slots_never_overlap_even_with_overlapping_ranges() {
        let schedule = schedule(&[("Mon", &["10:00-12:00", "11:00-13:00"])]);
        let slots = expand_weekly_template("prov-1", &schedule, wednesday_morning()).unwrap();

        let mut starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
        starts.sort();
        starts.dedup();
        assert_eq!(starts.len(), slots.len());

        for pair in slots.windows(2) {
            if pair[0].start_time.date() == pair[1].start_time.date() {
                assert!(pair[0].end_time <= pair[1].start_time);
            }
        }
        // 10:00 through 12:30 on each of four Mondays.
        assert_eq!(slots.len(), 24);
    }

    #[test]
    fn empty_schedule_yields_nothing() {
        let slots =
            expand_weekly_template("prov-1", &HashMap::new(), wednesday_morning()).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn partial_trailing_unit_is_dropped() {
        // 45 minutes only fits one full unit.
        let schedule = schedule(&[("Mon", &["10:00-10:45"])]);
        let slots = expand_weekly_template("prov-1", &schedule, wednesday_morning()).unwrap();
        assert!(slots
            .iter()
            .all(|s| s.start_time.time() == NaiveTime::from_hms(10, 0, 0)));
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        for bad in ["10:00", "ten-noon", "10:00-09:00", "10:00-10:00"].iter().copied() {
            let schedule = schedule(&[("Mon", &[bad])]);
            assert!(
                expand_weekly_template("prov-1", &schedule, wednesday_morning()).is_err(),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn diff_round_trips_to_desired_set() {
        let base = NaiveDate::from_ymd(2024, 5, 6);
        let existing = vec![
            slot(1, base.and_hms(10, 0, 0), false),
            slot(2, base.and_hms(10, 30, 0), false),
        ];
        // Keep 10:30, drop 10:00, add 11:00.
        let desired = vec![
            SlotSpan {
                start_time: base.and_hms(10, 30, 0),
                end_time: base.and_hms(11, 0, 0),
            },
            SlotSpan {
                start_time: base.and_hms(11, 0, 0),
                end_time: base.and_hms(11, 30, 0),
            },
        ];

        let (to_delete, to_insert) = diff_against_desired(&existing, &desired);
        assert_eq!(to_delete, vec![1]);
        assert_eq!(to_insert.len(), 1);
        assert_eq!(to_insert[0].start_time, base.and_hms(11, 0, 0));
    }

    #[test]
    fn reserved_slots_survive_any_desired_set() {
        let base = NaiveDate::from_ymd(2024, 5, 6);
        let existing = vec![
            slot(1, base.and_hms(10, 0, 0), true),
            slot(2, base.and_hms(10, 30, 0), false),
        ];

        let (to_delete, to_insert) = diff_against_desired(&existing, &[]);
        assert_eq!(to_delete, vec![2]);
        assert!(to_insert.is_empty());
    }

    #[test]
    fn desired_duplicates_insert_once() {
        let base = NaiveDate::from_ymd(2024, 5, 6);
        let span = || SlotSpan {
            start_time: base.and_hms(11, 0, 0),
            end_time: base.and_hms(11, 30, 0),
        };

        let (to_delete, to_insert) = diff_against_desired(&[], &[span(), span()]);
        assert!(to_delete.is_empty());
        assert_eq!(to_insert.len(), 1);
    }

    #[test]
    fn week_span_validation() {
        let week_start = NaiveDate::from_ymd(2024, 5, 6).and_hms(0, 0, 0);
        let week_end = NaiveDate::from_ymd(2024, 5, 13).and_hms(0, 0, 0);

        let good = SlotSpan {
            start_time: week_start + Duration::hours(10),
            end_time: week_start + Duration::hours(10) + Duration::minutes(30),
        };
        assert!(validate_week_spans(&[good], week_start, week_end).is_ok());

        let too_long = SlotSpan {
            start_time: week_start,
            end_time: week_start + Duration::hours(1),
        };
        assert!(validate_week_spans(&[too_long], week_start, week_end).is_err());

        let outside = SlotSpan {
            start_time: week_end,
            end_time: week_end + Duration::minutes(30),
        };
        assert!(validate_week_spans(&[outside], week_start, week_end).is_err());
    }
}
