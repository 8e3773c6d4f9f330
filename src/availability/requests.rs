use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
pub struct SetScheduleRequest {
    pub provider_id: String,
    /// Weekday abbreviation ("Mon" .. "Sun") to "HH:MM-HH:MM" ranges.
    pub schedule: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
pub struct DesiredSlot {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct SyncWeekRequest {
    pub provider_id: String,
    pub week_start: String,
    pub week_end: String,
    pub desired: Vec<DesiredSlot>,
}

#[derive(Deserialize)]
pub struct SearchOpenRequest {
    pub provider_id: String,
}

#[derive(Deserialize)]
pub struct SearchRangeRequest {
    pub provider_id: String,
    pub start_time: String,
    pub end_time: String,
}
