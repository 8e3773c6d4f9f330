use crate::schema::availability_slots;
use chrono::NaiveDateTime;

/// Fixed length of one bookable unit.
pub const SLOT_MINUTES: i64 = 30;

#[derive(Queryable, Clone)]
pub struct SlotData {
    pub id: i64,
    pub provider_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub is_booked: bool,
}

#[derive(Insertable, Clone)]
#[table_name = "availability_slots"]
pub struct NewSlot {
    pub provider_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub is_booked: bool,
}
