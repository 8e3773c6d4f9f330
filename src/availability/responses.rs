use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SetScheduleResponse {
    pub success: bool,
    pub err: String,
    pub generated: usize,
}

#[derive(Default, Serialize)]
pub struct SyncWeekResponse {
    pub success: bool,
    pub err: String,
    pub added: usize,
    pub removed: usize,
}

#[derive(Default, Serialize)]
pub struct SearchOpenItem {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Default, Serialize)]
pub struct SearchOpenResponse {
    pub success: bool,
    pub err: String,
    pub slots: Vec<SearchOpenItem>,
}

#[derive(Default, Serialize)]
pub struct SearchRangeItem {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
    pub is_booked: bool,
}

#[derive(Default, Serialize)]
pub struct SearchRangeResponse {
    pub success: bool,
    pub err: String,
    pub slots: Vec<SearchRangeItem>,
}

crate::impl_err_response! {
    SetScheduleResponse,
    SyncWeekResponse,
    SearchOpenResponse,
    SearchRangeResponse,
}
