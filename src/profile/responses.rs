use serde::Serialize;

#[derive(Default, Serialize)]
pub struct ViewResponse {
    pub success: bool,
    pub err: String,
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub specialty: String,
    pub hourly_rate_cents: Option<i64>,
    pub bio: String,
    pub rating_count: i64,
    pub rating_avg: f64,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchItem {
    pub user_id: String,
    pub full_name: String,
    pub role: String,
    pub specialty: String,
    pub hourly_rate_cents: Option<i64>,
    pub bio: String,
}

#[derive(Default, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub err: String,
    pub profiles: Vec<SearchItem>,
}

crate::impl_err_response! {
    ViewResponse,
    SearchResponse,
}
