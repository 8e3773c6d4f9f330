use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SearchReviewItem {
    pub id: i64,
    pub booking_id: i64,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchReviewResponse {
    pub success: bool,
    pub err: String,
    pub reviews: Vec<SearchReviewItem>,
}

crate::impl_err_response! {
    SearchReviewResponse,
}
