use serde::Deserialize;

#[derive(Deserialize)]
pub struct SubmitReviewRequest {
    pub reviewer_id: String,
    pub booking_id: i64,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchReviewRequest {
    pub reviewee_id: String,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}
