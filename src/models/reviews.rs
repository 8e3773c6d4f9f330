use crate::schema::reviews;
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct ReviewData {
    pub id: i64,
    pub booking_id: i64,
    pub reviewer_id: String,
    pub reviewee_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "reviews"]
pub struct NewReview {
    pub booking_id: i64,
    pub reviewer_id: String,
    pub reviewee_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}

pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;
