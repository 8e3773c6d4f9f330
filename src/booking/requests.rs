use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub student_id: String,
    pub provider_id: String,
    pub start_time: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ApproveBookingRequest {
    pub provider_id: String,
    pub booking_id: i64,
}

#[derive(Deserialize)]
pub struct RejectBookingRequest {
    pub provider_id: String,
    pub booking_id: i64,
}

#[derive(Deserialize)]
pub struct CompletePaymentRequest {
    pub student_id: String,
    pub booking_id: i64,
}

#[derive(Deserialize)]
pub struct CancelBookingRequest {
    pub user_id: String,
    pub booking_id: i64,
}

#[derive(Deserialize)]
pub struct DeleteBookingRequest {
    pub user_id: String,
    pub booking_id: i64,
}

#[derive(Deserialize)]
pub struct SearchStudentRequest {
    pub student_id: String,
    pub status: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchProviderRequest {
    pub provider_id: String,
    pub status: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}
