use serde::Serialize;

#[derive(Default, Serialize)]
pub struct CreateBookingResponse {
    pub success: bool,
    pub err: String,
    pub booking_id: i64,
    pub price_cents: i64,
    pub status: String,
}

#[derive(Default, Serialize)]
pub struct SearchStudentItem {
    pub booking_id: i64,
    pub provider_id: String,
    pub provider_name: String,
    pub scheduled_start: String,
    pub scheduled_end: String,
    pub status: String,
    pub price_cents: i64,
    pub notes: String,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchStudentResponse {
    pub success: bool,
    pub err: String,
    pub bookings: Vec<SearchStudentItem>,
}

#[derive(Default, Serialize)]
pub struct SearchProviderItem {
    pub booking_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub scheduled_start: String,
    pub scheduled_end: String,
    pub status: String,
    pub price_cents: i64,
    pub notes: String,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchProviderResponse {
    pub success: bool,
    pub err: String,
    pub bookings: Vec<SearchProviderItem>,
}

crate::impl_err_response! {
    CreateBookingResponse,
    SearchStudentResponse,
    SearchProviderResponse,
}
