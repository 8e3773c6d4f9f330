use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SearchNotificationItem {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchNotificationResponse {
    pub success: bool,
    pub err: String,
    pub notifications: Vec<SearchNotificationItem>,
}

crate::impl_err_response! {
    SearchNotificationResponse,
}
