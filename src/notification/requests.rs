use serde::Deserialize;

#[derive(Deserialize)]
pub struct SearchNotificationRequest {
    pub user_id: String,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub user_id: String,
    pub notification_id: i64,
}
