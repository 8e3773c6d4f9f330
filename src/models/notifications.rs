use crate::schema::notifications;
use chrono::NaiveDateTime;

pub const KIND_BOOKING: &str = "booking";
pub const KIND_CONNECTION: &str = "connection";
pub const KIND_MESSAGE: &str = "message";
pub const KIND_SYSTEM: &str = "system";

#[derive(Queryable)]
pub struct NotificationData {
    pub id: i64,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "notifications"]
pub struct NewNotification {
    pub user_id: String,
    pub kind: String,
    pub title: String,
}
