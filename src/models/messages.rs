use crate::schema::messages;
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct MessageData {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "messages"]
pub struct NewMessage {
    pub conversation_id: i64,
    pub sender_id: String,
    pub body: String,
    pub is_read: bool,
}
