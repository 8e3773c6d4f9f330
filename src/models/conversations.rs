use crate::schema::{conversation_members, conversations};
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct ConversationData {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub last_message_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "conversations"]
pub struct NewConversation {
    pub last_message_at: NaiveDateTime,
}

#[derive(Queryable)]
pub struct ConversationMemberData {
    pub conversation_id: i64,
    pub user_id: String,
    pub last_read_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "conversation_members"]
pub struct NewConversationMember {
    pub conversation_id: i64,
    pub user_id: String,
    pub last_read_at: NaiveDateTime,
}
