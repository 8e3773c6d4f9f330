use serde::Serialize;

#[derive(Default, Serialize)]
pub struct StartConversationResponse {
    pub success: bool,
    pub err: String,
    pub conversation_id: i64,
}

#[derive(Default, Serialize)]
pub struct SearchConversationsItem {
    pub conversation_id: i64,
    pub other_id: String,
    pub other_name: String,
    pub last_message: String,
    pub last_message_at: String,
    pub unread: bool,
}

#[derive(Default, Serialize)]
pub struct SearchConversationsResponse {
    pub success: bool,
    pub err: String,
    pub conversations: Vec<SearchConversationsItem>,
}

#[derive(Default, Serialize)]
pub struct SearchMessagesItem {
    pub id: i64,
    pub sender_id: String,
    pub sender_name: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchMessagesResponse {
    pub success: bool,
    pub err: String,
    pub messages: Vec<SearchMessagesItem>,
}

#[derive(Default, Serialize)]
pub struct UnreadCountResponse {
    pub success: bool,
    pub err: String,
    pub count: i64,
}

crate::impl_err_response! {
    StartConversationResponse,
    SearchConversationsResponse,
    SearchMessagesResponse,
    UnreadCountResponse,
}
