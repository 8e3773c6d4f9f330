use serde::Deserialize;

#[derive(Deserialize)]
pub struct StartConversationRequest {
    pub user_id: String,
    pub other_id: String,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: i64,
    pub sender_id: String,
    pub body: String,
}

#[derive(Deserialize)]
pub struct SearchConversationsRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct SearchMessagesRequest {
    pub conversation_id: i64,
    pub user_id: String,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub conversation_id: i64,
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct UnreadCountRequest {
    pub user_id: String,
}
