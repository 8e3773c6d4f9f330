use serde::Deserialize;

#[derive(Deserialize)]
pub struct SendRequestRequest {
    pub requester_id: String,
    pub receiver_id: String,
}

#[derive(Deserialize)]
pub struct AcceptRequestRequest {
    pub receiver_id: String,
    pub request_id: i64,
}

#[derive(Deserialize)]
pub struct DeclineRequestRequest {
    pub receiver_id: String,
    pub request_id: i64,
}

#[derive(Deserialize)]
pub struct SearchRequestsRequest {
    pub user_id: String,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchConnectionsRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub user_id: String,
    pub other_id: String,
}
