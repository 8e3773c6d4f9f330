use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SearchRequestsItem {
    pub request_id: i64,
    pub requester_id: String,
    pub requester_name: String,
    pub requester_role: String,
    pub created_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchRequestsResponse {
    pub success: bool,
    pub err: String,
    pub requests: Vec<SearchRequestsItem>,
}

#[derive(Default, Serialize)]
pub struct SearchConnectionsItem {
    pub user_id: String,
    pub full_name: String,
    pub role: String,
    pub specialty: String,
    pub connected_at: String,
}

#[derive(Default, Serialize)]
pub struct SearchConnectionsResponse {
    pub success: bool,
    pub err: String,
    pub connections: Vec<SearchConnectionsItem>,
}

#[derive(Default, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub err: String,
    /// none | self | connected | outgoing_pending | incoming_pending
    pub status: String,
    /// Set for incoming_pending so the caller can accept or decline.
    pub request_id: Option<i64>,
}

crate::impl_err_response! {
    SearchRequestsResponse,
    SearchConnectionsResponse,
    StatusResponse,
}
