use crate::schema::{connection_requests, connections};
use chrono::NaiveDateTime;

pub const REQUEST_STATUS_PENDING: &str = "pending";
pub const REQUEST_STATUS_ACCEPTED: &str = "accepted";
pub const REQUEST_STATUS_DECLINED: &str = "declined";

#[derive(Queryable)]
pub struct ConnectionRequestData {
    pub id: i64,
    pub requester_id: String,
    pub receiver_id: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "connection_requests"]
pub struct NewConnectionRequest {
    pub requester_id: String,
    pub receiver_id: String,
    pub status: String,
}

#[derive(Queryable)]
pub struct ConnectionData {
    pub id: i64,
    pub user_a: String,
    pub user_b: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "connections"]
pub struct NewConnection {
    pub user_a: String,
    pub user_b: String,
}
