mod requests;
mod responses;

use crate::{
    database::{self, assert, get_db_conn},
    models::{
        connections::{
            ConnectionData, ConnectionRequestData, NewConnection, NewConnectionRequest,
            REQUEST_STATUS_ACCEPTED, REQUEST_STATUS_PENDING,
        },
        notifications::KIND_CONNECTION,
        profiles::ProfileData,
    },
    notification,
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(send_request)
        .service(accept_request)
        .service(decline_request)
        .service(search_requests)
        .service(search_connections)
        .service(status);
}

crate::post_funcs! {
    (send_request, "/send_request", SendRequestRequest, SimpleResponse),
    (accept_request, "/accept_request", AcceptRequestRequest, SimpleResponse),
    (decline_request, "/decline_request", DeclineRequestRequest, SimpleResponse),
    (search_requests, "/search_requests", SearchRequestsRequest, SearchRequestsResponse),
    (search_connections, "/search_connections", SearchConnectionsRequest, SearchConnectionsResponse),
    (status, "/status", StatusRequest, StatusResponse),
}

async fn send_request_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SendRequestRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{connection_requests, connections};

    let info = info.into_inner();
    if info.requester_id == info.receiver_id {
        bail!("Cannot send a connection request to yourself");
    }
    assert::assert_profile(&pool, info.requester_id.clone()).await?;
    assert::assert_profile(&pool, info.receiver_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let connected = connections::table
                .filter(
                    (connections::user_a
                        .eq(&info.requester_id)
                        .and(connections::user_b.eq(&info.receiver_id)))
                    .or(connections::user_a
                        .eq(&info.receiver_id)
                        .and(connections::user_b.eq(&info.requester_id))),
                )
                .count()
                .get_result::<i64>(&conn)
                .context("DB error")?;
            if connected > 0 {
                bail!("Already connected with this user");
            }

            // A request in either direction blocks a new one; declined
            // requests may be retried.
            let requests = connection_requests::table
                .filter(
                    (connection_requests::requester_id
                        .eq(&info.requester_id)
                        .and(connection_requests::receiver_id.eq(&info.receiver_id)))
                    .or(connection_requests::requester_id
                        .eq(&info.receiver_id)
                        .and(connection_requests::receiver_id.eq(&info.requester_id))),
                )
                .get_results::<ConnectionRequestData>(&conn)
                .context("DB error")?;
            for request in &requests {
                match request.status.as_str() {
                    REQUEST_STATUS_PENDING => bail!("A connection request is already pending"),
                    REQUEST_STATUS_ACCEPTED => bail!("Already connected with this user"),
                    _ => {}
                }
            }

            let data = NewConnectionRequest {
                requester_id: info.requester_id.clone(),
                receiver_id: info.receiver_id.clone(),
                status: REQUEST_STATUS_PENDING.to_string(),
            };
            diesel::insert_into(connection_requests::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;

            notification::push(
                &conn,
                &info.receiver_id,
                KIND_CONNECTION,
                "New connection request",
            )
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn accept_request_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AcceptRequestRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{connection_requests, connections};

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let request = connection_requests::table
                .filter(connection_requests::id.eq(info.request_id))
                .get_result::<ConnectionRequestData>(&conn)
                .optional()
                .context("DB error")?;
            let request = match request {
                Some(request) => request,
                None => bail!("No such connection request"),
            };
            if request.receiver_id != info.receiver_id {
                bail!("Only the receiver may accept");
            }
            if request.status != REQUEST_STATUS_PENDING {
                bail!("Request is not pending");
            }

            diesel::update(
                connection_requests::table.filter(connection_requests::id.eq(info.request_id)),
            )
            .set(connection_requests::status.eq(REQUEST_STATUS_ACCEPTED))
            .execute(&conn)
            .context("DB error")?;

            let data = NewConnection {
                user_a: request.requester_id.clone(),
                user_b: request.receiver_id.clone(),
            };
            diesel::insert_into(connections::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;

            notification::push(
                &conn,
                &request.requester_id,
                KIND_CONNECTION,
                "Your connection request was accepted",
            )
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn decline_request_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeclineRequestRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::connection_requests;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let request = connection_requests::table
                .filter(connection_requests::id.eq(info.request_id))
                .get_result::<ConnectionRequestData>(&conn)
                .optional()
                .context("DB error")?;
            let request = match request {
                Some(request) => request,
                None => bail!("No such connection request"),
            };
            if request.receiver_id != info.receiver_id {
                bail!("Only the receiver may decline");
            }
            if request.status != REQUEST_STATUS_PENDING {
                bail!("Request is not pending");
            }

            diesel::update(
                connection_requests::table.filter(connection_requests::id.eq(info.request_id)),
            )
            .set(connection_requests::status.eq(crate::models::connections::REQUEST_STATUS_DECLINED))
            .execute(&conn)
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn search_requests_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchRequestsRequest>,
) -> anyhow::Result<SearchRequestsResponse> {
    use crate::schema::{connection_requests, profiles};

    let info = info.into_inner();
    assert::assert_profile(&pool, info.user_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let user_id = info.user_id;
    let rows = web::block(move || {
        database::retry_read(|| {
            connection_requests::table
                .filter(connection_requests::receiver_id.eq(&user_id))
                .filter(connection_requests::status.eq(REQUEST_STATUS_PENDING))
                .inner_join(profiles::table.on(connection_requests::requester_id.eq(profiles::id)))
                .order(connection_requests::created_at.desc())
                .offset(first_index)
                .limit(limit)
                .get_results::<(ConnectionRequestData, ProfileData)>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let requests = rows
        .into_iter()
        .map(|(request, requester)| SearchRequestsItem {
            request_id: request.id,
            requester_id: requester.id,
            requester_name: requester.full_name,
            requester_role: requester.role,
            created_at: crate::utils::format_time_str(&request.created_at),
        })
        .collect();

    Ok(SearchRequestsResponse {
        success: true,
        err: "".to_string(),
        requests,
    })
}

async fn search_connections_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchConnectionsRequest>,
) -> anyhow::Result<SearchConnectionsResponse> {
    use crate::schema::{connections, profiles};

    let info = info.into_inner();
    assert::assert_profile(&pool, info.user_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let user_id = info.user_id;
    let (as_a, as_b) = web::block(move || {
        database::retry_read(|| {
            // A connection stores its two members unordered, so the
            // counterpart may sit in either column.
            let as_a = connections::table
                .filter(connections::user_a.eq(&user_id))
                .inner_join(profiles::table.on(connections::user_b.eq(profiles::id)))
                .get_results::<(ConnectionData, ProfileData)>(&conn)?;
            let as_b = connections::table
                .filter(connections::user_b.eq(&user_id))
                .inner_join(profiles::table.on(connections::user_a.eq(profiles::id)))
                .get_results::<(ConnectionData, ProfileData)>(&conn)?;
            Ok((as_a, as_b))
        })
    })
    .await
    .context("DB error")?;

    let mut rows: Vec<_> = as_a.into_iter().chain(as_b.into_iter()).collect();
    rows.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));

    let connections = rows
        .into_iter()
        .map(|(connection, counterpart)| SearchConnectionsItem {
            user_id: counterpart.id,
            full_name: counterpart.full_name,
            role: counterpart.role,
            specialty: counterpart.specialty.unwrap_or_default(),
            connected_at: crate::utils::format_time_str(&connection.created_at),
        })
        .collect();

    Ok(SearchConnectionsResponse {
        success: true,
        err: "".to_string(),
        connections,
    })
}

async fn status_impl(
    pool: web::Data<DbPool>,
    info: web::Json<StatusRequest>,
) -> anyhow::Result<StatusResponse> {
    use crate::schema::{connection_requests, connections};

    let info = info.into_inner();
    if info.user_id == info.other_id {
        return Ok(StatusResponse {
            success: true,
            err: "".to_string(),
            status: "self".to_string(),
            request_id: None,
        });
    }

    let conn = get_db_conn(&pool)?;
    let (conn_status, request_id) = web::block(move || {
        database::retry_read(|| {
            let connected = connections::table
                .filter(
                    (connections::user_a
                        .eq(&info.user_id)
                        .and(connections::user_b.eq(&info.other_id)))
                    .or(connections::user_a
                        .eq(&info.other_id)
                        .and(connections::user_b.eq(&info.user_id))),
                )
                .count()
                .get_result::<i64>(&conn)?;
            if connected > 0 {
                return Ok(("connected", None));
            }

            let outgoing = connection_requests::table
                .filter(connection_requests::requester_id.eq(&info.user_id))
                .filter(connection_requests::receiver_id.eq(&info.other_id))
                .filter(connection_requests::status.eq(REQUEST_STATUS_PENDING))
                .count()
                .get_result::<i64>(&conn)?;
            if outgoing > 0 {
                return Ok(("outgoing_pending", None));
            }

            let incoming = connection_requests::table
                .filter(connection_requests::requester_id.eq(&info.other_id))
                .filter(connection_requests::receiver_id.eq(&info.user_id))
                .filter(connection_requests::status.eq(REQUEST_STATUS_PENDING))
                .select(connection_requests::id)
                .get_result::<i64>(&conn)
                .optional()?;
            if let Some(request_id) = incoming {
                return Ok(("incoming_pending", Some(request_id)));
            }

            Ok(("none", None))
        })
    })
    .await
    .context("DB error")?;

    Ok(StatusResponse {
        success: true,
        err: "".to_string(),
        status: conn_status.to_string(),
        request_id,
    })
}
