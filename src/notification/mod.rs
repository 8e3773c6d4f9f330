mod requests;
mod responses;

use crate::{
    database::{self, assert, get_db_conn},
    models::notifications::{NewNotification, NotificationData},
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(search).service(mark_read);
}

crate::post_funcs! {
    (search, "/search", SearchNotificationRequest, SearchNotificationResponse),
    (mark_read, "/mark_read", MarkReadRequest, SimpleResponse),
}

/// Queue a notification row for a user. Runs inside the caller's
/// transaction so a failed operation never leaves its notification behind.
pub fn push(
    conn: &diesel::PgConnection,
    user_id: &str,
    kind: &str,
    title: &str,
) -> diesel::QueryResult<usize> {
    use crate::schema::notifications;

    diesel::insert_into(notifications::table)
        .values(NewNotification {
            user_id: user_id.to_string(),
            kind: kind.to_string(),
            title: title.to_string(),
        })
        .execute(conn)
}

async fn search_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchNotificationRequest>,
) -> anyhow::Result<SearchNotificationResponse> {
    use crate::schema::notifications;

    let info = info.into_inner();
    assert::assert_profile(&pool, info.user_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let user_id = info.user_id;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let rows = web::block(move || {
        database::retry_read(|| {
            notifications::table
                .filter(notifications::user_id.eq(&user_id))
                .order(notifications::created_at.desc())
                .offset(first_index)
                .limit(limit)
                .get_results::<NotificationData>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let notifications = rows
        .into_iter()
        .map(|data| SearchNotificationItem {
            id: data.id,
            kind: data.kind,
            title: data.title,
            is_read: data.is_read,
            created_at: crate::utils::format_time_str(&data.created_at),
        })
        .collect();

    Ok(SearchNotificationResponse {
        success: true,
        err: "".to_string(),
        notifications,
    })
}

async fn mark_read_impl(
    pool: web::Data<DbPool>,
    info: web::Json<MarkReadRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::notifications;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;
    let affected = web::block(move || {
        diesel::update(
            notifications::table
                .filter(notifications::id.eq(info.notification_id))
                .filter(notifications::user_id.eq(&info.user_id)),
        )
        .set(notifications::is_read.eq(true))
        .execute(&conn)
    })
    .await
    .context("DB error")?;

    if affected == 0 {
        bail!("No such notification");
    }

    Ok(SimpleResponse::ok())
}
