mod requests;
mod responses;
mod utils;

use crate::{
    database::{self, assert, get_db_conn},
    models::slots::{NewSlot, SlotData},
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use std::collections::HashSet;

use self::{requests::*, responses::*, utils::SlotSpan};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(set_schedule)
        .service(sync_week)
        .service(search_open)
        .service(search_range);
}

crate::post_funcs! {
    (set_schedule, "/set_schedule", SetScheduleRequest, SetScheduleResponse),
    (sync_week, "/sync_week", SyncWeekRequest, SyncWeekResponse),
    (search_open, "/search_open", SearchOpenRequest, SearchOpenResponse),
    (search_range, "/search_range", SearchRangeRequest, SearchRangeResponse),
}

async fn set_schedule_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SetScheduleRequest>,
) -> anyhow::Result<SetScheduleResponse> {
    use crate::schema::availability_slots;

    let info = info.into_inner();
    assert::assert_provider(&pool, info.provider_id.clone()).await?;

    let now = Utc::now().naive_utc();
    let batch = utils::expand_weekly_template(&info.provider_id, &info.schedule, now)?;

    let conn = get_db_conn(&pool)?;
    let provider_id = info.provider_id;
    let generated = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            // Re-running a template replaces open slots only; anything a
            // student holds stays untouched.
            diesel::delete(
                availability_slots::table
                    .filter(availability_slots::provider_id.eq(&provider_id))
                    .filter(availability_slots::is_booked.eq(false))
                    .filter(availability_slots::start_time.gt(now)),
            )
            .execute(&conn)
            .context("DB error")?;

            let reserved: HashSet<NaiveDateTime> = availability_slots::table
                .filter(availability_slots::provider_id.eq(&provider_id))
                .filter(availability_slots::is_booked.eq(true))
                .filter(availability_slots::start_time.gt(now))
                .select(availability_slots::start_time)
                .get_results::<NaiveDateTime>(&conn)
                .context("DB error")?
                .into_iter()
                .collect();

            let batch: Vec<NewSlot> = batch
                .into_iter()
                .filter(|slot| !reserved.contains(&slot.start_time))
                .collect();

            diesel::insert_into(availability_slots::table)
                .values(&batch)
                .execute(&conn)
                .context("DB error")?;

            Ok(batch.len())
        })
    })
    .await?;

    Ok(SetScheduleResponse {
        success: true,
        err: "".to_string(),
        generated,
    })
}

async fn sync_week_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SyncWeekRequest>,
) -> anyhow::Result<SyncWeekResponse> {
    use crate::schema::availability_slots;

    let info = info.into_inner();
    assert::assert_provider(&pool, info.provider_id.clone()).await?;

    let (week_start, week_end) = crate::utils::parse_time_pair_str(&info.week_start, &info.week_end)?;
    if week_start >= week_end {
        bail!("Invalid week range");
    }

    let mut desired = Vec::with_capacity(info.desired.len());
    for span in &info.desired {
        let (start_time, end_time) =
            crate::utils::parse_time_pair_str(&span.start_time, &span.end_time)?;
        desired.push(SlotSpan {
            start_time,
            end_time,
        });
    }
    utils::validate_week_spans(&desired, week_start, week_end)?;

    let conn = get_db_conn(&pool)?;
    let provider_id = info.provider_id;
    let (added, removed) = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let existing = availability_slots::table
                .filter(availability_slots::provider_id.eq(&provider_id))
                .filter(availability_slots::start_time.ge(week_start))
                .filter(availability_slots::start_time.lt(week_end))
                .order(availability_slots::start_time.asc())
                .get_results::<SlotData>(&conn)
                .context("DB error")?;

            let (to_delete, to_insert) = utils::diff_against_desired(&existing, &desired);

            let removed = if to_delete.is_empty() {
                0
            } else {
                diesel::delete(
                    availability_slots::table.filter(availability_slots::id.eq_any(&to_delete)),
                )
                .execute(&conn)
                .context("DB error")?
            };

            let rows: Vec<NewSlot> = to_insert
                .iter()
                .map(|span| NewSlot {
                    provider_id: provider_id.clone(),
                    start_time: span.start_time,
                    end_time: span.end_time,
                    is_booked: false,
                })
                .collect();
            let added = diesel::insert_into(availability_slots::table)
                .values(&rows)
                .execute(&conn)
                .context("DB error")?;

            Ok((added, removed))
        })
    })
    .await?;

    Ok(SyncWeekResponse {
        success: true,
        err: "".to_string(),
        added,
        removed,
    })
}

async fn search_open_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchOpenRequest>,
) -> anyhow::Result<SearchOpenResponse> {
    use crate::schema::availability_slots;

    let info = info.into_inner();
    assert::assert_provider(&pool, info.provider_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let provider_id = info.provider_id;
    let now = Utc::now().naive_utc();
    let slots = web::block(move || {
        database::retry_read(|| {
            availability_slots::table
                .filter(availability_slots::provider_id.eq(&provider_id))
                .filter(availability_slots::is_booked.eq(false))
                .filter(availability_slots::start_time.ge(now))
                .order(availability_slots::start_time.asc())
                .get_results::<SlotData>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let slots = slots
        .into_iter()
        .map(|slot| SearchOpenItem {
            id: slot.id,
            start_time: crate::utils::format_time_str(&slot.start_time),
            end_time: crate::utils::format_time_str(&slot.end_time),
        })
        .collect();

    Ok(SearchOpenResponse {
        success: true,
        err: "".to_string(),
        slots,
    })
}

async fn search_range_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchRangeRequest>,
) -> anyhow::Result<SearchRangeResponse> {
    use crate::schema::availability_slots;

    let info = info.into_inner();
    assert::assert_provider(&pool, info.provider_id.clone()).await?;

    let (start_time, end_time) =
        crate::utils::parse_time_pair_str(&info.start_time, &info.end_time)?;

    let conn = get_db_conn(&pool)?;
    let provider_id = info.provider_id;
    let slots = web::block(move || {
        database::retry_read(|| {
            availability_slots::table
                .filter(availability_slots::provider_id.eq(&provider_id))
                .filter(availability_slots::start_time.ge(start_time))
                .filter(availability_slots::start_time.lt(end_time))
                .order(availability_slots::start_time.asc())
                .get_results::<SlotData>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let slots = slots
        .into_iter()
        .map(|slot| SearchRangeItem {
            id: slot.id,
            start_time: crate::utils::format_time_str(&slot.start_time),
            end_time: crate::utils::format_time_str(&slot.end_time),
            is_booked: slot.is_booked,
        })
        .collect();

    Ok(SearchRangeResponse {
        success: true,
        err: "".to_string(),
        slots,
    })
}
