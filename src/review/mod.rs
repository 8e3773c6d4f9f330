mod requests;
mod responses;

use crate::{
    database::{self, assert, get_db_conn},
    models::{
        bookings::{BookingData, BookingStatus},
        profiles::ProfileData,
        reviews::{NewReview, ReviewData, RATING_MAX, RATING_MIN},
    },
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::Utc;
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(submit).service(search);
}

crate::post_funcs! {
    (submit, "/submit", SubmitReviewRequest, SimpleResponse),
    (search, "/search", SearchReviewRequest, SearchReviewResponse),
}

async fn submit_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SubmitReviewRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{bookings, reviews};

    let info = info.into_inner();
    if info.rating < RATING_MIN || info.rating > RATING_MAX {
        bail!("Rating must be between {} and {}", RATING_MIN, RATING_MAX);
    }
    assert::assert_profile(&pool, info.reviewer_id.clone()).await?;
    assert::assert_booking(&pool, info.booking_id).await?;

    let conn = get_db_conn(&pool)?;
    let now = Utc::now().naive_utc();
    web::block(move || {
        conn.transaction(|| {
            let booking = bookings::table
                .filter(bookings::id.eq(info.booking_id))
                .get_result::<BookingData>(&conn)
                .context("DB error")?;

            let reviewee_id = if info.reviewer_id == booking.student_id {
                booking.provider_id.clone()
            } else if info.reviewer_id == booking.provider_id {
                booking.student_id.clone()
            } else {
                bail!("Only a participant may review");
            };

            if BookingStatus::parse(&booking.status)? != BookingStatus::Confirmed {
                bail!("Only confirmed sessions can be reviewed");
            }
            if booking.scheduled_end >= now {
                bail!("Session has not finished yet");
            }

            let res = reviews::table
                .filter(reviews::booking_id.eq(info.booking_id))
                .filter(reviews::reviewer_id.eq(&info.reviewer_id))
                .count()
                .get_result::<i64>(&conn)
                .context("DB error")?;
            if res > 0 {
                bail!("Review already submitted");
            }

            let data = NewReview {
                booking_id: info.booking_id,
                reviewer_id: info.reviewer_id,
                reviewee_id,
                rating: info.rating,
                comment: info.comment,
            };
            diesel::insert_into(reviews::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn search_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchReviewRequest>,
) -> anyhow::Result<SearchReviewResponse> {
    use crate::schema::{profiles, reviews};

    let info = info.into_inner();
    assert::assert_profile(&pool, info.reviewee_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let reviewee_id = info.reviewee_id;
    let rows = web::block(move || {
        database::retry_read(|| {
            reviews::table
                .filter(reviews::reviewee_id.eq(&reviewee_id))
                .inner_join(profiles::table.on(reviews::reviewer_id.eq(profiles::id)))
                .order(reviews::created_at.desc())
                .offset(first_index)
                .limit(limit)
                .get_results::<(ReviewData, ProfileData)>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let reviews = rows
        .into_iter()
        .map(|(data, reviewer)| SearchReviewItem {
            id: data.id,
            booking_id: data.booking_id,
            reviewer_id: reviewer.id,
            reviewer_name: reviewer.full_name,
            rating: data.rating,
            comment: data.comment.unwrap_or_default(),
            created_at: crate::utils::format_time_str(&data.created_at),
        })
        .collect();

    Ok(SearchReviewResponse {
        success: true,
        err: "".to_string(),
        reviews,
    })
}
