mod requests;
mod responses;
mod utils;

use crate::{
    database::{self, assert, get_db_conn},
    email,
    models::{
        bookings::{BookingData, BookingStatus, NewBooking},
        notifications::KIND_BOOKING,
        profiles::ProfileData,
        slots::SlotData,
    },
    notification,
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(approve)
        .service(reject)
        .service(complete_payment)
        .service(cancel)
        .service(delete)
        .service(search_student)
        .service(search_provider);
}

crate::post_funcs! {
    (create, "/create", CreateBookingRequest, CreateBookingResponse),
    (approve, "/approve", ApproveBookingRequest, SimpleResponse),
    (reject, "/reject", RejectBookingRequest, SimpleResponse),
    (complete_payment, "/complete_payment", CompletePaymentRequest, SimpleResponse),
    (cancel, "/cancel", CancelBookingRequest, SimpleResponse),
    (delete, "/delete", DeleteBookingRequest, SimpleResponse),
    (search_student, "/search_student", SearchStudentRequest, SearchStudentResponse),
    (search_provider, "/search_provider", SearchProviderRequest, SearchProviderResponse),
}

async fn create_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CreateBookingRequest>,
) -> anyhow::Result<CreateBookingResponse> {
    use crate::schema::{availability_slots, bookings, profiles};

    let info = info.into_inner();
    if info.student_id == info.provider_id {
        bail!("Cannot book a session with yourself");
    }
    assert::assert_student(&pool, info.student_id.clone()).await?;
    assert::assert_provider(&pool, info.provider_id.clone()).await?;

    let start_time = crate::utils::parse_time_str(&info.start_time)?;
    let units = utils::required_units(info.duration_minutes)?;
    let scheduled_end = start_time + Duration::minutes(info.duration_minutes);

    let conn = get_db_conn(&pool)?;
    let now = Utc::now().naive_utc();
    let (booking_id, price_cents) = web::block(move || {
        conn.transaction(|| {
            let rate = profiles::table
                .filter(profiles::id.eq(&info.provider_id))
                .select(profiles::hourly_rate_cents)
                .get_result::<Option<i64>>(&conn)
                .context("DB error")?;
            let rate = match rate {
                Some(rate) => rate,
                None => bail!("Provider has no hourly rate"),
            };
            let price_cents = utils::session_price_cents(rate, info.duration_minutes);

            let open = availability_slots::table
                .filter(availability_slots::provider_id.eq(&info.provider_id))
                .filter(availability_slots::is_booked.eq(false))
                .filter(availability_slots::start_time.ge(now))
                .order(availability_slots::start_time.asc())
                .get_results::<SlotData>(&conn)
                .context("DB error")?;
            let slot_ids = utils::select_contiguous(&open, start_time, units)?;

            // Reserve-if-all-free: the affected-row check makes a racing
            // request lose cleanly, and bailing rolls the whole batch back.
            let reserved = diesel::update(
                availability_slots::table
                    .filter(availability_slots::id.eq_any(&slot_ids))
                    .filter(availability_slots::is_booked.eq(false)),
            )
            .set(availability_slots::is_booked.eq(true))
            .execute(&conn)
            .context("DB error")?;
            if reserved != slot_ids.len() {
                bail!("One or more slots were just taken, please pick another time");
            }

            let data = NewBooking {
                student_id: info.student_id.clone(),
                provider_id: info.provider_id.clone(),
                status: BookingStatus::PendingApproval.as_str().to_string(),
                scheduled_start: start_time,
                scheduled_end,
                price_cents,
                notes: info.notes.clone(),
            };
            let booking = diesel::insert_into(bookings::table)
                .values(data)
                .get_result::<BookingData>(&conn)
                .context("DB error")?;

            notification::push(
                &conn,
                &info.provider_id,
                KIND_BOOKING,
                "New session request",
            )
            .context("DB error")?;

            Ok((booking.id, price_cents))
        })
    })
    .await?;

    Ok(CreateBookingResponse {
        success: true,
        err: "".to_string(),
        booking_id,
        price_cents,
        status: BookingStatus::PendingApproval.as_str().to_string(),
    })
}

async fn approve_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ApproveBookingRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::bookings;

    let info = info.into_inner();
    assert::assert_booking(&pool, info.booking_id).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let booking = bookings::table
                .filter(bookings::id.eq(info.booking_id))
                .get_result::<BookingData>(&conn)
                .context("DB error")?;
            if booking.provider_id != info.provider_id {
                bail!("Only the booked provider may approve");
            }
            if BookingStatus::parse(&booking.status)? != BookingStatus::PendingApproval {
                bail!("Booking is not awaiting approval");
            }

            diesel::update(bookings::table.filter(bookings::id.eq(info.booking_id)))
                .set(bookings::status.eq(BookingStatus::ApprovedPendingPayment.as_str()))
                .execute(&conn)
                .context("DB error")?;

            notification::push(
                &conn,
                &booking.student_id,
                KIND_BOOKING,
                "Your session request was approved, payment is due",
            )
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn reject_impl(
    pool: web::Data<DbPool>,
    info: web::Json<RejectBookingRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::bookings;

    let info = info.into_inner();
    assert::assert_booking(&pool, info.booking_id).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let booking = bookings::table
                .filter(bookings::id.eq(info.booking_id))
                .get_result::<BookingData>(&conn)
                .context("DB error")?;
            if booking.provider_id != info.provider_id {
                bail!("Only the booked provider may reject");
            }
            if BookingStatus::parse(&booking.status)? != BookingStatus::PendingApproval {
                bail!("Booking is not awaiting approval");
            }

            diesel::update(bookings::table.filter(bookings::id.eq(info.booking_id)))
                .set(bookings::status.eq(BookingStatus::Rejected.as_str()))
                .execute(&conn)
                .context("DB error")?;

            // Slots reserved at creation go back on the market.
            release_slots(&conn, &booking)?;

            notification::push(
                &conn,
                &booking.student_id,
                KIND_BOOKING,
                "Your session request was declined",
            )
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn complete_payment_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CompletePaymentRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{availability_slots, bookings, profiles};

    let info = info.into_inner();
    assert::assert_booking(&pool, info.booking_id).await?;

    let conn = get_db_conn(&pool)?;
    let (booking, student, provider) = web::block(move || {
        conn.transaction(|| {
            let booking = bookings::table
                .filter(bookings::id.eq(info.booking_id))
                .get_result::<BookingData>(&conn)
                .context("DB error")?;
            if booking.student_id != info.student_id {
                bail!("Only the booking student may complete payment");
            }
            if BookingStatus::parse(&booking.status)? != BookingStatus::ApprovedPendingPayment {
                bail!("Booking is not awaiting payment");
            }

            // Re-mark the covered range; slots released in the meantime
            // (or recreated by a calendar edit) are taken again.
            diesel::update(
                availability_slots::table
                    .filter(availability_slots::provider_id.eq(&booking.provider_id))
                    .filter(availability_slots::start_time.ge(booking.scheduled_start))
                    .filter(availability_slots::start_time.lt(booking.scheduled_end)),
            )
            .set(availability_slots::is_booked.eq(true))
            .execute(&conn)
            .context("DB error")?;

            diesel::update(bookings::table.filter(bookings::id.eq(info.booking_id)))
                .set(bookings::status.eq(BookingStatus::Confirmed.as_str()))
                .execute(&conn)
                .context("DB error")?;

            let student = profiles::table
                .filter(profiles::id.eq(&booking.student_id))
                .get_result::<ProfileData>(&conn)
                .context("DB error")?;
            let provider = profiles::table
                .filter(profiles::id.eq(&booking.provider_id))
                .get_result::<ProfileData>(&conn)
                .context("DB error")?;

            notification::push(
                &conn,
                &booking.provider_id,
                KIND_BOOKING,
                "A session was confirmed",
            )
            .context("DB error")?;

            Ok((booking, student, provider))
        })
    })
    .await?;

    let mail = email::BookingConfirmation {
        student_name: student.full_name,
        student_email: student.email,
        provider_name: provider.full_name,
        scheduled_start: crate::utils::format_time_str(&booking.scheduled_start),
        scheduled_end: crate::utils::format_time_str(&booking.scheduled_end),
        price_cents: booking.price_cents,
    };
    if let Err(err) = email::send_booking_confirmation(&mail) {
        log::warn!("confirmation mail for booking {} failed: {}", booking.id, err);
    }

    Ok(SimpleResponse::ok())
}

async fn cancel_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CancelBookingRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::bookings;

    let info = info.into_inner();
    assert::assert_booking(&pool, info.booking_id).await?;

    let conn = get_db_conn(&pool)?;
    let now = Utc::now().naive_utc();
    web::block(move || {
        conn.transaction(|| {
            let booking = bookings::table
                .filter(bookings::id.eq(info.booking_id))
                .get_result::<BookingData>(&conn)
                .context("DB error")?;
            if booking.student_id != info.user_id && booking.provider_id != info.user_id {
                bail!("Only a participant may cancel");
            }
            let status = BookingStatus::parse(&booking.status)?;
            if !status.can_cancel() {
                bail!("Booking is already {}", status.as_str());
            }
            if booking.scheduled_start <= now {
                bail!("Booking has already started");
            }

            diesel::update(bookings::table.filter(bookings::id.eq(info.booking_id)))
                .set(bookings::status.eq(BookingStatus::Cancelled.as_str()))
                .execute(&conn)
                .context("DB error")?;

            release_slots(&conn, &booking)?;

            let other = if info.user_id == booking.student_id {
                &booking.provider_id
            } else {
                &booking.student_id
            };
            notification::push(&conn, other, KIND_BOOKING, "A session was cancelled")
                .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn delete_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeleteBookingRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::bookings;

    let info = info.into_inner();
    assert::assert_booking(&pool, info.booking_id).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let booking = bookings::table
                .filter(bookings::id.eq(info.booking_id))
                .get_result::<BookingData>(&conn)
                .context("DB error")?;
            if booking.student_id != info.user_id && booking.provider_id != info.user_id {
                bail!("Only a participant may delete");
            }
            if !BookingStatus::parse(&booking.status)?.can_delete() {
                bail!("Only cancelled or rejected bookings can be deleted");
            }

            diesel::delete(bookings::table.filter(bookings::id.eq(info.booking_id)))
                .execute(&conn)
                .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

/// Open up every slot covered by a booking's scheduled range.
fn release_slots(conn: &diesel::PgConnection, booking: &BookingData) -> anyhow::Result<()> {
    use crate::schema::availability_slots;

    diesel::update(
        availability_slots::table
            .filter(availability_slots::provider_id.eq(&booking.provider_id))
            .filter(availability_slots::start_time.ge(booking.scheduled_start))
            .filter(availability_slots::start_time.lt(booking.scheduled_end)),
    )
    .set(availability_slots::is_booked.eq(false))
    .execute(conn)
    .context("DB error")?;

    Ok(())
}

async fn search_student_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchStudentRequest>,
) -> anyhow::Result<SearchStudentResponse> {
    use crate::schema::{bookings, profiles};

    let info = info.into_inner();
    assert::assert_student(&pool, info.student_id.clone()).await?;

    let (start_time, end_time) =
        crate::utils::parse_time_pair_str_opt(info.start_time, info.end_time)?;
    let status = info.status.unwrap_or_else(|| "all".to_string());
    if &status != "all" {
        BookingStatus::parse(&status)?;
    }

    let conn = get_db_conn(&pool)?;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let student_id = info.student_id;
    let rows = web::block(move || {
        database::retry_read(|| {
            bookings::table
                .filter(bookings::student_id.eq(&student_id))
                .filter(bookings::status.eq(&status).or(&status == "all"))
                .filter(bookings::scheduled_start.ge(start_time))
                .filter(bookings::scheduled_start.lt(end_time))
                .inner_join(profiles::table.on(bookings::provider_id.eq(profiles::id)))
                .order(bookings::scheduled_start.desc())
                .offset(first_index)
                .limit(limit)
                .get_results::<(BookingData, ProfileData)>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let now = Utc::now().naive_utc();
    let items = rows
        .into_iter()
        .map(|(data, provider)| {
            let status = BookingStatus::parse(&data.status)
                .map(|s| s.display_at(data.scheduled_end, now).to_string())
                .unwrap_or_else(|_| data.status.clone());
            SearchStudentItem {
                booking_id: data.id,
                provider_id: provider.id,
                provider_name: provider.full_name,
                scheduled_start: crate::utils::format_time_str(&data.scheduled_start),
                scheduled_end: crate::utils::format_time_str(&data.scheduled_end),
                status,
                price_cents: data.price_cents,
                notes: data.notes.unwrap_or_default(),
                created_at: crate::utils::format_time_str(&data.created_at),
            }
        })
        .collect();

    Ok(SearchStudentResponse {
        success: true,
        err: "".to_string(),
        bookings: items,
    })
}

async fn search_provider_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchProviderRequest>,
) -> anyhow::Result<SearchProviderResponse> {
    use crate::schema::{bookings, profiles};

    let info = info.into_inner();
    assert::assert_provider(&pool, info.provider_id.clone()).await?;

    let (start_time, end_time) =
        crate::utils::parse_time_pair_str_opt(info.start_time, info.end_time)?;
    let status = info.status.unwrap_or_else(|| "all".to_string());
    if &status != "all" {
        BookingStatus::parse(&status)?;
    }

    let conn = get_db_conn(&pool)?;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let provider_id = info.provider_id;
    let rows = web::block(move || {
        database::retry_read(|| {
            bookings::table
                .filter(bookings::provider_id.eq(&provider_id))
                .filter(bookings::status.eq(&status).or(&status == "all"))
                .filter(bookings::scheduled_start.ge(start_time))
                .filter(bookings::scheduled_start.lt(end_time))
                .inner_join(profiles::table.on(bookings::student_id.eq(profiles::id)))
                .order(bookings::scheduled_start.desc())
                .offset(first_index)
                .limit(limit)
                .get_results::<(BookingData, ProfileData)>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let now = Utc::now().naive_utc();
    let items = rows
        .into_iter()
        .map(|(data, student)| {
            let status = BookingStatus::parse(&data.status)
                .map(|s| s.display_at(data.scheduled_end, now).to_string())
                .unwrap_or_else(|_| data.status.clone());
            SearchProviderItem {
                booking_id: data.id,
                student_id: student.id,
                student_name: student.full_name,
                scheduled_start: crate::utils::format_time_str(&data.scheduled_start),
                scheduled_end: crate::utils::format_time_str(&data.scheduled_end),
                status,
                price_cents: data.price_cents,
                notes: data.notes.unwrap_or_default(),
                created_at: crate::utils::format_time_str(&data.created_at),
            }
        })
        .collect();

    Ok(SearchProviderResponse {
        success: true,
        err: "".to_string(),
        bookings: items,
    })
}
