mod requests;
mod responses;

use crate::{
    database::{self, assert, get_db_conn},
    models::{
        notifications::KIND_SYSTEM,
        profiles::{is_provider_role, NewProfile, ProfileData, UpdateProfile, ROLE_STUDENT},
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
    cfg.service(register)
        .service(view)
        .service(modify)
        .service(search);
}

crate::post_funcs! {
    (register, "/register", RegisterRequest, SimpleResponse),
    (view, "/view", ViewRequest, ViewResponse),
    (modify, "/modify", ModifyRequest, SimpleResponse),
    (search, "/search", SearchRequest, SearchResponse),
}

async fn register_impl(
    pool: web::Data<DbPool>,
    info: web::Json<RegisterRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::profiles;

    let info = info.into_inner();
    if info.role != ROLE_STUDENT && !is_provider_role(&info.role) {
        bail!("Unknown role '{}'", info.role);
    }
    if is_provider_role(&info.role) {
        match info.hourly_rate_cents {
            Some(rate) if rate > 0 => {}
            _ => bail!("Providers must set a positive hourly rate"),
        }
    }

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let res = profiles::table
                .filter(profiles::id.eq(&info.user_id))
                .count()
                .get_result::<i64>(&conn)
                .context("DB error")?;
            if res > 0 {
                bail!("Profile already exists");
            }

            let data = NewProfile {
                id: info.user_id.clone(),
                full_name: info.full_name,
                email: info.email,
                role: info.role,
                specialty: info.specialty,
                hourly_rate_cents: info.hourly_rate_cents,
                bio: info.bio,
            };
            diesel::insert_into(profiles::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;

            notification::push(&conn, &info.user_id, KIND_SYSTEM, "Welcome aboard")
                .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn view_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ViewRequest>,
) -> anyhow::Result<ViewResponse> {
    use crate::schema::{profiles, reviews};

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;
    let user_id = info.user_id;
    let (profile, ratings) = web::block(move || {
        database::retry_read(|| {
            let profile = profiles::table
                .filter(profiles::id.eq(&user_id))
                .get_result::<ProfileData>(&conn)
                .optional()?;
            let ratings = match &profile {
                Some(profile) => reviews::table
                    .filter(reviews::reviewee_id.eq(&profile.id))
                    .select(reviews::rating)
                    .get_results::<i32>(&conn)?,
                None => Vec::new(),
            };
            Ok((profile, ratings))
        })
    })
    .await
    .context("DB error")?;

    let profile = match profile {
        Some(profile) => profile,
        None => bail!("No such user"),
    };
    let rating_count = ratings.len() as i64;
    let rating_avg = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().map(|rating| *rating as f64).sum::<f64>() / ratings.len() as f64
    };

    Ok(ViewResponse {
        success: true,
        err: "".to_string(),
        user_id: profile.id,
        full_name: profile.full_name,
        email: profile.email,
        role: profile.role,
        specialty: profile.specialty.unwrap_or_default(),
        hourly_rate_cents: profile.hourly_rate_cents,
        bio: profile.bio.unwrap_or_default(),
        rating_count,
        rating_avg,
        created_at: crate::utils::format_time_str(&profile.created_at),
    })
}

async fn modify_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ModifyRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::profiles;

    let info = info.into_inner();
    assert::assert_profile(&pool, info.user_id.clone()).await?;

    if let Some(rate) = info.hourly_rate_cents {
        if rate <= 0 {
            bail!("Hourly rate must be positive");
        }
    }

    // Rate changes only affect future bookings: the price on existing
    // booking rows is frozen at creation time.
    let data = UpdateProfile {
        full_name: info.full_name,
        email: info.email,
        specialty: info.specialty,
        hourly_rate_cents: info.hourly_rate_cents,
        bio: info.bio,
    };
    if data.full_name.is_none()
        && data.email.is_none()
        && data.specialty.is_none()
        && data.hourly_rate_cents.is_none()
        && data.bio.is_none()
    {
        bail!("Nothing to modify");
    }

    let conn = get_db_conn(&pool)?;
    let user_id = info.user_id;
    web::block(move || {
        diesel::update(profiles::table.filter(profiles::id.eq(user_id)))
            .set(&data)
            .execute(&conn)
    })
    .await
    .context("DB error")?;

    Ok(SimpleResponse::ok())
}

async fn search_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchRequest>,
) -> anyhow::Result<SearchResponse> {
    use crate::schema::profiles;

    let info = info.into_inner();
    let role = info.role.unwrap_or_else(|| "all".to_string());
    if &role != "all" && role != ROLE_STUDENT && !is_provider_role(&role) {
        bail!("Unknown role '{}'", role);
    }

    let name_pattern = crate::utils::get_str_pattern_opt(info.name);
    let no_specialty_filter = info.specialty.is_none();
    let specialty_pattern = crate::utils::get_str_pattern_opt(info.specialty);
    let no_rate_cap = info.max_hourly_rate_cents.is_none();
    let rate_cap = info.max_hourly_rate_cents.unwrap_or(i64::MAX);

    let conn = get_db_conn(&pool)?;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let rows = web::block(move || {
        database::retry_read(|| {
            profiles::table
                .filter(profiles::role.eq(&role).or(&role == "all"))
                .filter(profiles::full_name.like(&name_pattern))
                .filter(
                    profiles::specialty
                        .like(&specialty_pattern)
                        .or(no_specialty_filter),
                )
                .filter(profiles::hourly_rate_cents.le(rate_cap).or(no_rate_cap))
                .order(profiles::full_name.asc())
                .offset(first_index)
                .limit(limit)
                .get_results::<ProfileData>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let profiles = rows
        .into_iter()
        .map(|data| SearchItem {
            user_id: data.id,
            full_name: data.full_name,
            role: data.role,
            specialty: data.specialty.unwrap_or_default(),
            hourly_rate_cents: data.hourly_rate_cents,
            bio: data.bio.unwrap_or_default(),
        })
        .collect();

    Ok(SearchResponse {
        success: true,
        err: "".to_string(),
        profiles,
    })
}
