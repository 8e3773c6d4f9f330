use actix_web::web;
use anyhow::{bail, Context};
use diesel::prelude::*;

use crate::{
    database::get_db_conn,
    models::profiles::{ROLE_COUNSELOR, ROLE_TUTOR},
    DbPool,
};

pub async fn assert_profile(pool: &web::Data<DbPool>, id: String) -> anyhow::Result<()> {
    use crate::schema::profiles;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        profiles::table
            .filter(profiles::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        bail!("No such user");
    }

    Ok(())
}

pub async fn assert_student(pool: &web::Data<DbPool>, id: String) -> anyhow::Result<()> {
    use crate::schema::profiles;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        profiles::table
            .filter(profiles::id.eq(id))
            .filter(profiles::role.eq(crate::models::profiles::ROLE_STUDENT))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        bail!("No such student");
    }

    Ok(())
}

pub async fn assert_provider(pool: &web::Data<DbPool>, id: String) -> anyhow::Result<()> {
    use crate::schema::profiles;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        profiles::table
            .filter(profiles::id.eq(id))
            .filter(profiles::role.eq_any(vec![ROLE_TUTOR, ROLE_COUNSELOR]))
            .filter(profiles::hourly_rate_cents.is_not_null())
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        bail!("No such provider");
    }

    Ok(())
}

pub async fn assert_booking(pool: &web::Data<DbPool>, id: i64) -> anyhow::Result<()> {
    use crate::schema::bookings;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        bookings::table
            .filter(bookings::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        bail!("No such booking");
    }

    Ok(())
}

pub async fn assert_conversation_member(
    pool: &web::Data<DbPool>,
    conversation_id: i64,
    user_id: String,
) -> anyhow::Result<()> {
    use crate::schema::conversation_members;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        conversation_members::table
            .filter(conversation_members::conversation_id.eq(conversation_id))
            .filter(conversation_members::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("DB error")?;

    if res == 0 {
        bail!("Not a member of this conversation");
    }

    Ok(())
}
