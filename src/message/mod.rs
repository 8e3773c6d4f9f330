mod requests;
mod responses;

use crate::{
    database::{self, assert, get_db_conn},
    models::{
        conversations::{
            ConversationData, ConversationMemberData, NewConversation, NewConversationMember,
        },
        messages::{MessageData, NewMessage},
        notifications::KIND_MESSAGE,
        profiles::ProfileData,
    },
    notification,
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::Utc;
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(start_conversation)
        .service(send)
        .service(search_conversations)
        .service(search_messages)
        .service(mark_read)
        .service(unread_count);
}

crate::post_funcs! {
    (start_conversation, "/start_conversation", StartConversationRequest, StartConversationResponse),
    (send, "/send", SendMessageRequest, SimpleResponse),
    (search_conversations, "/search_conversations", SearchConversationsRequest, SearchConversationsResponse),
    (search_messages, "/search_messages", SearchMessagesRequest, SearchMessagesResponse),
    (mark_read, "/mark_read", MarkReadRequest, SimpleResponse),
    (unread_count, "/unread_count", UnreadCountRequest, UnreadCountResponse),
}

async fn start_conversation_impl(
    pool: web::Data<DbPool>,
    info: web::Json<StartConversationRequest>,
) -> anyhow::Result<StartConversationResponse> {
    use crate::schema::{conversation_members, conversations};

    let info = info.into_inner();
    if info.user_id == info.other_id {
        bail!("Cannot start a conversation with yourself");
    }
    assert::assert_profile(&pool, info.user_id.clone()).await?;
    assert::assert_profile(&pool, info.other_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let now = Utc::now().naive_utc();
    let conversation_id = web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let my_convs = conversation_members::table
                .filter(conversation_members::user_id.eq(&info.user_id))
                .select(conversation_members::conversation_id)
                .get_results::<i64>(&conn)
                .context("DB error")?;

            if !my_convs.is_empty() {
                let existing = conversation_members::table
                    .filter(conversation_members::conversation_id.eq_any(&my_convs))
                    .filter(conversation_members::user_id.eq(&info.other_id))
                    .select(conversation_members::conversation_id)
                    .limit(1)
                    .get_result::<i64>(&conn)
                    .optional()
                    .context("DB error")?;
                if let Some(existing) = existing {
                    return Ok(existing);
                }
            }

            let conversation = diesel::insert_into(conversations::table)
                .values(NewConversation {
                    last_message_at: now,
                })
                .get_result::<ConversationData>(&conn)
                .context("DB error")?;

            let members = vec![
                NewConversationMember {
                    conversation_id: conversation.id,
                    user_id: info.user_id.clone(),
                    last_read_at: now,
                },
                NewConversationMember {
                    conversation_id: conversation.id,
                    user_id: info.other_id.clone(),
                    last_read_at: now,
                },
            ];
            diesel::insert_into(conversation_members::table)
                .values(&members)
                .execute(&conn)
                .context("DB error")?;

            Ok(conversation.id)
        })
    })
    .await?;

    Ok(StartConversationResponse {
        success: true,
        err: "".to_string(),
        conversation_id,
    })
}

async fn send_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SendMessageRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{conversation_members, conversations, messages};

    let info = info.into_inner();
    if info.body.trim().is_empty() {
        bail!("Message body is empty");
    }
    assert::assert_conversation_member(&pool, info.conversation_id, info.sender_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let now = Utc::now().naive_utc();
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            let data = NewMessage {
                conversation_id: info.conversation_id,
                sender_id: info.sender_id.clone(),
                body: info.body.clone(),
                is_read: false,
            };
            diesel::insert_into(messages::table)
                .values(data)
                .execute(&conn)
                .context("DB error")?;

            diesel::update(
                conversations::table.filter(conversations::id.eq(info.conversation_id)),
            )
            .set(conversations::last_message_at.eq(now))
            .execute(&conn)
            .context("DB error")?;

            let counterpart = conversation_members::table
                .filter(conversation_members::conversation_id.eq(info.conversation_id))
                .filter(conversation_members::user_id.ne(&info.sender_id))
                .select(conversation_members::user_id)
                .limit(1)
                .get_result::<String>(&conn)
                .optional()
                .context("DB error")?;
            if let Some(counterpart) = counterpart {
                notification::push(&conn, &counterpart, KIND_MESSAGE, "New message")
                    .context("DB error")?;
            }

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn search_conversations_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchConversationsRequest>,
) -> anyhow::Result<SearchConversationsResponse> {
    use crate::schema::{conversation_members, conversations, messages, profiles};

    let info = info.into_inner();
    assert::assert_profile(&pool, info.user_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let user_id = info.user_id.clone();
    let mut rows = web::block(move || {
        database::retry_read(|| {
            let memberships = conversation_members::table
                .filter(conversation_members::user_id.eq(&user_id))
                .get_results::<ConversationMemberData>(&conn)?;

            let mut rows = Vec::with_capacity(memberships.len());
            for membership in &memberships {
                let conversation = conversations::table
                    .filter(conversations::id.eq(membership.conversation_id))
                    .get_result::<ConversationData>(&conn)?;
                let counterpart = conversation_members::table
                    .filter(conversation_members::conversation_id.eq(membership.conversation_id))
                    .filter(conversation_members::user_id.ne(&user_id))
                    .inner_join(profiles::table.on(conversation_members::user_id.eq(profiles::id)))
                    .limit(1)
                    .get_result::<(ConversationMemberData, ProfileData)>(&conn)
                    .optional()?;
                let last = messages::table
                    .filter(messages::conversation_id.eq(membership.conversation_id))
                    .order(messages::created_at.desc())
                    .limit(1)
                    .get_result::<MessageData>(&conn)
                    .optional()?;
                rows.push((conversation, counterpart, membership.last_read_at, last));
            }
            Ok(rows)
        })
    })
    .await
    .context("DB error")?;

    rows.sort_by(|a, b| b.0.last_message_at.cmp(&a.0.last_message_at));

    let conversations = rows
        .into_iter()
        .filter_map(|(conversation, counterpart, last_read_at, last)| {
            let (_, other) = counterpart?;
            let unread = last
                .as_ref()
                .map_or(false, |msg| msg.sender_id != info.user_id && msg.created_at > last_read_at);
            Some(SearchConversationsItem {
                conversation_id: conversation.id,
                other_id: other.id,
                other_name: other.full_name,
                last_message: last.map(|msg| msg.body).unwrap_or_default(),
                last_message_at: crate::utils::format_time_str(&conversation.last_message_at),
                unread,
            })
        })
        .collect();

    Ok(SearchConversationsResponse {
        success: true,
        err: "".to_string(),
        conversations,
    })
}

async fn search_messages_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchMessagesRequest>,
) -> anyhow::Result<SearchMessagesResponse> {
    use crate::schema::{messages, profiles};

    let info = info.into_inner();
    assert::assert_conversation_member(&pool, info.conversation_id, info.user_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(100).max(0);
    let rows = web::block(move || {
        database::retry_read(|| {
            messages::table
                .filter(messages::conversation_id.eq(info.conversation_id))
                .inner_join(profiles::table.on(messages::sender_id.eq(profiles::id)))
                .order(messages::created_at.asc())
                .offset(first_index)
                .limit(limit)
                .get_results::<(MessageData, ProfileData)>(&conn)
        })
    })
    .await
    .context("DB error")?;

    let messages = rows
        .into_iter()
        .map(|(data, sender)| SearchMessagesItem {
            id: data.id,
            sender_id: sender.id,
            sender_name: sender.full_name,
            body: data.body,
            is_read: data.is_read,
            created_at: crate::utils::format_time_str(&data.created_at),
        })
        .collect();

    Ok(SearchMessagesResponse {
        success: true,
        err: "".to_string(),
        messages,
    })
}

async fn mark_read_impl(
    pool: web::Data<DbPool>,
    info: web::Json<MarkReadRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{conversation_members, messages};

    let info = info.into_inner();
    assert::assert_conversation_member(&pool, info.conversation_id, info.user_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let now = Utc::now().naive_utc();
    web::block(move || {
        conn.transaction::<_, anyhow::Error, _>(|| {
            diesel::update(
                messages::table
                    .filter(messages::conversation_id.eq(info.conversation_id))
                    .filter(messages::sender_id.ne(&info.user_id))
                    .filter(messages::is_read.eq(false)),
            )
            .set(messages::is_read.eq(true))
            .execute(&conn)
            .context("DB error")?;

            diesel::update(
                conversation_members::table
                    .filter(conversation_members::conversation_id.eq(info.conversation_id))
                    .filter(conversation_members::user_id.eq(&info.user_id)),
            )
            .set(conversation_members::last_read_at.eq(now))
            .execute(&conn)
            .context("DB error")?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn unread_count_impl(
    pool: web::Data<DbPool>,
    info: web::Json<UnreadCountRequest>,
) -> anyhow::Result<UnreadCountResponse> {
    use crate::schema::{conversation_members, messages};

    let info = info.into_inner();
    assert::assert_profile(&pool, info.user_id.clone()).await?;

    let conn = get_db_conn(&pool)?;
    let user_id = info.user_id;
    let count = web::block(move || {
        database::retry_read(|| {
            let my_convs = conversation_members::table
                .filter(conversation_members::user_id.eq(&user_id))
                .select(conversation_members::conversation_id)
                .get_results::<i64>(&conn)?;
            if my_convs.is_empty() {
                return Ok(0);
            }

            messages::table
                .filter(messages::conversation_id.eq_any(&my_convs))
                .filter(messages::sender_id.ne(&user_id))
                .filter(messages::is_read.eq(false))
                .count()
                .get_result::<i64>(&conn)
        })
    })
    .await
    .context("DB error")?;

    Ok(UnreadCountResponse {
        success: true,
        err: "".to_string(),
        count,
    })
}
