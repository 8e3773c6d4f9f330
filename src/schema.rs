table! {
    availability_slots (id) {
        id -> BigInt,
        provider_id -> Varchar,
        start_time -> Timestamp,
        end_time -> Timestamp,
        is_booked -> Bool,
    }
}

table! {
    bookings (id) {
        id -> BigInt,
        student_id -> Varchar,
        provider_id -> Varchar,
        status -> Varchar,
        scheduled_start -> Timestamp,
        scheduled_end -> Timestamp,
        price_cents -> BigInt,
        notes -> Nullable<Varchar>,
        created_at -> Timestamp,
    }
}

table! {
    connection_requests (id) {
        id -> BigInt,
        requester_id -> Varchar,
        receiver_id -> Varchar,
        status -> Varchar,
        created_at -> Timestamp,
    }
}

table! {
    connections (id) {
        id -> BigInt,
        user_a -> Varchar,
        user_b -> Varchar,
        created_at -> Timestamp,
    }
}

table! {
    conversation_members (conversation_id, user_id) {
        conversation_id -> BigInt,
        user_id -> Varchar,
        last_read_at -> Timestamp,
    }
}

table! {
    conversations (id) {
        id -> BigInt,
        created_at -> Timestamp,
        last_message_at -> Timestamp,
    }
}

table! {
    messages (id) {
        id -> BigInt,
        conversation_id -> BigInt,
        sender_id -> Varchar,
        body -> Varchar,
        is_read -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    notifications (id) {
        id -> BigInt,
        user_id -> Varchar,
        kind -> Varchar,
        title -> Varchar,
        is_read -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    profiles (id) {
        id -> Varchar,
        full_name -> Varchar,
        email -> Varchar,
        role -> Varchar,
        specialty -> Nullable<Varchar>,
        hourly_rate_cents -> Nullable<BigInt>,
        bio -> Nullable<Varchar>,
        created_at -> Timestamp,
    }
}

table! {
    reviews (id) {
        id -> BigInt,
        booking_id -> BigInt,
        reviewer_id -> Varchar,
        reviewee_id -> Varchar,
        rating -> Integer,
        comment -> Nullable<Varchar>,
        created_at -> Timestamp,
    }
}

allow_tables_to_appear_in_same_query!(
    availability_slots,
    bookings,
    connection_requests,
    connections,
    conversation_members,
    conversations,
    messages,
    notifications,
    profiles,
    reviews,
);
