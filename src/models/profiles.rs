use crate::schema::profiles;
use chrono::NaiveDateTime;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_TUTOR: &str = "tutor";
pub const ROLE_COUNSELOR: &str = "counselor";

pub fn is_provider_role(role: &str) -> bool {
    role == ROLE_TUTOR || role == ROLE_COUNSELOR
}

#[derive(Queryable, Clone)]
pub struct ProfileData {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub specialty: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub bio: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "profiles"]
pub struct NewProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub specialty: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub bio: Option<String>,
}

#[derive(AsChangeset, Default)]
#[table_name = "profiles"]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub bio: Option<String>,
}
