use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub hourly_rate_cents: Option<i64>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct ViewRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct ModifyRequest {
    pub user_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub hourly_rate_cents: Option<i64>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub role: Option<String>,
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub max_hourly_rate_cents: Option<i64>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}
