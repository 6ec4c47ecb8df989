use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

fn parsed_var<T>(name: &str, default: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|e| panic!("{name} must be numeric: {e:?}"))
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: parsed_var("ACCESS_TOKEN_TTL", "900"), // 15 min
            refresh_token_ttl: parsed_var("REFRESH_TOKEN_TTL", "604800"), // 7 days

            rate_login_per_min: parsed_var("RATE_LOGIN_PER_MIN", "60"),
            rate_register_per_min: parsed_var("RATE_REGISTER_PER_MIN", "30"),
            rate_refresh_per_min: parsed_var("RATE_REFRESH_PER_MIN", "30"),
            rate_protected_per_min: parsed_var("RATE_PROTECTED_PER_MIN", "1000"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
