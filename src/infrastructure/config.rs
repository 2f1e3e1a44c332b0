use std::env;

/// Runtime configuration, read once at startup from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    /// Prebuilt frontend bundle served as the router fallback
    pub static_dir: String,
    pub jwt_ttl_hours: i64,
    /// Usage percentage at which a limit warning is sent
    pub limit_warning_percent: f64,
    /// 0 disables the background regular payment runner
    pub regular_payment_interval_secs: u64,
    pub seed_demo: bool,
    /// `JWT_SECRET`; only debug builds may run without one
    pub jwt_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::for_profile(env::var("PROFILE").ok())
    }

    /// Same as `from_env`, with the profile given on the command line
    pub fn for_profile(profile: Option<String>) -> Self {
        let profile = profile
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://family_budget.db?mode=rwc".to_string()
            } else {
                format!("sqlite://family_budget_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            port: parse_var("PORT", 8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            profile,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            jwt_ttl_hours: parse_var("JWT_TTL_HOURS", 24),
            limit_warning_percent: parse_var("LIMIT_WARNING_PERCENT", 80.0),
            regular_payment_interval_secs: parse_var("REGULAR_PAYMENT_INTERVAL_SECS", 3600),
            seed_demo: env::var("SEED_DEMO").is_ok(),
            jwt_secret: env::var("JWT_SECRET").ok(),
        }
    }

    /// Service-level settings carried in the application state
    pub fn settings(&self) -> super::state::Settings {
        super::state::Settings {
            jwt_ttl_hours: self.jwt_ttl_hours,
            limit_warning_percent: self.limit_warning_percent,
        }
    }

    /// Signing secret for tokens, checked before the server starts
    pub fn signing_secret(&self) -> Result<String, String> {
        resolve_secret(self.jwt_secret.clone(), cfg!(debug_assertions))
    }
}

fn resolve_secret(secret: Option<String>, allow_dev_secret: bool) -> Result<String, String> {
    match secret.filter(|s| !s.trim().is_empty()) {
        Some(secret) => Ok(secret),
        None if allow_dev_secret => {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            Ok(super::auth::DEV_JWT_SECRET.to_string())
        }
        None => Err("JWT_SECRET environment variable must be set in production".to_string()),
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_secret_wins() {
        assert_eq!(resolve_secret(Some("s3cret".into()), false).unwrap(), "s3cret");
    }

    #[test]
    fn release_build_without_secret_fails() {
        assert!(resolve_secret(None, false).is_err());
        assert!(resolve_secret(Some("  ".into()), false).is_err());
    }

    #[test]
    fn debug_build_falls_back_to_dev_secret() {
        assert_eq!(
            resolve_secret(None, true).unwrap(),
            crate::infrastructure::auth::DEV_JWT_SECRET
        );
    }
}
