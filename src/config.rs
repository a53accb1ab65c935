//! Environment-driven configuration.

use anyhow::{bail, Context, Result};
use std::{env, net::SocketAddr, str::FromStr};
use tracing::info;

/// Who may edit or delete a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReviewAccess {
    /// Anyone who knows the id, logged in or not.
    Open,
    /// Only the review's author, as decided by the oso policy.
    OwnerOnly,
}

impl FromStr for ReviewAccess {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(ReviewAccess::Open),
            "owner" => Ok(ReviewAccess::OwnerOnly),
            other => bail!("unknown review access mode `{}`", other),
        }
    }
}

/// How many times a single voter may vote on a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VotePolicy {
    /// Anonymous, unlimited votes.
    Unlimited,
    /// Logged-in users only, one vote per review.
    OncePerUser,
}

impl FromStr for VotePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unlimited" => Ok(VotePolicy::Unlimited),
            "once_per_user" => Ok(VotePolicy::OncePerUser),
            other => bail!("unknown vote policy `{}`", other),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) addr: SocketAddr,
    pub(crate) database_url: String,
    /// Absent means sessions live in process memory.
    pub(crate) redis_url: Option<String>,
    pub(crate) cookie_domain: Option<String>,
    pub(crate) secure_cookies: bool,
    pub(crate) sql_logging: bool,
    pub(crate) review_access: ReviewAccess,
    pub(crate) vote_policy: VotePolicy,
}

impl Config {
    /// Read the configuration from the environment, falling back to development defaults.
    pub(crate) fn from_env() -> Result<Self> {
        Ok(Config {
            addr: try_load("ADDR", "127.0.0.1:5000")?,
            database_url: try_load("DATABASE_URL", "sqlite://reviews.db?mode=rwc")?,
            redis_url: env::var("REDIS_URL").ok(),
            cookie_domain: env::var("DOMAIN")
                .ok()
                .map(|domain| parse_cookie_domain(&domain))
                .transpose()?,
            secure_cookies: try_load("SECURE_COOKIES", "false")?,
            sql_logging: try_load("SQL_LOGGING", "false")?,
            review_access: try_load("REVIEW_ACCESS", "open")?,
            vote_policy: try_load("VOTE_POLICY", "unlimited")?,
        })
    }
}

/// A cookie `Domain` must be a bare host name, or the `Set-Cookie` header cannot be built.
fn parse_cookie_domain(raw: &str) -> Result<String> {
    let valid = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        bail!("invalid value for DOMAIN: `{}` is not a host name", raw);
    }
    Ok(raw.to_owned())
}

fn try_load<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("invalid value for {}", key))
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests() -> Self {
        Config {
            addr: ([127, 0, 0, 1], 0).into(),
            database_url: "sqlite::memory:".into(),
            redis_url: None,
            cookie_domain: None,
            secure_cookies: false,
            sql_logging: false,
            review_access: ReviewAccess::Open,
            vote_policy: VotePolicy::Unlimited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_names() {
        assert_eq!("owner".parse::<ReviewAccess>().unwrap(), ReviewAccess::OwnerOnly);
        assert_eq!("open".parse::<ReviewAccess>().unwrap(), ReviewAccess::Open);
        assert_eq!(
            "once_per_user".parse::<VotePolicy>().unwrap(),
            VotePolicy::OncePerUser
        );
        assert!("sometimes".parse::<VotePolicy>().is_err());
    }

    #[test]
    fn cookie_domains_must_be_host_names() {
        assert_eq!(
            parse_cookie_domain("reviews.example-1.com").unwrap(),
            "reviews.example-1.com"
        );
        assert!(parse_cookie_domain("").is_err());
        assert!(parse_cookie_domain("evil.com; Secure").is_err());
        assert!(parse_cookie_domain("bad\nhost").is_err());
    }

    #[test]
    fn bad_values_name_the_key() {
        let err = try_load::<bool>("REVIEWLY_TEST_UNSET_KEY", "maybe").unwrap_err();
        assert!(format!("{:#}", err).contains("REVIEWLY_TEST_UNSET_KEY"));
    }
}
