// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret as _, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client;

use super::model;

/// Treat sessions this close to expiry as already expired.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Used when the auth service doesn't tell us how long a session lasts.
const DEFAULT_LIFETIME_SECONDS: i64 = 3600;

#[derive(Deserialize, Serialize, Clone)]
#[serde(transparent)]
pub(crate) struct Bearer(String);

impl secrecy::CloneableSecret for Bearer {}

impl secrecy::DebugSecret for Bearer {}

impl secrecy::SerializableSecret for Bearer {}

impl secrecy::Zeroize for Bearer {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

fn bearer(token: &secrecy::SecretString) -> Secret<Bearer> {
    Secret::new(Bearer(token.expose_secret().clone()))
}

/// A caregiver session as we cache it between runs.
#[derive(Deserialize, Serialize, Clone)]
pub(crate) struct Data {
    access_token: Secret<Bearer>,
    refresh_token: Option<Secret<Bearer>>,
    expires_at: i64,
    user_id: Uuid,
    email: Option<String>,
}

impl Data {
    pub(super) fn from_grant(grant: &model::Grant, now: DateTime<Utc>) -> Self {
        let expires_at = grant.expires_at.unwrap_or_else(|| {
            now.timestamp() + grant.expires_in.unwrap_or(DEFAULT_LIFETIME_SECONDS)
        });

        Self {
            access_token: bearer(&grant.access_token),
            refresh_token: grant.refresh_token.as_ref().map(bearer),
            expires_at,
            user_id: grant.user.id,
            email: grant.user.email.clone(),
        }
    }

    pub(super) fn access_token(&self) -> &str {
        &self.access_token.expose_secret().0
    }

    pub(super) fn refresh_token(&self) -> Option<&str> {
        self.refresh_token
            .as_ref()
            .map(|token| token.expose_secret().0.as_str())
    }

    pub(super) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() + EXPIRY_MARGIN_SECONDS >= self.expires_at
    }

    pub(super) fn session(&self) -> client::Session {
        client::Session {
            user_id: self.user_id,
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn grant(expires_at: Option<i64>, expires_in: Option<i64>) -> model::Grant {
        model::Grant {
            access_token: secrecy::SecretString::new("access".to_owned()),
            refresh_token: Some(secrecy::SecretString::new("refresh".to_owned())),
            expires_in,
            expires_at,
            user: model::User {
                id: Uuid::nil(),
                email: None,
            },
        }
    }

    #[test]
    fn expiry_from_lifetime() {
        let now = Utc.timestamp_opt(1_000_000, 0).single().unwrap_or_default();
        let data = Data::from_grant(&grant(None, Some(600)), now);

        assert!(!data.is_expired(now));
        assert!(!data.is_expired(now + chrono::Duration::seconds(539)));
        assert!(data.is_expired(now + chrono::Duration::seconds(540)));
    }

    #[test]
    fn explicit_expiry_wins() {
        let now = Utc.timestamp_opt(1_000_000, 0).single().unwrap_or_default();
        let data = Data::from_grant(&grant(Some(1_000_030), Some(3600)), now);

        assert!(data.is_expired(now));
        assert_eq!(data.access_token(), "access");
        assert_eq!(data.refresh_token(), Some("refresh"));
    }

    #[test]
    fn tokens_survive_serialization() -> Result<(), serde_json::Error> {
        let now = Utc.timestamp_opt(1_000_000, 0).single().unwrap_or_default();
        let data = Data::from_grant(&grant(None, None), now);

        let restored: Data = serde_json::from_str(&serde_json::to_string(&data)?)?;
        assert_eq!(restored.access_token(), "access");
        assert_eq!(restored.refresh_token(), Some("refresh"));
        assert_eq!(restored.expires_at, 1_003_600);
        Ok(())
    }
}
