// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::Result;

/// The token printed in a patient's emergency QR code. The only constraint we
/// place on it is that it has some content once surrounding whitespace is
/// removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct QrToken(String);

impl QrToken {
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subset of a patient record that is made available to anyone holding
/// the patient's QR token.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub(crate) struct EmergencyRecord {
    #[serde(rename = "patient_id", deserialize_with = "deserialize_identifier")]
    pub(crate) id: String,
    #[serde(default, deserialize_with = "deserialize_name")]
    pub(crate) first_name: String,
    #[serde(default, deserialize_with = "deserialize_name")]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) blood_type: Option<String>,
    #[serde(default)]
    pub(crate) allergies: Option<String>,
    #[serde(default)]
    pub(crate) chronic_conditions: Option<String>,
    #[serde(default)]
    pub(crate) emergency_notes: Option<String>,
}

// Depending on how the table was created, identifiers come back as either
// text (including UUIDs) or integers.
fn deserialize_identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identifier {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match Identifier::deserialize(deserializer)? {
        Identifier::Text(s) => s,
        Identifier::Signed(n) => n.to_string(),
        Identifier::Unsigned(n) => n.to_string(),
    })
}

// A missing name is shown like any other missing field rather than hiding the
// whole record.
fn deserialize_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// An authenticated caregiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) user_id: Uuid,
    pub(crate) email: Option<String>,
}

#[async_trait]
pub(crate) trait Records {
    /// Finds the single record whose QR token is exactly `token`.
    async fn find_by_token(&self, token: &QrToken) -> Result<Option<EmergencyRecord>>;
}

#[async_trait]
pub(crate) trait Sessions {
    async fn current_session(&self) -> Result<Option<Session>>;
}

#[async_trait]
pub(crate) trait Auth {
    async fn sign_in(&self, email: &str, password: SecretString) -> Result<Session>;

    /// Returns whether there was a session to end.
    async fn sign_out(&self) -> Result<bool>;
}

pub(crate) trait Backend: Records + Sessions + Auth + Send + Sync {}

impl<T: Records + Sessions + Auth + Send + Sync> Backend for T {}

#[async_trait]
impl<T: Records + Send + Sync + ?Sized> Records for Arc<T> {
    async fn find_by_token(&self, token: &QrToken) -> Result<Option<EmergencyRecord>> {
        (**self).find_by_token(token).await
    }
}

#[async_trait]
impl<T: Sessions + Send + Sync + ?Sized> Sessions for Arc<T> {
    async fn current_session(&self) -> Result<Option<Session>> {
        (**self).current_session().await
    }
}

#[async_trait]
impl<T: Auth + Send + Sync + ?Sized> Auth for Arc<T> {
    async fn sign_in(&self, email: &str, password: SecretString) -> Result<Session> {
        (**self).sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<bool> {
        (**self).sign_out().await
    }
}
