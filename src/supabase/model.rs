// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use secrecy::SecretString;
use serde::Deserialize;
use uuid::Uuid;

/// The columns we are allowed to read without a caregiver session.
pub(super) const EMERGENCY_COLUMNS: &str =
    "patient_id,first_name,last_name,blood_type,allergies,chronic_conditions,emergency_notes";

#[derive(Debug, Deserialize)]
pub(super) struct User {
    pub(super) id: Uuid,
    #[serde(default)]
    pub(super) email: Option<String>,
}

/// A session handed out by the auth service for a password or refresh token
/// grant.
#[derive(Debug, Deserialize)]
pub(super) struct Grant {
    pub(super) access_token: SecretString,
    #[serde(default)]
    pub(super) refresh_token: Option<SecretString>,
    #[serde(default)]
    pub(super) expires_in: Option<i64>,
    #[serde(default)]
    pub(super) expires_at: Option<i64>,
    pub(super) user: User,
}

/// The union of the error shapes used by the REST and auth services.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    code: Option<serde_json::Value>,
}

pub(super) fn describe_error(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error);

    match (message, parsed.code) {
        (Some(message), Some(serde_json::Value::String(code))) => format!("{message} ({code})"),
        (Some(message), _) => message,
        (None, _) if body.trim().is_empty() => "no details given".to_owned(),
        (None, _) => body.trim().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret as _;

    use super::*;

    #[test]
    fn rest_error() {
        assert_eq!(
            describe_error(
                r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#
            ),
            "JSON object requested, multiple (or no) rows returned (PGRST116)"
        );
    }

    #[test]
    fn auth_errors() {
        assert_eq!(
            describe_error(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            describe_error(r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
    }

    #[test]
    fn unstructured_error() {
        assert_eq!(describe_error("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(describe_error(""), "no details given");
    }

    #[test]
    fn grant() -> Result<(), serde_json::Error> {
        let grant: Grant = serde_json::from_str(
            r#"{
                "access_token": "eyJ.access",
                "token_type": "bearer",
                "expires_in": 3600,
                "expires_at": 1700003600,
                "refresh_token": "r3fr3sh",
                "user": {"id": "6f1c9f8e-3c1e-4d8e-9a7d-1b2c3d4e5f60", "email": "nurse@example.org"}
            }"#,
        )?;
        assert_eq!(grant.access_token.expose_secret(), "eyJ.access");
        assert_eq!(grant.expires_at, Some(1_700_003_600));
        assert_eq!(grant.user.email.as_deref(), Some("nurse@example.org"));
        Ok(())
    }
}
