// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::debug;
use reqwest::{header, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::{
    client::{EmergencyRecord, QrToken},
    error::Result,
};

use super::{error, model};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Everything needed to address the hosted project on behalf of either the
/// anonymous role or a signed-in caregiver.
pub(super) struct Endpoint<'client> {
    pub(super) http: &'client reqwest::Client,
    pub(super) base: &'client Url,
    pub(super) anon_key: &'client SecretString,
    pub(super) bearer: Option<&'client str>,
}

impl Endpoint<'_> {
    pub(super) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base.join(path)?;
        let anon_key = self.anon_key.expose_secret();
        debug!("{} {}", method, url);

        Ok(self
            .http
            .request(method, url)
            .header("apikey", anon_key.as_str())
            .bearer_auth(self.bearer.unwrap_or(anon_key.as_str())))
    }
}

#[async_trait]
pub(super) trait Executor: Sized + Send {
    type Response: DeserializeOwned + Send;

    fn build(self, endpoint: &Endpoint<'_>) -> Result<RequestBuilder>;

    /// Whether a response with this status means there is simply nothing to
    /// return.
    fn is_absent(_status: StatusCode) -> bool {
        false
    }

    async fn execute(self, endpoint: &Endpoint<'_>) -> Result<Option<Self::Response>> {
        let resp = self.build(endpoint)?.send().await?;
        let status = resp.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            Ok(Some(resp.json().await?))
        } else if Self::is_absent(status) {
            Ok(None)
        } else {
            let body = resp.text().await?;
            Err(error::Api::ServerError {
                status,
                message: model::describe_error(&body),
            }
            .into())
        }
    }
}

pub(super) struct SelectEmergencyRecord<'token> {
    pub(super) token: &'token QrToken,
}

impl Executor for SelectEmergencyRecord<'_> {
    type Response = EmergencyRecord;

    fn build(self, endpoint: &Endpoint<'_>) -> Result<RequestBuilder> {
        let filter = format!("eq.{}", self.token.as_str());
        Ok(endpoint
            .request(Method::GET, "rest/v1/patients")?
            .header(header::ACCEPT, SINGLE_OBJECT)
            .query(&[
                ("select", model::EMERGENCY_COLUMNS),
                ("qr_token", filter.as_str()),
            ]))
    }

    // Asking for a single object makes the server reject both zero and
    // multiple matches with 406.
    fn is_absent(status: StatusCode) -> bool {
        status == StatusCode::NOT_ACCEPTABLE
    }
}

pub(super) struct PasswordGrant<'email> {
    pub(super) email: &'email str,
    pub(super) password: SecretString,
}

impl Executor for PasswordGrant<'_> {
    type Response = model::Grant;

    fn build(self, endpoint: &Endpoint<'_>) -> Result<RequestBuilder> {
        Ok(endpoint
            .request(Method::POST, "auth/v1/token")?
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": self.email,
                "password": self.password.expose_secret(),
            })))
    }
}

pub(super) struct RefreshGrant<'token> {
    pub(super) refresh_token: &'token str,
}

impl Executor for RefreshGrant<'_> {
    type Response = model::Grant;

    fn build(self, endpoint: &Endpoint<'_>) -> Result<RequestBuilder> {
        Ok(endpoint
            .request(Method::POST, "auth/v1/token")?
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": self.refresh_token })))
    }

    // The refresh token was revoked, already used, or belongs to a deleted
    // user.
    fn is_absent(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        )
    }
}
