// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod api;
pub(crate) mod error;
mod model;
pub(crate) mod session;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use futures_util::lock::Mutex;
use log::{debug, info, warn};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use url::Url;

use crate::{
    client::{self, EmergencyRecord, QrToken},
    error::Result,
    metadata,
    storage::{self, IsPersistent as _},
};

use api::Executor as _;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the hosted project lives and the public key that identifies us to
/// it.
pub(crate) struct Config {
    url: Url,
    anon_key: SecretString,
}

impl Config {
    pub(crate) fn new(mut url: Url, anon_key: SecretString) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(error::Api::UnsupportedScheme(url.scheme().to_owned()).into());
        }

        // Relative joins only append to the path if it ends in a slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { url, anon_key })
    }
}

pub(crate) struct Client<Storage: storage::Storage<session::Data>> {
    http: reqwest::Client,
    config: Config,
    storage: Arc<Mutex<Storage>>,
}

impl<Storage: storage::Storage<session::Data>> Client<Storage> {
    pub(crate) fn new(config: Config, storage: Arc<Mutex<Storage>>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(metadata::USER_AGENT.as_str())
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            config,
            storage,
        })
    }

    fn endpoint<'client>(&'client self, bearer: Option<&'client str>) -> api::Endpoint<'client> {
        api::Endpoint {
            http: &self.http,
            base: &self.config.url,
            anon_key: &self.config.anon_key,
            bearer,
        }
    }
}

#[async_trait]
impl<Storage: storage::Storage<session::Data>> client::Records for Client<Storage> {
    async fn find_by_token(&self, token: &QrToken) -> Result<Option<EmergencyRecord>> {
        api::SelectEmergencyRecord { token }
            .execute(&self.endpoint(None))
            .await
    }
}

#[async_trait]
impl<Storage: storage::Storage<session::Data>> client::Sessions for Client<Storage> {
    async fn current_session(&self) -> Result<Option<client::Session>> {
        let mut storage = self.storage.lock().await;
        let Some(data) = storage.get().await? else {
            return Ok(None);
        };

        if !data.is_expired(Utc::now()) {
            return Ok(Some(data.session()));
        }

        let Some(refresh_token) = data.refresh_token() else {
            debug!("Cached session expired and cannot be refreshed");
            storage.clear().await?;
            return Ok(None);
        };

        info!("Refreshing expired caregiver session");
        match (api::RefreshGrant { refresh_token })
            .execute(&self.endpoint(None))
            .await?
        {
            Some(grant) => {
                let refreshed = session::Data::from_grant(&grant, Utc::now());
                storage.update(&refreshed).await?;
                Ok(Some(refreshed.session()))
            }
            None => {
                warn!("The auth service rejected our refresh token; the caregiver must sign in again");
                storage.clear().await?;
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<Storage: storage::Storage<session::Data>> client::Auth for Client<Storage> {
    async fn sign_in(&self, email: &str, password: SecretString) -> Result<client::Session> {
        let grant = api::PasswordGrant { email, password }
            .execute(&self.endpoint(None))
            .await?
            .ok_or(error::Api::MissingSession)?;

        let data = session::Data::from_grant(&grant, Utc::now());
        let mut storage = self.storage.lock().await;
        storage.update(&data).await?;
        if !storage.is_persistent() {
            warn!("The caregiver session will only last as long as this process");
        }

        Ok(data.session())
    }

    async fn sign_out(&self) -> Result<bool> {
        let mut storage = self.storage.lock().await;
        let Some(data) = storage.get().await? else {
            return Ok(false);
        };

        // Whatever the server says, forget the session locally.
        let resp = self
            .endpoint(Some(data.access_token()))
            .request(Method::POST, "auth/v1/logout")?
            .send()
            .await;
        match resp {
            Ok(resp)
                if resp.status().is_success()
                    || matches!(
                        resp.status(),
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                    ) => {}
            Ok(resp) => warn!(
                "The auth service did not end the session ({}); it will expire on its own",
                resp.status()
            ),
            Err(e) => warn!("Could not reach the auth service to end the session: {}", e),
        }

        storage.clear().await?;
        Ok(true)
    }
}
