// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;
use thiserror::Error;

use crate::error;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("API error: {0}")]
    Api(#[from] Api),
}

#[derive(Error, Debug)]
pub(crate) enum Api {
    #[error("server responded with {status}: {message}")]
    ServerError { status: StatusCode, message: String },
    #[error("server accepted the sign-in but returned no session")]
    MissingSession,
    #[error("the project URL must use http or https, not {0}")]
    UnsupportedScheme(String),
    #[error("could not build a request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Api> for error::Error {
    fn from(value: Api) -> Self {
        Self::Supabase(Error::Api(value))
    }
}

impl From<url::ParseError> for error::Error {
    fn from(value: url::ParseError) -> Self {
        Api::Url(value).into()
    }
}

impl From<reqwest::Error> for error::Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Supabase(Error::Http(value))
    }
}
