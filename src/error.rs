// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;

use crate::supabase;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("backend error: {0}")]
    Supabase(#[from] supabase::error::Error),
    #[error("page error: {0}")]
    Page(#[from] Page),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("command execution failed")]
    Command,
    #[error("operation cancelled")]
    Cancelled,
}

impl From<pinentry::Error> for Error {
    fn from(value: pinentry::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(
            clippy::wildcard_enum_match_arm,
            clippy::match_wildcard_for_single_variants
        )]
        match value {
            pinentry::Error::Cancelled | pinentry::Error::Timeout => Self::Cancelled,
            pinentry::Error::Io(e) => Self::Io(e),
            _ => Self::Password(Password::Pinentry(value)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

/// Problems with a user action that are reported back to the user inline.
/// These never abort the page session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Validation {
    #[error("Please enter a QR token.")]
    TokenRequired,
    #[error("Load emergency data first.")]
    NoRecordLoaded,
}

#[derive(Error, Debug)]
pub(crate) enum Page {
    #[error("missing required page capabilities: {}", .0.join(", "))]
    MissingCapabilities(Vec<&'static str>),
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("no password prompt available")]
    NoPrompt,
    #[error("Pinentry implementation error: {0}")]
    Pinentry(pinentry::Error),
}
