// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::debug;

use crate::{
    controller::{Lookup, Navigation},
    error::{self, Result},
};

use super::Context;

/// Show the emergency data behind a QR token.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Continue to the patient's full record once the emergency data is
    /// found. Without a caregiver session, the login page is opened instead.
    #[arg(long)]
    full_record: bool,

    /// The token from the patient's QR code.
    #[clap()]
    token: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: Context) -> Result<()> {
        let controller = ctx.controller(None)?;

        match controller.lookup(&self.token).await {
            Lookup::Found(record) => debug!("Found emergency record {}", record.id),
            // The controller has already warned about the failure.
            Lookup::Failed(e) => {
                debug!("Lookup failed: {:?}", e);
                return Err(error::Error::Command);
            }
            Lookup::Rejected | Lookup::NotFound | Lookup::Superseded => {
                return Err(error::Error::Command)
            }
        }

        if self.full_record {
            match controller.view_full_record().await {
                Navigation::Login(reference) | Navigation::FullRecord(reference) => {
                    debug!("Left the emergency page for {}", reference);
                }
                Navigation::Rejected | Navigation::Superseded => return Err(error::Error::Command),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use super::*;
    use crate::{
        client::{Auth, EmergencyRecord, QrToken, Records, Session, Sessions},
        command::Command as _,
        page::Pages,
        password::RpasswordPrompt,
    };

    struct Unreachable;

    #[async_trait]
    impl Records for Unreachable {
        async fn find_by_token(&self, _token: &QrToken) -> Result<Option<EmergencyRecord>> {
            Err(error::Error::Cancelled)
        }
    }

    #[async_trait]
    impl Sessions for Unreachable {
        async fn current_session(&self) -> Result<Option<Session>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl Auth for Unreachable {
        async fn sign_in(&self, _email: &str, _password: SecretString) -> Result<Session> {
            Err(error::Error::Cancelled)
        }

        async fn sign_out(&self) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn backend_failure_is_reported_once() {
        let ctx = Context {
            backend: Arc::new(Unreachable),
            pages: Pages::default(),
            prompt: Arc::new(RpasswordPrompt),
        };
        let command = Command {
            full_record: false,
            token: "ABC123".to_owned(),
        };

        assert!(matches!(
            command.execute(ctx).await,
            Err(error::Error::Command)
        ));
    }
}
