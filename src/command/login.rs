// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::info;

use crate::{
    client::Auth as _,
    error::{self, Result},
    password,
};

use super::Context;

/// Sign in as a caregiver so that full records can be opened.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The caregiver's email address.
    #[arg(long, short, env = "EMERGENCY_QR_EMAIL")]
    email: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: Context) -> Result<()> {
        let password = ctx
            .prompt
            .prompt(password::Request::new(&self.email))
            .await?
            .ok_or(error::Password::NoPrompt)?;

        let session = ctx.backend.sign_in(&self.email, password).await?;
        info!("Signed in as user {}", session.user_id);
        eprintln!(
            "Signed in as {}.",
            session.email.as_deref().unwrap_or(&self.email)
        );
        Ok(())
    }
}
