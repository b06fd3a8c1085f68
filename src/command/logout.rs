// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{client::Auth as _, error::Result};

use super::Context;

/// End the caregiver session and forget it locally.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: Context) -> Result<()> {
        if ctx.backend.sign_out().await? {
            eprintln!("Signed out.");
        } else {
            eprintln!("No caregiver is signed in.");
        }
        Ok(())
    }
}
