// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::debug;
use tokio::io::{self, AsyncBufReadExt as _, BufReader};
use tokio_stream::{wrappers::LinesStream, StreamExt as _};

use crate::error::Result;

use super::Context;

const USAGE: &str = "Actions: `lookup <token>`, `full-record`, `quit`";

/// Keep an emergency page open, reading actions from standard input until
/// the caregiver leaves for another page.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[derive(Debug, PartialEq, Eq)]
enum Action<'line> {
    Lookup(&'line str),
    FullRecord,
    Quit,
    Nothing,
}

impl<'line> Action<'line> {
    fn parse(line: &'line str) -> Option<Self> {
        let line = line.trim_start();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));

        match word {
            "" => Some(Self::Nothing),
            "lookup" => Some(Self::Lookup(rest)),
            "full-record" | "view" if rest.trim().is_empty() => Some(Self::FullRecord),
            "quit" | "exit" if rest.trim().is_empty() => Some(Self::Quit),
            _ => None,
        }
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: Context) -> Result<()> {
        let controller =
            ctx.controller(Some("Enter `full-record` to open the patient's complete record."))?;
        eprintln!("{USAGE}");

        let mut lines = LinesStream::new(BufReader::new(io::stdin()).lines());
        while let Some(line) = lines.next().await {
            let line = line?;
            match Action::parse(&line) {
                Some(Action::Nothing) => {}
                // The page already shows the outcome.
                Some(Action::Lookup(token)) => _ = controller.lookup(token).await,
                Some(Action::FullRecord) => {
                    _ = controller.view_full_record().await;
                    if controller.phase().await.is_terminal() {
                        break;
                    }
                }
                Some(Action::Quit) => break,
                None => eprintln!("Unrecognized action {:?}. {USAGE}", line.trim()),
            }
        }

        debug!("Page session ended in {:?}", controller.phase().await);
        Ok(())
    }
}
