// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{ffi::OsString, path::Path};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task;

use crate::{error::Result, metadata};

#[derive(Debug, Clone)]
pub(crate) struct Request {
    email: String,
}

impl Request {
    pub(crate) fn new(email: &str) -> Self {
        Self {
            email: email.to_owned(),
        }
    }

    fn description(&self) -> String {
        format!("Enter the caregiver password for {}.", self.email)
    }
}

#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>>;
}

#[async_trait]
impl<T: Prompt + ?Sized> Prompt for Box<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        (**self).prompt(req).await
    }
}

#[async_trait]
impl<T: Prompt> Prompt for Vec<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        for candidate in self {
            if let r @ (Ok(Some(_)) | Err(_)) = candidate.prompt(req.clone()).await {
                return r;
            }
        }

        Ok(None)
    }
}

pub(crate) struct PinentryPrompt {
    executable: Option<OsString>,
}

impl PinentryPrompt {
    pub(crate) const fn new() -> Self {
        Self { executable: None }
    }

    pub(crate) fn new_with_executable<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: Some(executable.as_ref().as_os_str().into()),
        }
    }
}

#[async_trait]
impl Prompt for PinentryPrompt {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        fn interact<'input>(
            mut input: pinentry::PassphraseInput<'input>,
            title: &'input str,
            description: &'input str,
        ) -> Result<SecretString> {
            _ = input.required("A password is required to sign in.");
            _ = input.with_title(title);
            _ = input.with_description(description);
            _ = input.with_prompt("Password");

            Ok(input.interact()?)
        }

        let title = format!("Sign In - {}", *metadata::CLIENT_DISPLAY_NAME);
        let description = req.description();

        let input = self
            .executable
            .as_ref()
            .and_then(pinentry::PassphraseInput::with_binary)
            .or_else(pinentry::PassphraseInput::with_default_binary)
            .map(|input| task::spawn_blocking(move || interact(input, &title, &description)));

        Ok(match input {
            Some(fut) => Some(fut.await??),
            None => None,
        })
    }
}

pub(crate) struct RpasswordPrompt;

#[async_trait]
impl Prompt for RpasswordPrompt {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        eprintln!("{}", req.description());

        Ok(Some(
            task::spawn_blocking(|| {
                rpassword::prompt_password("Password: ").map(SecretString::new)
            })
            .await??,
        ))
    }
}
