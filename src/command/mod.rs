// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    client::Backend,
    controller::Controller,
    error::Result,
    page::{Page, Pages, Terminal},
    password,
};

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod lookup;
pub(crate) mod session;

pub(crate) struct Context {
    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) pages: Pages,
    pub(crate) prompt: Arc<dyn password::Prompt>,
}

impl Context {
    fn controller(
        &self,
        hint: Option<&'static str>,
    ) -> Result<Controller<Arc<dyn Backend>, Arc<dyn Backend>>> {
        let terminal = Arc::new(Terminal::new(hint));
        let page = Page::builder(self.pages.clone())
            .with_all(&terminal)
            .build()?;
        Ok(Controller::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.backend),
            page,
        ))
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: Context) -> Result<()>;
}
