// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod client;
mod command;
mod controller;
mod error;
mod metadata;
mod page;
mod password;
mod storage;
mod supabase;

use std::{path::PathBuf, process, sync::Arc};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use error::Result;
use futures_util::lock::Mutex;
use log::{error, warn};
use secrecy::SecretString;
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Lookup(command::lookup::Command),
    Session(command::session::Command),
    Login(command::login::Command),
    Logout(command::logout::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, ctx: command::Context) -> Result<()> {
        match self {
            Self::Lookup(cmd) => cmd.execute(ctx).await,
            Self::Session(cmd) => cmd.execute(ctx).await,
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the hosted project that holds patient records.
    #[arg(long, env = "EMERGENCY_QR_URL", value_parser = Url::parse)]
    url: Url,

    /// The project's public anonymous key. Emergency lookups are made with
    /// this key alone.
    #[arg(long, env = "EMERGENCY_QR_ANON_KEY", hide_env_values = true)]
    anon_key: String,

    /// Keep the caregiver session in memory instead of caching it on disk.
    #[arg(long)]
    no_cache_session: bool,

    /// The path to the Pinentry program to use when asking for the caregiver
    /// password.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,

    #[command(flatten)]
    pages: page::Pages,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(args: &Args) -> Box<dyn storage::Storage<supabase::session::Data>> {
    if !args.no_cache_session {
        let name = format!("session-{}.json", args.url.host_str().unwrap_or("default"));
        if let Some(file_storage) = storage::File::new(name) {
            return Box::new(file_storage);
        }
        warn!("We can't find a data directory to cache the caregiver session in");
    }

    Box::new(storage::Memory::new())
}

async fn run(args: Args) -> Result<()> {
    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(args.pinentry_program.clone().map_or_else(
            password::PinentryPrompt::new,
            password::PinentryPrompt::new_with_executable,
        )),
        Box::new(password::RpasswordPrompt),
    ];

    let storage = Arc::new(Mutex::new(get_session_storage(&args)));
    let config = supabase::Config::new(args.url, SecretString::new(args.anon_key))?;
    let backend = supabase::Client::new(config, storage)?;

    let ctx = command::Context {
        backend: Arc::new(backend),
        pages: args.pages,
        prompt: Arc::new(prompt),
    };

    command::Command::execute(args.command, ctx).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("EMERGENCY_QR_LOG", "warn")
        .write_style("EMERGENCY_QR_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
