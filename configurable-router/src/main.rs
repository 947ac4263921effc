/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

mod config;
mod resolve;

use crate::config::{Config, ConfigError};
use crate::resolve::{resolve, send_options, RouteOptionArg};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command()]
struct RouterArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
    #[arg(short, long, value_name = "NAME")]
    message_type: String,
    #[arg(short, long, value_enum, default_value_t = RouteOptionArg::Table)]
    route_option: RouteOptionArg,
    /// Destination queue or instance discriminator, depending on --route-option.
    #[arg(short, long)]
    target: Option<String>,
}

async fn run(args: RouterArgs) -> Result<Vec<String>, ConfigError> {
    let config = Config::load(&args.config)?;
    let options = send_options(args.route_option, args.target.as_deref())?;
    resolve(&config, &args.message_type, options).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started configurable-router");

    let args = RouterArgs::parse();
    let message_type = args.message_type.clone();
    match run(args).await {
        Ok(destinations) => {
            println!("{message_type} -> {}", destinations.join(", "));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Unable to route {message_type}: {err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
