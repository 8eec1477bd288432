// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use eventdesk_app::{AppState, Role};
use eventdesk_data::Backend;
use eventdesk_tui::UiOptions;
use log::{LevelFilter, info};
use runtime::BackendRuntime;
use simplelog::WriteLogger;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `eventdesk --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let role = match &options.role {
        Some(raw) => parse_role(raw)?,
        None => config.role(),
    };
    let export_dir = config.export_dir()?;
    let log_path = config.log_path()?;
    if options.check_only {
        return Ok(());
    }

    init_logging(&log_path, config.log_level())?;
    info!(
        "starting as {} with {:?} simulated latency",
        role.as_str(),
        config.latency()
    );

    let mut runtime = BackendRuntime::new(Backend::seeded(config.latency()), role, export_dir);
    let mut state = AppState::new(role, config.page_size());
    let ui_options = UiOptions {
        notification_ttl: config.notification_ttl(),
    };
    let result = eventdesk_tui::run_app(&mut state, &mut runtime, ui_options);
    runtime.shutdown();
    info!("exiting");
    result
}

fn parse_role(raw: &str) -> Result<Role> {
    Role::parse(raw).ok_or_else(|| {
        anyhow!(
            "unknown role {raw:?}; use one of organizer, supervisor, operator, participant"
        )
    })
}

fn init_logging(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log].path to a writable file",
                path.display()
            )
        })?;
    WriteLogger::init(level, simplelog::Config::default(), file).context("initialize logger")?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    role: Option<String>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        role: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--role" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow!("--role requires one of organizer, supervisor, operator, participant")
                })?;
                parse_role(value.as_ref())?;
                options.role = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("eventdesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --role <role>            Override [ui].role for this session");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and exit");
    println!("  --help                   Show this help");
}
