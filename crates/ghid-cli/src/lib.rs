//! Command-line front end for gh-identity.
//!
//! Commands render their output as strings; `main` prints them to stdout and
//! keeps diagnostics on stderr.

pub mod bootstrap;
pub mod cli_args;
pub mod commands;

use std::process::ExitCode;

use anyhow::Result;

use crate::bootstrap::CommandContext;
use crate::cli_args::{shell_or_detected, Cli, Command, ProfileCommand};
use crate::commands::{binding, doctor, profile, session};

pub fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = CommandContext::from_args(&cli.global)?;
    let output = match &cli.command {
        Command::Profile { command } => match command {
            ProfileCommand::Add(args) => profile::add_profile(&ctx, args)?,
            ProfileCommand::List { json } => profile::list_profiles(&ctx, *json)?,
            ProfileCommand::Remove { name } => profile::remove_profile(&ctx, name)?,
            ProfileCommand::Default { name } => profile::set_default_profile(&ctx, name)?,
        },
        Command::Bind { targets } => {
            let (path, profile_name) = Command::split_bind_targets(targets);
            binding::bind(&ctx, path, profile_name)?
        }
        Command::Unbind { path } => binding::unbind(&ctx, path.as_deref())?,
        Command::Switch { profile, shell } => {
            session::switch(&ctx, profile, shell_or_detected(*shell))?
        }
        Command::Status => session::status(&ctx)?,
        Command::Resolve { dir, json } => session::resolve(&ctx, dir.as_deref(), *json)?,
        Command::Clone { repo, profile } => binding::clone(&ctx, repo, profile.as_deref())?,
        Command::Doctor { json } => {
            let checks = doctor::run_doctor_checks(&ctx.sync, &ctx.gh);
            let rendered = if *json {
                doctor::render_doctor_report_json(&checks)
            } else {
                doctor::render_doctor_report(&checks)
            };
            print!("{rendered}");
            return Ok(if doctor::has_failures(&checks) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
        Command::Sync => commands::sync(&ctx)?,
        Command::ShellInit { shell, hook_binary } => {
            session::shell_init(ctx.layout(), shell_or_detected(*shell), hook_binary.clone())
        }
    };
    print!("{output}");
    Ok(ExitCode::SUCCESS)
}
