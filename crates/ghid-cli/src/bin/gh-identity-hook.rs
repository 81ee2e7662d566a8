//! Prompt hook: prints identity exports for `$PWD`. Failures go to stderr and
//! still exit 0 so a broken config never breaks the shell.

use clap::Parser;
use ghid_auth::AccountAuth;
use ghid_cli::bootstrap::{config_layout, init_tracing};
use ghid_cli::cli_args::{shell_or_detected, HookCli};
use ghid_shell::hook_exports;

fn main() {
    init_tracing();
    let cli = HookCli::parse();
    match render(&cli) {
        Ok(output) => print!("{output}"),
        Err(error) => eprintln!("gh-identity-hook: {error:#}"),
    }
}

fn render(cli: &HookCli) -> anyhow::Result<String> {
    let layout = config_layout(&cli.global)?;
    let cwd = std::env::current_dir()?;
    let gh = ghid_auth::GhCli::with_runner(cli.global.gh.as_str(), ghid_auth::ProcessRunner);
    let output = hook_exports(
        &cwd.display().to_string(),
        shell_or_detected(cli.shell),
        &layout,
        |account| gh.token(account),
    )?;
    Ok(output)
}
