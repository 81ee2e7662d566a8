use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ghid_shell::ShellDialect;

#[derive(Debug, Parser)]
#[command(
    name = "gh-identity",
    about = "Per-directory GitHub and git identities",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    #[arg(
        long,
        global = true,
        env = "GH_IDENTITY_CONFIG_DIR",
        help = "Directory holding profiles.yml, bindings.yml and profile fragments"
    )]
    pub config_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "GH_IDENTITY_GITCONFIG",
        help = "Global git config receiving includeIf directives (default ~/.gitconfig)"
    )]
    pub gitconfig: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "GH_IDENTITY_GH",
        default_value = "gh",
        help = "GitHub CLI executable"
    )]
    pub gh: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage identity profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Bind a directory (default: current) to a profile
    Bind {
        /// Optional directory followed by the profile name
        #[arg(num_args = 1..=2, required = true, value_names = ["PATH", "PROFILE"])]
        targets: Vec<String>,
    },
    /// Remove the binding for a directory (default: current)
    Unbind { path: Option<String> },
    /// Print statements that activate a profile for this shell session
    Switch {
        profile: String,
        #[arg(long)]
        shell: Option<ShellDialect>,
    },
    /// Show the active identity for the current directory
    Status,
    /// Resolve a directory (default: current) to a profile
    Resolve {
        dir: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Clone a repository with gh and bind the checkout
    Clone {
        repo: String,
        /// Profile to bind (default: GH_IDENTITY_PROFILE)
        #[arg(long)]
        profile: Option<String>,
    },
    /// Validate profiles, bindings, keys and git config directives
    Doctor {
        #[arg(long)]
        json: bool,
    },
    /// Rewrite fragments and includeIf directives from the stores
    Sync,
    /// Print the shell integration snippet
    ShellInit {
        shell: Option<ShellDialect>,
        /// Hook executable to call (default: next to this binary)
        #[arg(long)]
        hook_binary: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Create or replace a profile
    Add(ProfileAddArgs),
    /// List profiles
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        json: bool,
    },
    /// Remove a profile together with its bindings
    #[command(alias = "rm")]
    Remove { name: String },
    /// Make a profile the fallback for unbound directories
    Default { name: String },
}

#[derive(Debug, Clone, Args)]
pub struct ProfileAddArgs {
    pub name: String,
    #[arg(long = "user", help = "GitHub account (gh_user)")]
    pub account: String,
    #[arg(long = "name", help = "git author/committer name")]
    pub display_name: String,
    #[arg(long = "email", help = "git author/committer email")]
    pub contact_address: String,
    #[arg(long = "ssh-key", help = "Private key used for git over SSH")]
    pub ssh_key: Option<String>,
    #[arg(long = "default", help = "Also make this the default profile")]
    pub make_default: bool,
    #[arg(long, help = "Replace an existing profile")]
    pub force: bool,
}

impl Command {
    /// `[PATH] PROFILE` split for `bind`.
    pub fn split_bind_targets(targets: &[String]) -> (Option<&str>, &str) {
        match targets {
            [path, profile] => (Some(path.as_str()), profile.as_str()),
            [profile] => (None, profile.as_str()),
            _ => (None, ""),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "gh-identity-hook",
    about = "Print identity exports for the current directory",
    version
)]
pub struct HookCli {
    #[arg(long)]
    pub shell: Option<ShellDialect>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

pub fn shell_or_detected(shell: Option<ShellDialect>) -> ShellDialect {
    shell.unwrap_or_else(|| {
        ShellDialect::detect_from_shell_path(std::env::var("SHELL").ok().as_deref())
    })
}
