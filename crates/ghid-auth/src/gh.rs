use std::path::Path;

use ghid_core::{IdentityError, Result};

use crate::runner::{CommandOutput, CommandRequest, CommandRunner, ProcessRunner};

pub const GH_EXECUTABLE: &str = "gh";
pub const CLONE_TIMEOUT_MS: u64 = 600_000;

/// Narrow view of the `gh` account store.
pub trait AccountAuth {
    /// Token for `user`, trimmed.
    fn token(&self, user: &str) -> Result<String>;
    /// Every authenticated account, deduplicated, in reported order.
    fn authenticated_users(&self) -> Result<Vec<String>>;
    /// The account `gh` currently acts as.
    fn active_user(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
/// [`AccountAuth`] backed by the `gh` executable.
pub struct GhCli<R = ProcessRunner> {
    executable: String,
    runner: R,
}

impl GhCli<ProcessRunner> {
    pub fn new() -> Self {
        Self::with_runner(GH_EXECUTABLE, ProcessRunner)
    }
}

impl Default for GhCli<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> GhCli<R> {
    pub fn with_runner(executable: impl Into<String>, runner: R) -> Self {
        Self {
            executable: executable.into(),
            runner,
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    fn gh(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner
            .run(&CommandRequest::new(self.executable.as_str(), args))
    }

    /// Runs `gh repo clone <repo>` inside `working_dir`.
    pub fn clone_repo(&self, repo: &str, working_dir: &Path) -> Result<()> {
        let request = CommandRequest::new(self.executable.as_str(), &["repo", "clone", repo])
            .with_working_dir(working_dir)
            .with_timeout_ms(CLONE_TIMEOUT_MS);
        let output = self.runner.run(&request)?;
        if !output.success {
            return Err(command_failed(&request.display(), &output));
        }
        tracing::info!(repo, dir = %working_dir.display(), "cloned repository");
        Ok(())
    }
}

impl<R: CommandRunner> AccountAuth for GhCli<R> {
    fn token(&self, user: &str) -> Result<String> {
        let output = self.gh(&["auth", "token", "-u", user])?;
        if !output.success {
            return Err(command_failed(
                &format!("{} auth token -u {user}", self.executable),
                &output,
            ));
        }
        Ok(output.stdout.trim().to_string())
    }

    fn authenticated_users(&self) -> Result<Vec<String>> {
        let output = self.gh(&["auth", "status"])?;
        if !output.success {
            if output.combined().contains("not logged in") {
                return Ok(Vec::new());
            }
            return Err(command_failed(
                &format!("{} auth status", self.executable),
                &output,
            ));
        }
        Ok(parse_auth_users(&output.combined()))
    }

    fn active_user(&self) -> Result<String> {
        let output = self.gh(&["auth", "status", "--active"])?;
        if !output.success {
            return Err(command_failed(
                &format!("{} auth status --active", self.executable),
                &output,
            ));
        }
        parse_active_user(&output.combined())
    }
}

fn command_failed(command: &str, output: &CommandOutput) -> IdentityError {
    let code = output
        .code
        .map(|value| value.to_string())
        .unwrap_or_else(|| "terminated_by_signal".to_string());
    IdentityError::Account {
        message: format!(
            "{command} exited with status {code}: {}",
            output.stderr.trim()
        ),
    }
}

fn account_tokens(output: &str) -> impl Iterator<Item = &str> {
    output.lines().flat_map(|line| {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        fields
            .windows(2)
            .filter(|pair| pair[0] == "account")
            .map(|pair| pair[1].trim_end_matches(['(', ')']))
            .filter(|user| !user.is_empty())
            .collect::<Vec<_>>()
    })
}

/// Extracts `account <user>` tokens from `gh auth status` output.
pub fn parse_auth_users(output: &str) -> Vec<String> {
    let mut users: Vec<String> = Vec::new();
    for user in account_tokens(output) {
        if !users.iter().any(|seen| seen == user) {
            users.push(user.to_string());
        }
    }
    users
}

/// First `account <user>` token in `gh auth status` output.
pub fn parse_active_user(output: &str) -> Result<String> {
    account_tokens(output)
        .next()
        .map(str::to_string)
        .ok_or_else(|| IdentityError::Account {
            message: "could not determine active user from gh auth status output".to_string(),
        })
}

/// Checkout directory `gh repo clone` creates: the last path segment without
/// a trailing `.git`.
pub fn repo_to_dir(repo: &str) -> String {
    let trimmed = repo.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct ScriptedRunner {
        output: CommandOutput,
        seen: RefCell<Vec<CommandRequest>>,
    }

    impl ScriptedRunner {
        fn new(success: bool, stdout: &str, stderr: &str) -> Self {
            Self {
                output: CommandOutput {
                    success,
                    code: Some(if success { 0 } else { 1 }),
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                },
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for &ScriptedRunner {
        fn run(&self, request: &CommandRequest) -> Result<CommandOutput> {
            self.seen.borrow_mut().push(request.clone());
            Ok(self.output.clone())
        }
    }

    #[test]
    fn unit_parse_auth_users_dedupes_and_strips_parens() {
        let output = "github.com\n  ✓ Logged in to github.com account user1 (keyring)\n  ✓ Logged in to github.com account user2 (keyring)\n  ✓ Logged in to github.com account user1 (token)\n";
        assert_eq!(parse_auth_users(output), vec!["user1", "user2"]);
        assert!(parse_auth_users("").is_empty());
        assert!(parse_auth_users("no keyword here").is_empty());
        assert_eq!(parse_auth_users("account octo)"), vec!["octo"]);
    }

    #[test]
    fn unit_parse_active_user_takes_first_account() {
        let output = "  Logged in to github.com account octo (keyring)\n  - Active account: true\n";
        assert_eq!(parse_active_user(output).expect("active"), "octo");
        let error = parse_active_user("nothing").expect_err("missing");
        assert!(error.to_string().contains("could not determine active user"));
    }

    #[test]
    fn unit_repo_to_dir_handles_common_specifiers() {
        assert_eq!(repo_to_dir("owner/repo"), "repo");
        assert_eq!(repo_to_dir("https://github.com/owner/repo.git"), "repo");
        assert_eq!(repo_to_dir("git@github.com:owner/repo.git"), "repo");
        assert_eq!(repo_to_dir("repo"), "repo");
        assert_eq!(repo_to_dir("owner/repo/"), "repo");
    }

    #[test]
    fn functional_token_runs_gh_auth_token_for_user() {
        let runner = ScriptedRunner::new(true, "gho_abc\n", "");
        let gh = GhCli::with_runner("gh", &runner);
        assert_eq!(gh.token("octo").expect("token"), "gho_abc");
        let seen = runner.seen.borrow();
        assert_eq!(seen[0].display(), "gh auth token -u octo");
    }

    #[test]
    fn functional_token_failure_reports_stderr() {
        let runner = ScriptedRunner::new(false, "", "no oauth token found for octo\n");
        let gh = GhCli::with_runner("gh", &runner);
        let error = gh.token("octo").expect_err("failure");
        assert!(matches!(error, IdentityError::Account { .. }));
        assert!(error.to_string().contains("no oauth token found for octo"));
        assert!(error.to_string().contains("status 1"));
    }

    #[test]
    fn functional_not_logged_in_yields_no_users() {
        let runner = ScriptedRunner::new(false, "", "error connecting to api.github.com\n");
        let gh = GhCli::with_runner("gh", &runner);
        let error = gh.authenticated_users().expect_err("other failures surface");
        assert!(error.to_string().contains("gh auth status exited with status 1"));

        let runner = ScriptedRunner::new(false, "", "github.com: not logged in\n");
        let gh = GhCli::with_runner("gh", &runner);
        assert!(gh.authenticated_users().expect("users").is_empty());
    }

    #[test]
    fn functional_authenticated_users_reads_stdout_and_stderr() {
        let runner = ScriptedRunner::new(
            true,
            "  Logged in to github.com account work-octo (keyring)\n",
            "  Logged in to github.com account octo (keyring)\n",
        );
        let gh = GhCli::with_runner("gh", &runner);
        assert_eq!(gh.authenticated_users().expect("users"), vec!["work-octo", "octo"]);
    }

    #[test]
    fn functional_clone_runs_in_working_dir_with_long_timeout() {
        let runner = ScriptedRunner::new(true, "", "Cloning into 'repo'...\n");
        let gh = GhCli::with_runner("gh", &runner);
        gh.clone_repo("owner/repo", Path::new("/src")).expect("clone");
        let seen = runner.seen.borrow();
        assert_eq!(seen[0].display(), "gh repo clone owner/repo");
        assert_eq!(seen[0].working_dir.as_deref(), Some(Path::new("/src")));
        assert_eq!(seen[0].timeout_ms, CLONE_TIMEOUT_MS);
    }
}
