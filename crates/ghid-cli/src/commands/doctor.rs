use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use ghid_auth::AccountAuth;
use ghid_config::ProfileStore;
use ghid_core::expand_path;
use ghid_gitconfig::IdentitySync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorStatus {
    Pass,
    Warn,
    Fail,
}

impl DoctorStatus {
    fn as_str(self) -> &'static str {
        match self {
            DoctorStatus::Pass => "pass",
            DoctorStatus::Warn => "warn",
            DoctorStatus::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheckResult {
    pub key: String,
    pub status: DoctorStatus,
    pub code: String,
    pub path: Option<String>,
    pub action: Option<String>,
}

impl DoctorCheckResult {
    fn new(key: impl Into<String>, status: DoctorStatus, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status,
            code: code.into(),
            path: None,
            action: None,
        }
    }

    fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

pub fn has_failures(checks: &[DoctorCheckResult]) -> bool {
    checks.iter().any(|check| check.status == DoctorStatus::Fail)
}

pub fn run_doctor_checks(sync: &IdentitySync, auth: &impl AccountAuth) -> Vec<DoctorCheckResult> {
    let mut checks = Vec::new();
    let layout = sync.layout();

    let config_dir = layout.config_dir().display().to_string();
    if layout.config_dir().is_dir() {
        checks.push(DoctorCheckResult::new("config_dir", DoctorStatus::Pass, "present").with_path(config_dir));
    } else {
        checks.push(
            DoctorCheckResult::new("config_dir", DoctorStatus::Fail, "missing")
                .with_path(config_dir)
                .with_action("run `gh-identity profile add` to create a profile"),
        );
    }

    let profiles_path = layout.profiles_path().display().to_string();
    let profiles = match sync.load_profiles() {
        Ok(profiles) => Some(profiles),
        Err(error) => {
            checks.push(
                DoctorCheckResult::new("profiles", DoctorStatus::Fail, "unreadable")
                    .with_path(profiles_path.as_str())
                    .with_action(error.to_string()),
            );
            None
        }
    };
    if let Some(profiles) = &profiles {
        check_profiles(&mut checks, profiles, &profiles_path);
        check_authenticated_accounts(&mut checks, profiles, auth);
        check_signing_keys(&mut checks, profiles);
    }

    let hook_binary = layout.hook_binary_path();
    if hook_binary.is_file() {
        checks.push(
            DoctorCheckResult::new("hook_binary", DoctorStatus::Pass, "present")
                .with_path(hook_binary.display().to_string()),
        );
    } else {
        checks.push(
            DoctorCheckResult::new("hook_binary", DoctorStatus::Warn, "missing")
                .with_path(hook_binary.display().to_string())
                .with_action("add `eval \"$(gh-identity shell-init)\"` to your shell config"),
        );
    }

    match sync.load_bindings() {
        Ok(bindings) => {
            if let Some(profiles) = &profiles {
                for binding in bindings.entries() {
                    if !profiles.contains(&binding.profile) {
                        checks.push(
                            DoctorCheckResult::new(
                                format!("binding.{}", binding.path),
                                DoctorStatus::Fail,
                                "unknown_profile",
                            )
                            .with_path(binding.path.as_str())
                            .with_action(format!(
                                "run `gh-identity unbind {}` or recreate profile '{}'",
                                binding.path, binding.profile
                            )),
                        );
                    }
                }
            }
            checks.push(
                DoctorCheckResult::new("bindings", DoctorStatus::Pass, format!("count={}", bindings.len()))
                    .with_path(layout.bindings_path().display().to_string()),
            );
        }
        Err(error) => checks.push(
            DoctorCheckResult::new("bindings", DoctorStatus::Fail, "unreadable")
                .with_path(layout.bindings_path().display().to_string())
                .with_action(error.to_string()),
        ),
    }

    check_include_ifs(&mut checks, sync);
    checks
}

fn check_profiles(checks: &mut Vec<DoctorCheckResult>, profiles: &ProfileStore, path: &str) {
    if profiles.is_empty() {
        checks.push(
            DoctorCheckResult::new("profiles", DoctorStatus::Fail, "empty")
                .with_path(path)
                .with_action("run `gh-identity profile add <name> --user <account> --name <name> --email <email>`"),
        );
        return;
    }
    checks.push(
        DoctorCheckResult::new("profiles", DoctorStatus::Pass, format!("count={}", profiles.len()))
            .with_path(path),
    );
    for issue in profiles.validate() {
        checks.push(
            DoctorCheckResult::new(
                format!("profile.{}", issue.profile),
                DoctorStatus::Fail,
                format!("missing_{}", issue.field),
            )
            .with_path(path)
            .with_action(issue.to_string()),
        );
    }
}

fn check_authenticated_accounts(
    checks: &mut Vec<DoctorCheckResult>,
    profiles: &ProfileStore,
    auth: &impl AccountAuth,
) {
    let users = match auth.authenticated_users() {
        Ok(users) => users,
        Err(error) => {
            checks.push(
                DoctorCheckResult::new("gh_auth", DoctorStatus::Warn, "unavailable")
                    .with_action(error.to_string()),
            );
            return;
        }
    };
    for (name, profile) in profiles.iter() {
        if profile.account.trim().is_empty() {
            continue;
        }
        if users.iter().any(|user| user == &profile.account) {
            checks.push(DoctorCheckResult::new(
                format!("profile.{name}.account"),
                DoctorStatus::Pass,
                "authenticated",
            ));
        } else {
            checks.push(
                DoctorCheckResult::new(
                    format!("profile.{name}.account"),
                    DoctorStatus::Fail,
                    "not_authenticated",
                )
                .with_action(format!("run `gh auth login` as {}", profile.account)),
            );
        }
    }
}

fn check_signing_keys(checks: &mut Vec<DoctorCheckResult>, profiles: &ProfileStore) {
    for (name, profile) in profiles.iter() {
        let Some(raw_key) = profile.signing_key() else {
            continue;
        };
        let key = format!("profile.{name}.ssh_key");
        let expanded = match expand_path(raw_key) {
            Ok(path) => path,
            Err(error) => {
                checks.push(
                    DoctorCheckResult::new(key, DoctorStatus::Fail, "unexpandable")
                        .with_path(raw_key)
                        .with_action(error.to_string()),
                );
                continue;
            }
        };
        checks.push(check_key_file(key, &expanded));
    }
}

fn check_key_file(key: String, path: &Path) -> DoctorCheckResult {
    let display = path.display().to_string();
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) | Err(_) => {
            return DoctorCheckResult::new(key, DoctorStatus::Fail, "missing")
                .with_path(display)
                .with_action("create the key or update the profile's ssh_key");
        }
    };
    #[cfg(unix)]
    {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            return DoctorCheckResult::new(key, DoctorStatus::Fail, format!("permissions={mode:o}"))
                .with_path(display.as_str())
                .with_action(format!("chmod 600 {display}"));
        }
    }
    #[cfg(not(unix))]
    let _ = metadata;
    DoctorCheckResult::new(key, DoctorStatus::Pass, "ok").with_path(display)
}

fn check_include_ifs(checks: &mut Vec<DoctorCheckResult>, sync: &IdentitySync) {
    let gitconfig = sync.global_config().display().to_string();
    let audit = match sync.audit() {
        Ok(audit) => audit,
        Err(error) => {
            checks.push(
                DoctorCheckResult::new("include_if", DoctorStatus::Fail, "unreadable")
                    .with_path(gitconfig)
                    .with_action(error.to_string()),
            );
            return;
        }
    };
    for dir in &audit.missing {
        checks.push(
            DoctorCheckResult::new(format!("include_if.{dir}"), DoctorStatus::Fail, "missing")
                .with_path(gitconfig.as_str())
                .with_action("run `gh-identity sync`"),
        );
    }
    for dir in &audit.orphaned {
        checks.push(
            DoctorCheckResult::new(format!("include_if.{dir}"), DoctorStatus::Fail, "orphaned")
                .with_path(gitconfig.as_str())
                .with_action("run `gh-identity sync`"),
        );
    }
    if audit.is_consistent() {
        checks.push(DoctorCheckResult::new("include_if", DoctorStatus::Pass, "consistent").with_path(gitconfig));
    }
}

fn count(checks: &[DoctorCheckResult], status: DoctorStatus) -> usize {
    checks.iter().filter(|item| item.status == status).count()
}

pub fn render_doctor_report(checks: &[DoctorCheckResult]) -> String {
    let mut lines = vec![format!(
        "doctor summary: checks={} pass={} warn={} fail={}",
        checks.len(),
        count(checks, DoctorStatus::Pass),
        count(checks, DoctorStatus::Warn),
        count(checks, DoctorStatus::Fail)
    )];
    for check in checks {
        lines.push(format!(
            "doctor check: key={} status={} code={} path={} action={}",
            check.key,
            check.status.as_str(),
            check.code,
            check.path.as_deref().unwrap_or("none"),
            check.action.as_deref().unwrap_or("none")
        ));
    }
    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

pub fn render_doctor_report_json(checks: &[DoctorCheckResult]) -> String {
    let rendered = serde_json::json!({
        "summary": {
            "checks": checks.len(),
            "pass": count(checks, DoctorStatus::Pass),
            "warn": count(checks, DoctorStatus::Warn),
            "fail": count(checks, DoctorStatus::Fail),
        },
        "checks": checks
            .iter()
            .map(|check| {
                serde_json::json!({
                    "key": check.key,
                    "status": check.status.as_str(),
                    "code": check.code,
                    "path": check.path,
                    "action": check.action,
                })
            })
            .collect::<Vec<_>>()
    });
    format!("{rendered}\n")
}
