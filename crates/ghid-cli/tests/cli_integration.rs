use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

struct Sandbox {
    _temp: TempDir,
    root: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().canonicalize().expect("canonical temp");
        fs::write(root.join(".gitconfig"), "[user]\n    name = Fallback\n").expect("seed gitconfig");
        Self { _temp: temp, root }
    }

    fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    fn gitconfig(&self) -> PathBuf {
        self.root.join(".gitconfig")
    }

    fn dir(&self, name: &str) -> PathBuf {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).expect("create dir");
        dir
    }

    fn prepare(&self, mut cmd: Command) -> Command {
        cmd.current_dir(&self.root)
            .env("GH_IDENTITY_CONFIG_DIR", self.config_dir())
            .env("GH_IDENTITY_GITCONFIG", self.gitconfig())
            .env("GH_IDENTITY_GH", self.root.join("missing-gh"))
            .env("SHELL", "/bin/bash")
            .env_remove("GH_IDENTITY_PROFILE")
            .env_remove("RUST_LOG");
        cmd
    }

    fn cli(&self) -> Command {
        self.prepare(Command::new(assert_cmd::cargo::cargo_bin!("gh-identity")))
    }

    fn hook(&self) -> Command {
        self.prepare(Command::new(assert_cmd::cargo::cargo_bin!("gh-identity-hook")))
    }

    fn add_profile(&self, name: &str, account: &str, extra: &[&str]) {
        self.cli()
            .args(["profile", "add", name, "--user", account])
            .args(["--name", format!("{name} user").as_str()])
            .args(["--email", format!("{name}@example.com").as_str()])
            .args(extra)
            .assert()
            .success();
    }

    #[cfg(unix)]
    fn install_fake_gh(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.join("fake-gh");
        fs::write(
            &path,
            "#!/bin/sh\n\
             case \"$1 $2\" in\n\
             \"auth token\") echo \"gho_fake_$4\" ;;\n\
             \"auth status\") echo \"  Logged in to github.com account work-octo (keyring)\" ;;\n\
             \"repo clone\") mkdir -p \"$(basename \"$3\" .git)\" ;;\n\
             *) echo \"unexpected: $*\" >&2; exit 1 ;;\n\
             esac\n",
        )
        .expect("write fake gh");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake gh");
        path
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn integration_profile_add_and_list_marks_default() {
    let sandbox = Sandbox::new();
    sandbox.add_profile("work", "work-octo", &["--default"]);
    sandbox.add_profile("home", "octo", &[]);

    sandbox
        .cli()
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("   home  octo  home user <home@example.com>"))
        .stdout(predicate::str::contains(" → work  work-octo  work user <work@example.com>"));

    let profiles = read(&sandbox.config_dir().join("profiles.yml"));
    assert!(profiles.contains("gh_user: work-octo"));
    assert!(profiles.contains("default: work"));
    assert!(sandbox.config_dir().join("git/work.gitconfig").is_file());
}

#[test]
fn integration_profile_add_refuses_duplicates_without_force() {
    let sandbox = Sandbox::new();
    sandbox.add_profile("work", "work-octo", &[]);
    sandbox
        .cli()
        .args(["profile", "add", "work", "--user", "x", "--name", "X", "--email", "x@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    sandbox.add_profile("work", "work-octo-2", &["--force"]);
    assert!(read(&sandbox.config_dir().join("profiles.yml")).contains("work-octo-2"));
}

#[test]
fn integration_profile_add_rejects_blank_fields_and_bad_names() {
    let sandbox = Sandbox::new();
    sandbox
        .cli()
        .args(["profile", "add", "work", "--user", " ", "--name", "X", "--email", "x@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile 'work': gh_user is required"));
    sandbox
        .cli()
        .args(["profile", "add", "../evil", "--user", "u", "--name", "X", "--email", "x@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid profile name"));
}

#[test]
fn integration_bind_resolve_unbind_round_trip() {
    let sandbox = Sandbox::new();
    sandbox.add_profile("work", "work-octo", &[]);
    let work = sandbox.dir("src/work");
    let nested = sandbox.dir("src/work/api/handlers");

    sandbox
        .cli()
        .args(["bind", work.to_str().unwrap_or_default(), "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("→ work"));

    let gitconfig = read(&sandbox.gitconfig());
    assert!(gitconfig.starts_with("[user]\n    name = Fallback\n"));
    assert!(gitconfig.contains(&format!(
        "[includeIf \"gitdir:{}/\"] # managed by gh-identity",
        work.display()
    )));

    let output = sandbox
        .cli()
        .current_dir(&nested)
        .args(["resolve", "--json"])
        .output()
        .expect("resolve");
    assert!(output.status.success());
    let resolution: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(resolution["profile"], "work");
    assert_eq!(resolution["matched_path"], work.display().to_string());
    assert_eq!(resolution["used_default"], false);

    sandbox
        .cli()
        .current_dir(&work)
        .arg("unbind")
        .assert()
        .success()
        .stdout(predicate::str::contains("(was work)"));
    assert_eq!(read(&sandbox.gitconfig()), "[user]\n    name = Fallback\n");

    sandbox
        .cli()
        .current_dir(&work)
        .arg("unbind")
        .assert()
        .failure()
        .stderr(predicate::str::contains("binding"));
}

#[test]
fn integration_bind_unknown_profile_changes_nothing() {
    let sandbox = Sandbox::new();
    let work = sandbox.dir("work");
    sandbox
        .cli()
        .args(["bind", work.to_str().unwrap_or_default(), "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile 'ghost' not found"));
    assert_eq!(read(&sandbox.gitconfig()), "[user]\n    name = Fallback\n");
    assert!(!sandbox.config_dir().join("bindings.yml").exists());
}

#[test]
fn integration_profile_remove_cascades_to_bindings_and_gitconfig() {
    let sandbox = Sandbox::new();
    sandbox.add_profile("work", "work-octo", &[]);
    sandbox.add_profile("home", "octo", &[]);
    let work = sandbox.dir("work");
    let home = sandbox.dir("home");
    sandbox
        .cli()
        .args(["bind", work.to_str().unwrap_or_default(), "work"])
        .assert()
        .success();
    sandbox
        .cli()
        .args(["bind", home.to_str().unwrap_or_default(), "home"])
        .assert()
        .success();

    sandbox
        .cli()
        .args(["profile", "remove", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Also removed 1 binding(s)."));

    let gitconfig = read(&sandbox.gitconfig());
    assert!(!gitconfig.contains(&format!("gitdir:{}/", work.display())));
    assert!(gitconfig.contains(&format!("gitdir:{}/", home.display())));
    assert!(!sandbox.config_dir().join("git/work.gitconfig").exists());
    let bindings = read(&sandbox.config_dir().join("bindings.yml"));
    assert!(!bindings.contains("profile: work"));
    assert!(bindings.contains("profile: home"));
}

#[test]
fn integration_switch_prints_eval_statements() {
    let sandbox = Sandbox::new();
    sandbox.add_profile("work", "work-octo", &[]);
    sandbox
        .cli()
        .args(["switch", "work", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "unset GH_TOKEN 2>/dev/null\ngh auth switch --user work-octo 2>/dev/null\n",
        ))
        .stdout(predicate::str::contains("export GIT_AUTHOR_NAME='work user'\n"))
        .stdout(predicate::str::contains("export GH_IDENTITY_PROFILE=work\n"));

    sandbox
        .cli()
        .args(["switch", "work", "--shell", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set -gx GIT_AUTHOR_EMAIL work@example.com\n"));
}

#[test]
fn integration_status_reports_source() {
    let sandbox = Sandbox::new();
    sandbox
        .cli()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active profile."));

    sandbox.add_profile("work", "work-octo", &[]);
    sandbox.add_profile("home", "octo", &["--default"]);
    sandbox
        .cli()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("  Profile:  home\n"))
        .stdout(predicate::str::contains("  Source:   default profile\n"));

    sandbox
        .cli()
        .env("GH_IDENTITY_PROFILE", "work")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("  Account:  work-octo\n"))
        .stdout(predicate::str::contains("environment (GH_IDENTITY_PROFILE)"));
}

#[test]
fn integration_shell_init_prints_snippets() {
    let sandbox = Sandbox::new();
    let hook = sandbox.root.join("bin/gh-identity-hook");
    sandbox
        .cli()
        .args(["shell-init", "fish", "--hook-binary", hook.to_str().unwrap_or_default()])
        .assert()
        .success()
        .stdout(predicate::str::contains("function __gh_identity_hook --on-variable PWD"));
    sandbox
        .cli()
        .args(["shell-init", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add-zsh-hook chpwd __gh_identity_hook"));
}

#[test]
fn integration_doctor_fails_on_empty_setup() {
    let sandbox = Sandbox::new();
    sandbox
        .cli()
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("key=config_dir status=fail code=missing"));

    let output = sandbox
        .cli()
        .args(["doctor", "--json"])
        .output()
        .expect("doctor json");
    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(report["summary"]["fail"].as_u64().unwrap_or_default() >= 2);
}

#[test]
fn integration_sync_restores_removed_directives() {
    let sandbox = Sandbox::new();
    sandbox.add_profile("work", "work-octo", &[]);
    let work = sandbox.dir("work");
    sandbox
        .cli()
        .args(["bind", work.to_str().unwrap_or_default(), "work"])
        .assert()
        .success();
    let bound = read(&sandbox.gitconfig());
    fs::write(sandbox.gitconfig(), "[user]\n    name = Fallback\n").expect("drift");

    sandbox
        .cli()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync: updated=1 removed=0 skipped=0"));
    assert_eq!(read(&sandbox.gitconfig()), bound);
}

#[test]
fn integration_hook_is_silent_outside_bindings_and_tolerates_errors() {
    let sandbox = Sandbox::new();
    sandbox
        .hook()
        .args(["--shell", "bash"])
        .assert()
        .success()
        .stdout("");

    fs::create_dir_all(sandbox.config_dir()).expect("config dir");
    fs::write(sandbox.config_dir().join("profiles.yml"), "profiles: [unclosed\n").expect("corrupt");
    sandbox
        .hook()
        .args(["--shell", "bash"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("gh-identity-hook:"));
}

#[cfg(unix)]
#[test]
fn integration_hook_exports_identity_with_token_from_gh() {
    let sandbox = Sandbox::new();
    let fake_gh = sandbox.install_fake_gh();
    sandbox.add_profile("work", "work-octo", &[]);
    let work = sandbox.dir("work");
    sandbox
        .cli()
        .args(["bind", work.to_str().unwrap_or_default(), "work"])
        .assert()
        .success();

    sandbox
        .hook()
        .current_dir(&work)
        .env("GH_IDENTITY_GH", &fake_gh)
        .args(["--shell", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("export GH_TOKEN=gho_fake_work-octo\n"))
        .stdout(predicate::str::contains("export GIT_COMMITTER_EMAIL=work@example.com\n"));
}

#[cfg(unix)]
#[test]
fn integration_doctor_uses_gh_account_list() {
    let sandbox = Sandbox::new();
    let fake_gh = sandbox.install_fake_gh();
    sandbox.add_profile("work", "work-octo", &[]);
    sandbox.add_profile("home", "octo", &[]);

    sandbox
        .cli()
        .env("GH_IDENTITY_GH", &fake_gh)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("key=profile.work.account status=pass"))
        .stdout(predicate::str::contains(
            "key=profile.home.account status=fail code=not_authenticated",
        ));
}

#[cfg(unix)]
#[test]
fn integration_clone_binds_the_checkout() {
    let sandbox = Sandbox::new();
    let fake_gh = sandbox.install_fake_gh();
    sandbox.add_profile("work", "work-octo", &[]);
    let src = sandbox.dir("src");

    sandbox
        .cli()
        .current_dir(&src)
        .env("GH_IDENTITY_GH", &fake_gh)
        .args(["clone", "acme/widgets", "--profile", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloned acme/widgets."));

    let checkout = src.join("widgets");
    assert!(checkout.is_dir());
    assert!(read(&sandbox.gitconfig()).contains(&format!("gitdir:{}/", checkout.display())));

    sandbox
        .cli()
        .current_dir(&src)
        .env("GH_IDENTITY_GH", &fake_gh)
        .args(["clone", "acme/other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no profile given"));
}
