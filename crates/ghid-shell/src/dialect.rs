use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Supported shells. Fish uses `set -gx`, bash and zsh use `export`.
pub enum ShellDialect {
    Fish,
    Bash,
    Zsh,
}

impl ShellDialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fish => "fish",
            Self::Bash => "bash",
            Self::Zsh => "zsh",
        }
    }

    pub fn is_posix(self) -> bool {
        matches!(self, Self::Bash | Self::Zsh)
    }

    /// Picks the dialect from a `$SHELL` value; anything unknown is bash.
    pub fn detect_from_shell_path(shell_path: Option<&str>) -> Self {
        let name = shell_path
            .map(str::trim)
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default();
        match name {
            "fish" => Self::Fish,
            "zsh" => Self::Zsh,
            _ => Self::Bash,
        }
    }
}

impl fmt::Display for ShellDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShellDialect {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fish" => Ok(Self::Fish),
            "bash" => Ok(Self::Bash),
            "zsh" => Ok(Self::Zsh),
            other => Err(format!(
                "unsupported shell '{other}': expected one of fish, bash, zsh"
            )),
        }
    }
}
