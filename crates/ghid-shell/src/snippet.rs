use std::path::Path;

use crate::dialect::ShellDialect;
use crate::quote::{fish_quote, posix_quote};

pub const HOOK_FUNCTION: &str = "__gh_identity_hook";

/// Shell integration printed by `shell-init`. The hook binary runs on every
/// directory change and its output is evaluated in the current shell.
pub fn hook_snippet(dialect: ShellDialect, hook_binary: &Path) -> String {
    let binary = hook_binary.display().to_string();
    match dialect {
        ShellDialect::Fish => format!(
            "# gh-identity hook\n\
             function {HOOK_FUNCTION} --on-variable PWD\n    \
             {} --shell fish | source\n\
             end\n\
             {HOOK_FUNCTION}\n",
            fish_quote(&binary)
        ),
        ShellDialect::Bash => format!(
            "# gh-identity hook\n\
             {HOOK_FUNCTION}() {{\n  \
             if [ \"$PWD\" != \"${{__GH_IDENTITY_LAST_PWD-}}\" ]; then\n    \
             __GH_IDENTITY_LAST_PWD=\"$PWD\"\n    \
             eval \"$({} --shell bash)\"\n  \
             fi\n\
             }}\n\
             case \";${{PROMPT_COMMAND:-}};\" in\n  \
             *\";{HOOK_FUNCTION};\"*) ;;\n  \
             *) PROMPT_COMMAND=\"{HOOK_FUNCTION}${{PROMPT_COMMAND:+;$PROMPT_COMMAND}}\" ;;\n\
             esac\n",
            posix_quote(&binary)
        ),
        ShellDialect::Zsh => format!(
            "# gh-identity hook\n\
             autoload -Uz add-zsh-hook\n\
             {HOOK_FUNCTION}() {{\n  \
             eval \"$({} --shell zsh)\"\n\
             }}\n\
             add-zsh-hook chpwd {HOOK_FUNCTION}\n\
             {HOOK_FUNCTION}\n",
            posix_quote(&binary)
        ),
    }
}
