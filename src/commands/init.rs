use clap::{Command, ValueEnum};
use clap_complete::{Shell as CompleteShell, generate};
use std::io;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Generate shell integration for the specified shell
pub fn generate_shell_integration(shell: Shell) {
    println!("{}", shell_integration(shell));
}

/// Generate native shell completions using clap
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let clap_shell = match shell {
        Shell::Bash => CompleteShell::Bash,
        Shell::Zsh => CompleteShell::Zsh,
        Shell::Fish => CompleteShell::Fish,
    };

    let bin_name = cmd.get_name().to_string();
    generate(clap_shell, cmd, bin_name, &mut io::stdout());
}

/// The `wtm` wrapper function for `shell`
///
/// `jump` is the only subcommand whose output is consumed: its stdout is a
/// path to `cd` into. Everything else is passed straight to `wtm-bin`.
#[must_use]
pub fn shell_integration(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH_INTEGRATION,
        Shell::Zsh => ZSH_INTEGRATION,
        Shell::Fish => FISH_INTEGRATION,
    }
}

const BASH_INTEGRATION: &str = r#"# wtm shell integration for Bash
# Defines a `wtm` function so that `wtm jump` can change the directory

wtm() {
    if [ "$1" = "jump" ]; then
        shift
        local result
        if [ $# -eq 0 ]; then
            result=$(wtm-bin jump --interactive) || return $?
        else
            result=$(wtm-bin jump "$@") || return $?
        fi
        if [ -n "$result" ] && [ -d "$result" ]; then
            cd "$result" || return 1
        fi
    else
        wtm-bin "$@"
    fi
}

if command -v wtm-bin >/dev/null 2>&1; then
    eval "$(wtm-bin completions bash 2>/dev/null)"
fi

_wtm_complete() {
    local cur="${COMP_WORDS[COMP_CWORD]}"
    case "${COMP_WORDS[1]}" in
        jump|remove|reset)
            if [[ "$cur" != -* ]] && [ "$COMP_CWORD" -eq 2 ]; then
                local names
                if [ "${COMP_WORDS[1]}" = "reset" ]; then
                    names=$(wtm-bin jump --list-completions 2>/dev/null)
                else
                    names=$(wtm-bin "${COMP_WORDS[1]}" --list-completions 2>/dev/null)
                fi
                COMPREPLY=($(compgen -W "$names" -- "$cur"))
                return 0
            fi
            ;;
        hooks)
            COMPREPLY=($(compgen -W "pre_add post_add pre_remove post_remove" -- "$cur"))
            return 0
            ;;
    esac
    if declare -F _wtm-bin >/dev/null 2>&1; then
        COMP_WORDS[0]="wtm-bin"
        _wtm-bin
    else
        COMPREPLY=($(compgen -W "add remove reset list jump hooks init completions --help --version" -- "$cur"))
    fi
}

complete -F _wtm_complete wtm"#;

const ZSH_INTEGRATION: &str = r#"# wtm shell integration for Zsh
# Defines a `wtm` function so that `wtm jump` can change the directory

wtm() {
    if [[ "$1" == "jump" ]]; then
        shift
        local result
        if (( $# == 0 )); then
            result=$(wtm-bin jump --interactive) || return $?
        else
            result=$(wtm-bin jump "$@") || return $?
        fi
        if [[ -n "$result" && -d "$result" ]]; then
            cd "$result" || return 1
        fi
    else
        wtm-bin "$@"
    fi
}

if command -v wtm-bin >/dev/null 2>&1; then
    __wtm_load_completions() {
        local clap_completion
        clap_completion="$(wtm-bin completions zsh 2>/dev/null | sed '/^if \[ "$funcstack\[1\]" = "_wtm-bin" \]; then/,/^fi$/d')"
        [[ -n "$clap_completion" ]] && eval "$clap_completion"
    }
    __wtm_load_completions
    unfunction __wtm_load_completions
fi

_wtm() {
    case "${words[2]}" in
        jump|remove|reset)
            if (( CURRENT == 3 )) && [[ "${words[CURRENT]}" != -* ]]; then
                local -a names
                local source="${words[2]}"
                [[ "$source" == "reset" ]] && source="jump"
                names=($(wtm-bin "$source" --list-completions 2>/dev/null))
                _describe 'worktrees' names
                return 0
            fi
            ;;
        hooks)
            local -a events
            events=(pre_add post_add pre_remove post_remove)
            _describe 'hook events' events
            return 0
            ;;
    esac
    if (( $+functions[_wtm-bin] )); then
        words[1]="wtm-bin"
        _wtm-bin "$@"
    fi
}

if (( $+functions[compdef] )); then
    compdef _wtm wtm
fi"#;

const FISH_INTEGRATION: &str = r#"# wtm shell integration for Fish
# Defines a `wtm` function so that `wtm jump` can change the directory

function wtm
    if test "$argv[1]" = jump
        set -e argv[1]
        if test (count $argv) -eq 0
            set result (wtm-bin jump --interactive); or return $status
        else
            set result (wtm-bin jump $argv); or return $status
        end
        if test -n "$result"; and test -d "$result"
            cd "$result"
        end
    else
        wtm-bin $argv
    end
end

if command -q wtm-bin
    wtm-bin completions fish 2>/dev/null | string replace -a -- '-c wtm-bin' '-c wtm' | source
end

complete -c wtm -n '__fish_seen_subcommand_from jump reset' -f -a '(wtm-bin jump --list-completions 2>/dev/null)' -d 'Worktree'
complete -c wtm -n '__fish_seen_subcommand_from remove' -f -a '(wtm-bin remove --list-completions 2>/dev/null)' -d 'Worktree'
complete -c wtm -n '__fish_seen_subcommand_from hooks' -f -a 'pre_add post_add pre_remove post_remove' -d 'Hook event'"#;
