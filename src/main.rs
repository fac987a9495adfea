use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use wtm::Result;
use wtm::commands::add::{AddOptions, CreateMode};
use wtm::commands::init::Shell;
use wtm::commands::remove::RemoveOptions;
use wtm::commands::{add, hooks, init, jump, list, remove, reset};
use wtm::logging;

#[derive(Parser)]
#[command(name = "wtm-bin")]
#[command(about = "Manage git worktrees with lifecycle hooks")]
#[command(version)]
pub struct Cli {
    /// Print debug output, including hook command timings
    #[arg(short, long, global = true, env = "WTM_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new worktree
    Add {
        /// Branch name for the worktree
        #[arg(value_hint = ValueHint::Other)]
        branch: String,
        /// Worktree location (default: <storage root>/<repo>/<branch>)
        #[arg(long, value_hint = ValueHint::DirPath)]
        path: Option<String>,
        /// Starting point when a new branch is created
        #[arg(long)]
        base: Option<String>,
        /// Force creation of a new branch (fail if it already exists)
        #[arg(long, conflicts_with = "existing_branch")]
        new_branch: bool,
        /// Only use an existing branch (fail if it doesn't exist)
        #[arg(long, conflicts_with = "new_branch")]
        existing_branch: bool,
        /// Skip lifecycle hooks
        #[arg(long)]
        no_hooks: bool,
    },
    /// Remove a worktree
    Remove {
        /// Branch name or path to remove. If not provided, opens interactive selection
        #[arg(value_hint = ValueHint::Other)]
        target: Option<String>,
        /// Remove even with local changes; force-delete the branch
        #[arg(short, long)]
        force: bool,
        /// Keep the branch (only remove the worktree)
        #[arg(long)]
        keep_branch: bool,
        /// Launch interactive selection mode
        #[arg(long)]
        interactive: bool,
        /// Skip lifecycle hooks
        #[arg(long)]
        no_hooks: bool,
        /// List available worktrees for completion (internal use)
        #[arg(long, hide = true)]
        list_completions: bool,
    },
    /// Hard-reset a worktree to its branch on the remote
    Reset {
        /// Branch name or path (default: the worktree you are in)
        #[arg(value_hint = ValueHint::Other)]
        target: Option<String>,
        /// Remote to fetch from (default: settings, else origin)
        #[arg(long)]
        remote: Option<String>,
    },
    /// List all worktrees of the current repository
    List {
        /// Tab-separated path, branch and head, one worktree per line
        #[arg(long)]
        porcelain: bool,
    },
    /// Print the path of a worktree (the shell function cds into it)
    Jump {
        /// Target worktree (branch name, path or @). If not provided, opens interactive selection
        #[arg(value_hint = ValueHint::Other)]
        target: Option<String>,
        /// Launch interactive selection mode
        #[arg(long)]
        interactive: bool,
        /// List available worktrees for completion (internal use)
        #[arg(long, hide = true)]
        list_completions: bool,
    },
    /// Show configured lifecycle hooks
    Hooks {
        /// Only show this event; exit with an error if it has no hook
        event: Option<String>,
    },
    /// Generate shell integration for directory navigation
    Init {
        /// Shell to generate integration for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Add {
            branch,
            path,
            base,
            new_branch,
            existing_branch,
            no_hooks,
        } => {
            let mode = if new_branch {
                CreateMode::NewBranch
            } else if existing_branch {
                CreateMode::ExistingBranch
            } else {
                CreateMode::Smart
            };
            add::add_worktree(&AddOptions {
                branch: &branch,
                path: path.as_deref(),
                base: base.as_deref(),
                mode,
                run_hooks: !no_hooks,
            })?;
        }
        Commands::Remove {
            target,
            force,
            keep_branch,
            interactive,
            no_hooks,
            list_completions,
        } => {
            remove::remove_worktree(&RemoveOptions {
                target: target.as_deref(),
                force,
                keep_branch,
                interactive,
                run_hooks: !no_hooks,
                list_completions,
            })?;
        }
        Commands::Reset { target, remote } => {
            reset::reset_worktree(target.as_deref(), remote.as_deref())?;
        }
        Commands::List { porcelain } => {
            list::list_worktrees(porcelain)?;
        }
        Commands::Jump {
            target,
            interactive,
            list_completions,
        } => {
            jump::jump_worktree(target.as_deref(), interactive, list_completions)?;
        }
        Commands::Hooks { event } => {
            hooks::show_hooks(event.as_deref())?;
        }
        Commands::Init { shell } => {
            init::generate_shell_integration(shell);
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            init::generate_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
