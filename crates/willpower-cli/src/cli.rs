use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "willpower", version, about = "Track your willpower goals from the terminal")]
pub struct Cli {
    /// API root, e.g. https://forge.example.com/api/v1
    #[arg(long, global = true, env = "WILLPOWER_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account (does not log in)
    Register {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long, env = "WILLPOWER_USERNAME")]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is active
    Status,
    /// Navigate to an app path such as `/` or `/goals/3`
    Open { path: String },
    /// Manage goals
    #[command(subcommand)]
    Goals(GoalsCommand),
    /// Record today's check-in for a goal
    Checkin {
        goal_id: u64,
        /// completed, partial or failed
        status: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Per-goal check-in tallies
    Summary {
        /// Restrict to one day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GoalsCommand {
    /// List active goals
    List,
    /// Create a goal: `willpower goals add will "Run every morning"`
    Add {
        /// will, wont or want
        kind: String,
        title: String,
    },
    /// Show a goal with its check-ins
    Show { id: u64 },
    /// Change a goal's status
    SetStatus { id: u64, status: String },
    /// Move a goal to the recycle bin
    Delete { id: u64 },
    /// List goals in the recycle bin
    Trash,
    /// Bring a goal back from the recycle bin
    Restore { id: u64 },
    /// Delete a goal for good
    Purge { id: u64 },
}
