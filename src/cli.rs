use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "taskdesk")]
#[command(about = "Command-line client for the task management service", long_about = None)]
pub struct Args {
    #[arg(
        long = "base-url",
        global = true,
        help = "Task service base URL (e.g., http://localhost:8080)"
    )]
    pub base_url: Option<String>,

    #[arg(
        long = "storage-dir",
        global = true,
        help = "Directory holding the persisted session"
    )]
    pub storage_dir: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log requests and store activity")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short = 'u', long = "username")]
        username: String,
        #[arg(
            short = 'p',
            long = "password",
            help = "Password (falls back to TASKDESK_PASSWORD)"
        )]
        password: Option<String>,
    },
    /// Forget the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check where navigating to a view would lead
    Open { path: String },
    /// Load task types, users and groups together
    Meta,
    #[command(subcommand)]
    Tasks(TasksCommand),
    #[command(subcommand, name = "task-types")]
    TaskTypes(TaskTypesCommand),
    #[command(subcommand)]
    Groups(GroupsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Notifications(NotificationsCommand),
}

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    List,
    Show { id: u64 },
    /// Create a task from a JSON object
    Create { json: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskTypesCommand {
    List,
    Create { json: String },
    Update { id: u64, json: String },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    List,
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List,
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List,
    Read { id: u64 },
    #[command(name = "read-all")]
    ReadAll,
}
