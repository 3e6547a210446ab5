use clap::Parser;
use colored::*;
use serde_json::Value;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

use taskdesk::cli::{
    Args, Command, GroupsCommand, NotificationsCommand, TaskTypesCommand, TasksCommand,
    UsersCommand,
};
use taskdesk::config::Config;
use taskdesk::models::{Credentials, Record};
use taskdesk::notices::NoticeKind;
use taskdesk::router::Navigation;
use taskdesk::stores::CollectionStore;
use taskdesk::{App, Result, TaskdeskError};

const NAME_FIELDS: &[&str] = &["label", "Label", "title", "name", "username"];

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_logging(config.verbose);

    let app = match App::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let result = run(&app, args.command).await;
    if let Err(e) = &result {
        app.notices().error(e.to_string());
    }
    print_notices(&app);

    if result.is_err() {
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "taskdesk=debug" } else { "taskdesk=warn" };
    let filter = EnvFilter::try_from_env("TASKDESK_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(app: &App, command: Command) -> Result<()> {
    if let Some(view) = view_for(&command) {
        guard(app, view)?;
    }

    match command {
        Command::Login { username, password } => {
            let password = password
                .or_else(|| env::var("TASKDESK_PASSWORD").ok())
                .ok_or_else(|| {
                    TaskdeskError::ConfigError(
                        "password required: pass --password or set TASKDESK_PASSWORD".to_string(),
                    )
                })?;
            app.session()
                .login(&Credentials { username, password })
                .await?;
            let who = app
                .session()
                .user()
                .map(|u| u.username)
                .unwrap_or_else(|| "unknown user".to_string());
            app.notices().success(format!("Signed in as {}", who));
        }
        Command::Logout => {
            app.session().logout();
            app.notices().info("Signed out");
        }
        Command::Whoami => match app.session().user() {
            Some(user) => {
                let label = user
                    .user_label
                    .map(|l| format!(" ({})", l))
                    .unwrap_or_default();
                println!("{} #{}{}", user.username.bold(), user.id, label.dimmed());
            }
            None if app.session().is_authenticated() => {
                println!("{}", "Signed in (no user details stored)".dimmed())
            }
            None => println!("{}", "Not signed in".yellow()),
        },
        Command::Open { path } => match app.router().navigate(&path, app.session()) {
            Navigation::Proceed(target) => println!("{} {}", "→".green(), target.path),
            Navigation::Redirect { from, to } => {
                println!("{} {} requires sign-in, redirected to {}", "→".yellow(), from, to)
            }
            Navigation::NotFound { path } => println!("{} no view at {}", "✗".red(), path),
        },
        Command::Meta => {
            app.meta().load_all().await;
            for store in [app.meta().task_types(), app.meta().users(), app.meta().groups()] {
                print_collection(app, store);
            }
        }
        Command::Tasks(cmd) => match cmd {
            TasksCommand::List => {
                app.tasks().fetch_all().await;
                print_collection(app, app.tasks());
            }
            TasksCommand::Show { id } => {
                let task = app.tasks().fetch_by_id(id).await?;
                println!("{}", serde_json::to_string_pretty(&task)?);
            }
            TasksCommand::Create { json } => {
                app.tasks().create(&parse_json(&json)?).await?;
                app.notices().success("Task created");
                print_collection(app, app.tasks());
            }
        },
        Command::TaskTypes(cmd) => {
            let meta = app.meta();
            match cmd {
                TaskTypesCommand::List => meta.task_types().fetch_all().await,
                TaskTypesCommand::Create { json } => {
                    meta.create_task_type(&parse_json(&json)?).await?;
                    app.notices().success("Task type created");
                }
                TaskTypesCommand::Update { id, json } => {
                    meta.update_task_type(id, &parse_json(&json)?).await?;
                    app.notices().success(format!("Task type #{} updated", id));
                }
                TaskTypesCommand::Delete { id } => {
                    meta.delete_task_type(id).await?;
                    app.notices().success(format!("Task type #{} deleted", id));
                }
            }
            print_collection(app, meta.task_types());
        }
        Command::Groups(cmd) => {
            match cmd {
                GroupsCommand::List => app.meta().groups().fetch_all().await,
                GroupsCommand::Delete { id } => {
                    app.meta().delete_group(id).await?;
                    app.notices().success(format!("Group #{} deleted", id));
                }
            }
            print_collection(app, app.meta().groups());
        }
        Command::Users(UsersCommand::List) => {
            app.meta().users().fetch_all().await;
            print_collection(app, app.meta().users());
        }
        Command::Notifications(cmd) => {
            let store = app.notifications();
            match cmd {
                NotificationsCommand::List => store.fetch_all().await,
                NotificationsCommand::Read { id } => {
                    store.fetch_all().await;
                    store.mark_read(id).await?;
                }
                NotificationsCommand::ReadAll => {
                    store.fetch_all().await;
                    store.mark_all_read().await?;
                }
            }
            if let Some(error) = store.error() {
                app.notices().warning(error);
            }
            for notification in store.notifications() {
                let marker = if notification.is_read { " ".normal() } else { "•".cyan() };
                println!(
                    "{} #{} {}",
                    marker,
                    notification.id,
                    notification.message().unwrap_or("")
                );
            }
            println!("{}", format!("{} unread", store.unread_count()).dimmed());
        }
    }

    Ok(())
}

/// View a command renders, for commands that need a signed-in session.
fn view_for(command: &Command) -> Option<&'static str> {
    match command {
        Command::Login { .. } | Command::Logout | Command::Whoami | Command::Open { .. } => None,
        Command::Tasks(_) => Some("/tasks"),
        _ => Some("/dashboard"),
    }
}

fn guard(app: &App, view: &str) -> Result<()> {
    match app.router().navigate(view, app.session()) {
        Navigation::Proceed(_) => Ok(()),
        Navigation::Redirect { .. } => Err(TaskdeskError::Other(
            "Not signed in. Run `taskdesk login` first.".to_string(),
        )),
        Navigation::NotFound { path } => Err(TaskdeskError::Other(format!("No view at {}", path))),
    }
}

fn parse_json(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(TaskdeskError::Other("expected a JSON object".to_string()));
    }
    Ok(value)
}

fn print_collection(app: &App, store: &CollectionStore<Record>) {
    let collection = store.collection();
    if let Some(error) = store.error() {
        app.notices().warning(error);
    }

    println!("{}", collection.plural().to_uppercase().bold());
    let items = store.items();
    if items.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for record in items {
        let name = record.display_name(NAME_FIELDS).unwrap_or("");
        println!("  {} {}", format!("#{}", record.id).dimmed(), name);
    }
}

fn print_notices(app: &App) {
    for notice in app.notices().notices() {
        let line = match notice.kind {
            NoticeKind::Info => notice.message.normal(),
            NoticeKind::Success => notice.message.green(),
            NoticeKind::Warning => notice.message.yellow(),
            NoticeKind::Error => notice.message.red(),
        };
        eprintln!("{}", line);
    }
}
