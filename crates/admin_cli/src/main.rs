use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    style::Print,
    terminal,
};
use engine::{
    Role,
    entities::{employees, users},
};
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[derive(Parser, Debug)]
#[command(name = "muster_admin")]
#[command(about = "Admin utilities for Muster (bootstrap users and the employee directory)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./muster.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage login accounts.
    #[command(subcommand)]
    User(UserCommand),
    /// Manage the employee directory.
    #[command(subcommand)]
    Employee(EmployeeCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
    Activate(UserRefArgs),
    Deactivate(UserRefArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    username: String,
    #[arg(long)]
    role: String,
    /// Directory code this account acts for; reviewers may go without one.
    #[arg(long)]
    employee_code: Option<String>,
}

#[derive(Args, Debug)]
struct UserRefArgs {
    username: String,
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    Create(EmployeeCreateArgs),
}

#[derive(Args, Debug)]
struct EmployeeCreateArgs {
    code: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    designation: Option<String>,
    /// Employee code of the reporting manager.
    #[arg(long)]
    manager: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    match raw {
        "Admin" | "admin" => Ok(Role::Admin),
        "HR" | "hr" => Ok(Role::Hr),
        "Management" | "management" => Ok(Role::Management),
        "Employee" | "employee" => Ok(Role::Employee),
        other => Err(format!("unsupported role: {other}")),
    }
}

/// Disables terminal raw mode when dropped.
struct RawMode;

impl RawMode {
    fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads a line from the keyboard, echoing `*` per character.
fn read_masked(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    write!(out, "{prompt}")?;
    out.flush()?;

    let entered = {
        let _raw = RawMode::enter()?;
        let mut entered = String::new();
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };

            match key.code {
                KeyCode::Enter => break,
                KeyCode::Backspace => {
                    if entered.pop().is_some() {
                        execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    }
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    execute!(out, Print("\r\n"))?;
                    return Err("interrupted".into());
                }
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    entered.push(ch);
                    execute!(out, Print('*'))?;
                }
                _ => {}
            }
        }
        entered
    };

    eprintln!();
    Ok(entered)
}

/// Prompts for a new password: typed twice, three attempts.
fn prompt_new_password() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let first = read_masked("Password: ")?;
        if first.is_empty() {
            eprintln!("Password must not be empty.");
            continue;
        }

        if first == read_masked("Confirm password: ")? {
            return Ok(first);
        }
        eprintln!("Passwords do not match. Try again.");
    }

    Err("too many attempts".into())
}

async fn set_active(
    db: &DatabaseConnection,
    username: &str,
    is_active: bool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if users::Entity::find_by_id(username).one(db).await?.is_none() {
        eprintln!("user not found: {username}");
        std::process::exit(1);
    }

    let user = users::ActiveModel {
        username: Set(username.to_string()),
        is_active: Set(is_active),
        ..Default::default()
    };
    users::Entity::update(user).exec(db).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    match cli.command {
        Command::User(UserCommand::Create(args)) => {
            let role = match parse_role(&args.role) {
                Ok(v) => v,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let password = prompt_new_password()?;
            let password_hash =
                engine::hash_password(&password).map_err(|err| err.to_string())?;

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password_hash: Set(password_hash),
                role: Set(role.as_str().to_string()),
                employee_code: Set(args.employee_code),
                is_active: Set(true),
                last_login: Set(None),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::User(UserCommand::Activate(args)) => {
            set_active(&db, &args.username, true).await?;
            println!("activated user: {}", args.username);
        }
        Command::User(UserCommand::Deactivate(args)) => {
            set_active(&db, &args.username, false).await?;
            println!("deactivated user: {}", args.username);
        }
        Command::Employee(EmployeeCommand::Create(args)) => {
            if employees::Entity::find()
                .filter(employees::Column::EmployeeCode.eq(args.code.clone()))
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("employee already exists: {}", args.code);
                std::process::exit(1);
            }

            let employee = employees::ActiveModel {
                employee_code: Set(args.code.clone()),
                name: Set(args.name),
                designation: Set(args.designation),
                reporting_manager: Set(args.manager),
                employment_status: Set(employees::STATUS_ACTIVE.to_string()),
                ..Default::default()
            };
            employees::Entity::insert(employee).exec(&db).await?;

            println!("created employee: {}", args.code);
        }
    }

    Ok(())
}
