//! Account provisioning for operators.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin who signs in with an e-mailed code
//! DATABASE_URL=postgres://... provision create --email ada@example.com --password '...' --admin --mfa
//!
//! # Flip flags on an existing account
//! provision set-admin --email ada@example.com false
//! provision set-mfa --email ada@example.com true
//! ```
//!
//! Users are never deleted.

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser, Subcommand};

use coursemart_auth::config::ProvisionConfig;
use coursemart_auth::domain::types::UserRecord;
use coursemart_auth::infra::db::{DbUserRepository, connect};
use coursemart_auth::usecase::provision::{
    CreateUserInput, CreateUserUseCase, SetPasswordInput, SetPasswordUseCase, ShowUserUseCase,
    UpdateUserFlagsInput, UpdateUserFlagsUseCase,
};
use coursemart_core::config::Config;
use coursemart_core::tracing::init_cli_tracing;

#[derive(Parser)]
#[command(about = "Create and update course platform accounts")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a user with a password
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        /// Grant access to the admin area
        #[arg(long)]
        admin: bool,
        /// Require an e-mailed code at sign-in
        #[arg(long)]
        mfa: bool,
    },
    /// Grant or revoke admin access
    SetAdmin {
        #[arg(long)]
        email: String,
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
    /// Enable or disable the e-mailed sign-in code
    SetMfa {
        #[arg(long)]
        email: String,
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
    /// Replace a user's password
    SetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Print a user's account flags
    Show {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_cli_tracing();
    let args = Args::parse();

    let config = ProvisionConfig::from_env();
    let db = connect(&config.database_url, config.timeout())
        .await
        .context("failed to connect to database")?;
    let users = DbUserRepository { db };

    match args.command {
        Command::Create {
            email,
            password,
            name,
            admin,
            mfa,
        } => {
            let user = CreateUserUseCase { users }
                .execute(CreateUserInput {
                    email,
                    password,
                    name,
                    is_admin: admin,
                    mfa_enabled: mfa,
                })
                .await?;
            println!("created {}", user.id);
            print_user(&user);
        }
        Command::SetAdmin { email, value } => {
            let user = UpdateUserFlagsUseCase { users }
                .execute(UpdateUserFlagsInput {
                    email,
                    is_admin: Some(value),
                    mfa_enabled: None,
                })
                .await?;
            print_user(&user);
        }
        Command::SetMfa { email, value } => {
            let user = UpdateUserFlagsUseCase { users }
                .execute(UpdateUserFlagsInput {
                    email,
                    is_admin: None,
                    mfa_enabled: Some(value),
                })
                .await?;
            print_user(&user);
        }
        Command::SetPassword { email, password } => {
            SetPasswordUseCase { users }
                .execute(SetPasswordInput {
                    email: email.clone(),
                    password,
                })
                .await?;
            println!("password updated for {email}");
        }
        Command::Show { email } => {
            let user = ShowUserUseCase { users }.execute(&email).await?;
            print_user(&user);
        }
    }

    Ok(())
}

fn print_user(user: &UserRecord) {
    println!("id:           {}", user.id);
    println!("email:        {}", user.email);
    println!("name:         {}", user.name.as_deref().unwrap_or("-"));
    println!("admin:        {}", user.is_admin);
    println!("mfa:          {}", user.mfa_enabled);
    println!("password set: {}", user.hashed_password.is_some());
}
