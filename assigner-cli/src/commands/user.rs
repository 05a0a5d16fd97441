//! User commands

use assigner_core::Config;
use clap::{Args, Subcommand};

use super::{open_service, print_json};

/// User commands
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Mark a user as eligible (or not) for new review assignments
    SetActive {
        /// User ID
        user_id: String,

        /// New active flag
        #[arg(long, required = true, action = clap::ArgAction::Set)]
        active: bool,
    },
}

impl UserArgs {
    /// Execute the user command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = open_service(config).await?;

        match &self.command {
            UserCommand::SetActive { user_id, active } => {
                print_json(&service.set_user_active(user_id, *active).await?)
            }
        }
    }
}
