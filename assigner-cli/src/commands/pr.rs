//! Pull request commands

use assigner_core::Config;
use clap::{Args, Subcommand};

use super::{open_service, print_json};

/// Pull request commands
#[derive(Args, Debug)]
pub struct PrArgs {
    #[command(subcommand)]
    pub command: PrCommand,
}

#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// Open a pull request and assign reviewers
    Create {
        /// Pull request ID
        id: String,

        /// Pull request title
        #[arg(short, long)]
        title: String,

        /// Author user ID
        #[arg(short, long)]
        author: String,
    },

    /// Merge a pull request
    Merge {
        /// Pull request ID
        id: String,
    },

    /// Replace a reviewer with another member of the reviewer's team
    Reassign {
        /// Pull request ID
        id: String,

        /// Reviewer to replace
        #[arg(short, long)]
        old_reviewer: String,
    },
}

impl PrArgs {
    /// Execute the pr command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = open_service(config).await?;

        match &self.command {
            PrCommand::Create { id, title, author } => {
                print_json(&service.create_pull_request(id, title, author).await?)
            }
            PrCommand::Merge { id } => print_json(&service.merge_pull_request(id).await?),
            PrCommand::Reassign { id, old_reviewer } => {
                print_json(&service.reassign_reviewer(id, old_reviewer).await?)
            }
        }
    }
}
