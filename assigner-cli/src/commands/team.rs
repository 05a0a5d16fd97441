//! Team management commands

use std::str::FromStr;

use assigner_core::{Config, Team, TeamMember};
use clap::{Args, Subcommand};

use super::{open_service, print_json};

/// Team management commands
#[derive(Args, Debug)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub command: TeamCommand,
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Create a team with its members
    Add {
        /// Team name
        name: String,

        /// Member as ID:NAME, or ID:NAME:inactive (repeatable, roster order)
        #[arg(short, long = "member")]
        members: Vec<MemberArg>,
    },

    /// Show a team and its members
    Get {
        /// Team name
        name: String,
    },
}

/// Team member given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberArg(TeamMember);

impl FromStr for MemberArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (id, name) = match (parts.next(), parts.next()) {
            (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => (id, name),
            _ => return Err(format!("expected ID:NAME[:inactive], got '{}'", s)),
        };

        let member = TeamMember::new(id, name);
        match parts.next() {
            None | Some("active") => Ok(Self(member)),
            Some("inactive") => Ok(Self(member.inactive())),
            Some(other) => Err(format!("unknown member flag '{}'", other)),
        }
    }
}

impl TeamArgs {
    /// Execute the team command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = open_service(config).await?;

        match &self.command {
            TeamCommand::Add { name, members } => {
                let members = members.iter().map(|m| m.0.clone()).collect();
                let team = service.create_team(Team::new(name.as_str(), members)).await?;
                print_json(&team)
            }
            TeamCommand::Get { name } => print_json(&service.get_team(name).await?),
        }
    }
}
