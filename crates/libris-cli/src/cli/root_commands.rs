use clap::{Args, Subcommand};

use crate::cli::subcommands::{BorrowCommands, DonationCommands, MemberCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Borrow requests.
    Borrow {
        #[command(subcommand)]
        action: BorrowCommands,
    },
    /// Donation requests.
    Donation {
        #[command(subcommand)]
        action: DonationCommands,
    },
    /// Member history and activity timeline.
    Member {
        #[command(subcommand)]
        action: MemberCommands,
    },
    /// Query the audit trail.
    Audit(AuditArgs),
}

/// Arguments for `lbr audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Filter by entity type: borrow, donation
    #[arg(long)]
    pub entity_type: Option<String>,

    /// Filter by entity id
    #[arg(long)]
    pub entity_id: Option<String>,

    /// Filter by action: created, status-changed
    #[arg(long)]
    pub action: Option<String>,

    /// Filter by member id
    #[arg(long)]
    pub member: Option<String>,

    /// Max entries to return
    #[arg(long)]
    pub limit: Option<u32>,
}
