use clap::Subcommand;

/// Member-facing queries.
#[derive(Clone, Debug, Subcommand)]
pub enum MemberCommands {
    /// Full request history for a member, newest first per kind.
    History { member: String },
    /// Reconstructed per-stage activity timeline, newest first.
    Timeline {
        member: String,
        /// Only events for this catalog book id.
        #[arg(long)]
        book: Option<String>,
        /// Only events whose book title matches exactly.
        #[arg(long)]
        title: Option<String>,
        /// Only events whose book author matches exactly.
        #[arg(long)]
        author: Option<String>,
    },
}
