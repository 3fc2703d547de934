use clap::Subcommand;

/// Donation request commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DonationCommands {
    /// Offer a book to the library.
    Create {
        /// Member offering the donation.
        #[arg(long)]
        member: String,
        /// Title of the offered book.
        #[arg(long)]
        title: String,
        /// Author of the offered book.
        #[arg(long)]
        author: String,
    },
    /// Approve a pending offer.
    Approve { id: String },
    /// Reject an offer.
    Reject {
        id: String,
        /// Why the offer was rejected. A default is stored when omitted.
        #[arg(long)]
        reason: Option<String>,
    },
    /// Record receipt of the donated book, completing the offer.
    Complete { id: String },
    /// Get an offer by id.
    Get { id: String },
    /// List offers.
    List {
        /// Optional status filter.
        #[arg(long)]
        status: Option<String>,
        /// Optional member filter.
        #[arg(long)]
        member: Option<String>,
        /// Maximum number of offers.
        #[arg(long)]
        limit: Option<u32>,
    },
}
