use clap::Subcommand;

/// Borrow request commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BorrowCommands {
    /// File a borrow request for a catalog book.
    Create {
        /// Member filing the request.
        #[arg(long)]
        member: String,
        /// Catalog id of the book.
        #[arg(long)]
        book: String,
        /// Book title, stored on the request for display.
        #[arg(long)]
        title: String,
        /// Book author, stored on the request for display.
        #[arg(long)]
        author: String,
    },
    /// Approve a pending request.
    Approve { id: String },
    /// Reject a request.
    Reject {
        id: String,
        /// Why the request was rejected. A default is stored when omitted.
        #[arg(long)]
        reason: Option<String>,
    },
    /// Hand the book over to the member.
    Handover {
        id: String,
        /// Agreed return date (YYYY-MM-DD). Required by the lifecycle.
        #[arg(long)]
        due: Option<String>,
    },
    /// Record the member asking to give the book back.
    RequestReturn { id: String },
    /// Record the physical return, completing the request.
    Return { id: String },
    /// Get a request by id.
    Get { id: String },
    /// List requests.
    List {
        /// Optional status filter.
        #[arg(long)]
        status: Option<String>,
        /// Optional member filter.
        #[arg(long)]
        member: Option<String>,
        /// Maximum number of requests.
        #[arg(long)]
        limit: Option<u32>,
    },
}
