use libris_core::timeline::TimelineFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MemberCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lbr member`.
pub async fn handle(
    action: &MemberCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MemberCommands::History { member } => {
            let history = ctx.service.member_history(member).await?;
            output(&history, flags.format)
        }
        MemberCommands::Timeline {
            member,
            book,
            title,
            author,
        } => {
            let filter = TimelineFilter {
                book_id: book.clone(),
                title: title.clone(),
                author: author.clone(),
            };
            let events = ctx.service.member_timeline(member, &filter).await?;
            output(&events, flags.format)
        }
    }
}
