use libris_core::enums::BorrowStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BorrowCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_due_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `lbr borrow`.
pub async fn handle(
    action: &BorrowCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BorrowCommands::Create {
            member,
            book,
            title,
            author,
        } => {
            let request = ctx.service.create_borrow(member, book, title, author).await?;
            output(&request, flags.format)
        }
        BorrowCommands::Approve { id } => {
            let request = ctx.service.approve_borrow(id).await?;
            output(&request, flags.format)
        }
        BorrowCommands::Reject { id, reason } => {
            let request = ctx.service.reject_borrow(id, reason.as_deref()).await?;
            output(&request, flags.format)
        }
        BorrowCommands::Handover { id, due } => {
            let due_date = due.as_deref().map(parse_due_date).transpose()?;
            let request = ctx.service.handover_borrow(id, due_date).await?;
            output(&request, flags.format)
        }
        BorrowCommands::RequestReturn { id } => {
            let request = ctx.service.request_return(id).await?;
            output(&request, flags.format)
        }
        BorrowCommands::Return { id } => {
            let request = ctx.service.return_borrow(id).await?;
            output(&request, flags.format)
        }
        BorrowCommands::Get { id } => {
            let request = ctx.service.get_borrow(id).await?;
            output(&request, flags.format)
        }
        BorrowCommands::List {
            status,
            member,
            limit,
        } => {
            let status = status
                .as_deref()
                .map(|value| parse_enum::<BorrowStatus>(value, "status"))
                .transpose()?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let requests = ctx
                .service
                .list_borrows(status, member.as_deref(), limit)
                .await?;
            output(&requests, flags.format)
        }
    }
}
