use libris_core::enums::DonationStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DonationCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lbr donation`.
pub async fn handle(
    action: &DonationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DonationCommands::Create {
            member,
            title,
            author,
        } => {
            let request = ctx.service.create_donation(member, title, author).await?;
            output(&request, flags.format)
        }
        DonationCommands::Approve { id } => {
            let request = ctx.service.approve_donation(id).await?;
            output(&request, flags.format)
        }
        DonationCommands::Reject { id, reason } => {
            let request = ctx.service.reject_donation(id, reason.as_deref()).await?;
            output(&request, flags.format)
        }
        DonationCommands::Complete { id } => {
            let request = ctx.service.complete_donation(id).await?;
            output(&request, flags.format)
        }
        DonationCommands::Get { id } => {
            let request = ctx.service.get_donation(id).await?;
            output(&request, flags.format)
        }
        DonationCommands::List {
            status,
            member,
            limit,
        } => {
            let status = status
                .as_deref()
                .map(|value| parse_enum::<DonationStatus>(value, "status"))
                .transpose()?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let requests = ctx
                .service
                .list_donations(status, member.as_deref(), limit)
                .await?;
            output(&requests, flags.format)
        }
    }
}
