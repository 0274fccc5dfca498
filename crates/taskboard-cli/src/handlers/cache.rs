use crate::cli::CacheAction;
use crate::context::CliContext;
use crate::output;
use taskboard_client::BoardSession;
use taskboard_persistence::BoardCache;

pub async fn handle(ctx: &CliContext, action: CacheAction) -> anyhow::Result<()> {
    match action {
        CacheAction::Show { board_id } => {
            // Only the warm start is used; the backend is never contacted
            let session = BoardSession::new(board_id, ctx.backend());
            if !session.warm_start(&ctx.cache(), ctx.cache_retention()).await {
                return output::output_error(&format!(
                    "No fresh cache record for board {}",
                    board_id
                ));
            }
            output::output_success(session.store());
        }
        CacheAction::Clear { board_id } => {
            ctx.cache().remove(board_id).await?;
            output::output_success(serde_json::json!({ "cleared": board_id.to_string() }));
        }
    }
    Ok(())
}
