use crate::cli::ListAction;
use crate::context::CliContext;
use crate::handlers::{finish, run_drag};
use crate::output;
use serde_json::json;
use taskboard_domain::DragGesture;

pub async fn handle(ctx: &CliContext, action: ListAction) -> anyhow::Result<()> {
    match action {
        ListAction::Create { board_id, name } => {
            let session = ctx.open_session(board_id).await?;
            let result = session.create_list(name).await;
            finish(session, result).await?;
        }
        ListAction::Move {
            board_id,
            list_id,
            to,
        } => {
            let session = ctx.open_session(board_id).await?;
            let Some(from) = session.store().locate_list(list_id) else {
                return output::output_error(&format!(
                    "List {} not found on board {}",
                    list_id, board_id
                ));
            };
            run_drag(session, DragGesture::list(list_id, board_id, from, Some(to))).await;
        }
        ListAction::Rename { list_id, name } => {
            let session = ctx.open_list_session(list_id).await?;
            let result = session.rename_list(list_id, name).await;
            finish(session, result).await?;
        }
        ListAction::Delete { list_id } => {
            let session = ctx.open_list_session(list_id).await?;
            let result = session.delete_list(list_id).await;
            let result = result.map(|()| json!({ "deleted": list_id.to_string() }));
            finish(session, result).await?;
        }
    }
    Ok(())
}
