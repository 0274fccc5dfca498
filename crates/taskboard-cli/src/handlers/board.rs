use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;
use chrono::Utc;
use serde::Serialize;
use taskboard_client::BoardSession;
use taskboard_domain::{BoardSnapshot, CardId, DueStatus};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DueCard {
    card_id: CardId,
    title: String,
    status: DueStatus,
}

#[derive(Serialize)]
struct BoardView {
    board: BoardSnapshot,
    due: Vec<DueCard>,
}

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Create { name, color } => {
            let board = ctx.backend().create_board(name, color).await?;
            output::output_success(&board);
        }
        BoardAction::List => {
            let boards = ctx.backend().boards().await?;
            output::output_list(boards);
        }
        BoardAction::Show { id } => {
            let session = BoardSession::new(id, ctx.backend());
            session.load().await?;
            let Some(board) = session.store().to_snapshot() else {
                return output::output_error(&format!("Board not found: {}", id));
            };

            let now = Utc::now();
            let due = board
                .lists
                .iter()
                .flat_map(|list| &list.cards)
                .filter_map(|card| {
                    card.due_status(now).map(|status| DueCard {
                        card_id: card.id,
                        title: card.title.clone(),
                        status,
                    })
                })
                .collect();
            output::output_success(BoardView { board, due });
        }
    }
    Ok(())
}
