use crate::cli::{CardAction, CardMoveArgs, CardUpdateArgs};
use crate::context::CliContext;
use crate::handlers::{finish, run_drag};
use crate::output;
use serde_json::json;
use taskboard_domain::{CardUpdate, DragGesture, DropLocation, FieldUpdate, NewCard};

pub async fn handle(ctx: &CliContext, action: CardAction) -> anyhow::Result<()> {
    match action {
        CardAction::Create {
            list_id,
            title,
            description,
            due,
        } => {
            let session = ctx.open_list_session(list_id).await?;
            let card = NewCard {
                title,
                description,
                due_date: due,
            };
            let result = session.create_card(list_id, card).await;
            finish(session, result).await?;
        }
        CardAction::Update(args) => handle_update(ctx, args).await?,
        CardAction::Move(args) => handle_move(ctx, args).await?,
        CardAction::Delete { card_id } => {
            let session = ctx.open_card_session(card_id).await?;
            let result = session.delete_card(card_id).await;
            let result = result.map(|()| json!({ "deleted": card_id.to_string() }));
            finish(session, result).await?;
        }
    }
    Ok(())
}

/// `Set` when a value was given, `Clear` when asked to, else `NoChange`.
fn field_update<T>(value: Option<T>, clear: bool) -> FieldUpdate<T> {
    match value {
        Some(value) => FieldUpdate::Set(value),
        None if clear => FieldUpdate::Clear,
        None => FieldUpdate::NoChange,
    }
}

async fn handle_update(ctx: &CliContext, args: CardUpdateArgs) -> anyhow::Result<()> {
    let updates = CardUpdate {
        title: args.title,
        description: field_update(args.description, args.clear_description),
        due_date: field_update(args.due, args.clear_due),
    };
    if updates.is_empty() {
        return output::output_error("Nothing to update");
    }

    let session = ctx.open_card_session(args.card_id).await?;
    let result = session.update_card(args.card_id, updates).await;
    finish(session, result).await
}

async fn handle_move(ctx: &CliContext, args: CardMoveArgs) -> anyhow::Result<()> {
    let session = ctx.open_session(args.board_id).await?;
    let Some((from_list, from_index)) = session.store().locate_card(args.card_id) else {
        return output::output_error(&format!(
            "Card {} not found on board {}",
            args.card_id, args.board_id
        ));
    };

    let gesture = DragGesture::card(
        args.card_id,
        DropLocation::new(from_list, from_index),
        Some(DropLocation::new(args.to_list.unwrap_or(from_list), args.to)),
    );
    run_drag(session, gesture).await;
    Ok(())
}
