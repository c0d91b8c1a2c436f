use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;
use planboard_domain::UserRef;

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    let store = ctx.store();
    match action {
        BoardAction::Create {
            name,
            creator_id,
            creator_name,
        } => {
            let creator = creator_id
                .zip(creator_name)
                .map(|(id, name)| UserRef::new(id, name));
            let board = store.create_board(name, creator).await?;
            output::output_success(&board)
        }
        BoardAction::List => {
            let boards = store.list_boards().await?;
            output::output_list(boards)
        }
        BoardAction::Rename { id, name } => {
            let board = store.rename_board(id, name).await?;
            output::output_success(&board)
        }
        BoardAction::Delete { id } => {
            store.delete_board(id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}))
        }
    }
}
