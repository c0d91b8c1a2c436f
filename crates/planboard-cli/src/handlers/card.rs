use crate::cli::{CardAction, CardCreateArgs, CardUpdateArgs};
use crate::context::CliContext;
use crate::output;
use planboard_domain::{CardUpdate, FieldUpdate, NewCard};

pub async fn handle(ctx: &CliContext, action: CardAction) -> anyhow::Result<()> {
    let store = ctx.store();
    match action {
        CardAction::Create(args) => {
            let new_card = build_new_card(args)?;
            let card = store.create_card(new_card).await?;
            output::output_success(&card)
        }
        CardAction::List { board_id, column } => {
            let cards: Vec<_> = store
                .list_cards(board_id)
                .await?
                .into_iter()
                .filter(|c| column.map_or(true, |column| c.status == column))
                .collect();
            output::output_list(cards)
        }
        CardAction::Get { id } => {
            let card = store.get_card(id).await?;
            output::output_success(&card)
        }
        CardAction::Update(args) => {
            let id = args.id;
            let updates = build_card_update(args)?;
            let card = store.update_card(id, updates).await?;
            output::output_success(&card)
        }
        CardAction::Move {
            id,
            column,
            position,
        } => {
            let cards = store.reorder_card(id, column, position).await?;
            output::output_list(cards)
        }
        CardAction::Delete { id } => {
            store.soft_delete_card(id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}))
        }
        CardAction::Restore { id } => {
            let card = store.restore_card(id).await?;
            output::output_success(&card)
        }
        CardAction::Purge { id } => {
            store.permanently_delete_card(id).await?;
            output::output_success(serde_json::json!({"purged": id.to_string()}))
        }
        CardAction::Deleted { board_id } => {
            let cards = store.list_deleted_cards(board_id).await?;
            output::output_list(cards)
        }
    }
}

fn build_new_card(args: CardCreateArgs) -> anyhow::Result<NewCard> {
    let mut new_card = NewCard::new(args.title, args.column, args.board_id);
    new_card.content = args.content;
    if let Some(priority) = args.priority {
        new_card.priority = priority;
    }
    if let Some(card_type) = args.card_type {
        new_card.card_type = card_type;
    }
    new_card.due_date = args.due_date.as_deref().map(parse_datetime).transpose()?;
    Ok(new_card)
}

fn build_card_update(args: CardUpdateArgs) -> anyhow::Result<CardUpdate> {
    let content = if args.clear_content {
        FieldUpdate::Clear
    } else {
        args.content
            .map(FieldUpdate::Set)
            .unwrap_or(FieldUpdate::NoChange)
    };
    let due_date = if args.clear_due_date {
        FieldUpdate::Clear
    } else {
        match args.due_date.as_deref() {
            Some(d) => FieldUpdate::Set(parse_datetime(d)?),
            None => FieldUpdate::NoChange,
        }
    };
    let updates = CardUpdate {
        title: args.title,
        content,
        priority: args.priority,
        card_type: args.card_type,
        due_date,
        ..Default::default()
    };
    if updates.is_empty() {
        anyhow::bail!("Nothing to update for card {}", args.id);
    }
    Ok(updates)
}

fn parse_datetime(s: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ())
                .and_then(|d| d.and_hms_opt(0, 0, 0).ok_or(()))
                .map(|dt| dt.and_utc())
        })
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid date '{}'. Supported formats: YYYY-MM-DD or RFC 3339 (e.g., 2024-01-15T10:30:00Z)",
                s
            )
        })
}
