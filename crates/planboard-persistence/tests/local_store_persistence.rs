use planboard_domain::position::verify_all_dense;
use planboard_domain::{CardStore, CardUpdate, Column, FieldUpdate, NewCard, UserRef};
use planboard_persistence::LocalCardStore;
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planboard.json");

    let (board_id, moved_id) = {
        let store = LocalCardStore::open(&path).await.unwrap();
        let board = store
            .create_board("Ops".to_string(), Some(UserRef::new("u-1", "Robin")))
            .await
            .unwrap();
        for title in ["A", "B", "C"] {
            store
                .create_card(NewCard::new(title, Column::Backlog, Some(board.id)))
                .await
                .unwrap();
        }
        let cards = store.list_cards(Some(board.id)).await.unwrap();
        let c = cards.iter().find(|c| c.title == "C").unwrap().id;
        store.reorder_card(c, Column::Backlog, 0).await.unwrap();
        (board.id, c)
    };
    assert!(path.exists());

    let reopened = LocalCardStore::open(&path).await.unwrap();
    let boards = reopened.list_boards().await.unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].creator.as_ref().unwrap().name, "Robin");

    let cards = reopened.list_cards(Some(board_id)).await.unwrap();
    let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
    assert_eq!(cards[0].id, moved_id);
    assert_eq!(cards[0].position, 0);
}

#[tokio::test]
async fn missing_file_opens_empty_and_is_created_on_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sub").join("planboard.json");

    let store = LocalCardStore::open(&path).await.unwrap();
    assert!(store.list_boards().await.unwrap().is_empty());
    assert!(!path.exists());

    store.create_board("Ops".to_string(), None).await.unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), Some(path.as_path()));
}

#[tokio::test]
async fn soft_delete_restore_and_purge_persist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planboard.json");
    let store = LocalCardStore::open(&path).await.unwrap();
    let board = store.create_board("Ops".to_string(), None).await.unwrap();
    let keep = store
        .create_card(NewCard::new("Keep", Column::InProgress, Some(board.id)))
        .await
        .unwrap();
    let purge = store
        .create_card(NewCard::new("Purge", Column::InProgress, Some(board.id)))
        .await
        .unwrap();

    store.soft_delete_card(keep.id).await.unwrap();
    store.soft_delete_card(purge.id).await.unwrap();
    store.restore_card(keep.id).await.unwrap();
    store.permanently_delete_card(purge.id).await.unwrap();

    let reopened = LocalCardStore::open(&path).await.unwrap();
    let visible = reopened.list_cards(Some(board.id)).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Keep");
    assert_eq!(visible[0].position, 0);
    assert!(reopened.get_card(purge.id).await.is_err());
    assert!(reopened
        .list_deleted_cards(Some(board.id))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn update_patches_fields_without_moving() {
    let store = LocalCardStore::in_memory();
    let card = store
        .create_card(NewCard::new("Draft", Column::OnDeck, None).with_content("<p>hi</p>"))
        .await
        .unwrap();

    let updated = store
        .update_card(
            card.id,
            CardUpdate {
                title: Some("Final".to_string()),
                content: FieldUpdate::Clear,
                assignee: FieldUpdate::Set(UserRef::new("u-2", "Kai")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert!(updated.content.is_none());
    assert_eq!(updated.assignee.unwrap().name, "Kai");
    assert_eq!(updated.status, Column::OnDeck);
    assert_eq!(updated.position, card.position);
}

#[tokio::test]
async fn delete_board_moves_cards_to_unassigned_bucket() {
    let store = LocalCardStore::in_memory();
    let board = store.create_board("Ops".to_string(), None).await.unwrap();
    store
        .create_card(NewCard::new("Old", Column::Done, None))
        .await
        .unwrap();
    store
        .create_card(NewCard::new("New", Column::Done, Some(board.id)))
        .await
        .unwrap();

    store.delete_board(board.id).await.unwrap();

    assert!(store.list_boards().await.unwrap().is_empty());
    let titles: Vec<_> = store
        .list_cards(None)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["Old", "New"]);
}

#[tokio::test]
async fn concurrent_reorders_are_serialized() {
    let store = Arc::new(LocalCardStore::in_memory());
    let board = store.create_board("Ops".to_string(), None).await.unwrap();
    let mut ids = Vec::new();
    for i in 0..8 {
        let column = Column::ALL[i % Column::ALL.len()];
        let card = store
            .create_card(NewCard::new(format!("card-{}", i), column, Some(board.id)))
            .await
            .unwrap();
        ids.push(card.id);
    }

    let mut handles = Vec::new();
    for (i, id) in ids.iter().cycle().take(40).enumerate() {
        let store = Arc::clone(&store);
        let id = *id;
        handles.push(tokio::spawn(async move {
            let column = Column::ALL[(i * 3) % Column::ALL.len()];
            store.reorder_card(id, column, (i % 5) as i32).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = store.snapshot().await;
    assert!(verify_all_dense(&snapshot.cards).is_ok());
    assert_eq!(store.list_cards(Some(board.id)).await.unwrap().len(), 8);
}
