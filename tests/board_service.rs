//! Service-level tests for the board CRUD and listing contract.

mod common;

use campus_board::core::error::AppError;
use campus_board::core::types::{BoardForm, BoardType, CommentForm};

use common::{register_user, test_state};

fn form(title: &str, board_type: &str) -> BoardForm {
    BoardForm {
        title: title.to_string(),
        body: format!("{} body", title),
        board_type: board_type.to_string(),
    }
}

fn comment(body: &str) -> CommentForm {
    CommentForm {
        body: body.to_string(),
    }
}

#[tokio::test]
async fn writer_is_always_the_caller() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    let id = state
        .board_service
        .create(&form("hello", "general"), Some(&alice))
        .await
        .unwrap();

    let detail = state
        .board_service
        .get_detail(id, Some(&alice))
        .await
        .unwrap();
    assert_eq!(detail.board.writer, alice.id);
    assert_eq!(detail.board.writer_name, "alice");
}

#[tokio::test]
async fn only_the_writer_may_update() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;
    let bob = register_user(&state, "bob").await;

    let id = state
        .board_service
        .create(&form("original", "general"), Some(&alice))
        .await
        .unwrap();

    let err = state
        .board_service
        .update(id, &form("hijacked", "general"), Some(&bob))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // The failed attempt must not have mutated anything
    let detail = state
        .board_service
        .get_detail(id, Some(&bob))
        .await
        .unwrap();
    assert_eq!(detail.board.title, "original");
    assert_eq!(detail.board.writer, alice.id);
}

#[tokio::test]
async fn only_the_writer_may_delete() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;
    let bob = register_user(&state, "bob").await;

    let id = state
        .board_service
        .create(&form("keep me", "contest"), Some(&alice))
        .await
        .unwrap();

    let err = state
        .board_service
        .delete(id, Some(&bob))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    assert!(state
        .board_service
        .get_detail(id, Some(&bob))
        .await
        .is_ok());
}

#[tokio::test]
async fn update_changes_fields_but_not_the_writer() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    let id = state
        .board_service
        .create(&form("before", "general"), Some(&alice))
        .await
        .unwrap();

    state
        .board_service
        .update(id, &form("after", "notice"), Some(&alice))
        .await
        .unwrap();

    let detail = state
        .board_service
        .get_detail(id, Some(&alice))
        .await
        .unwrap();
    assert_eq!(detail.board.title, "after");
    assert_eq!(detail.board.board_type, BoardType::Notice);
    assert_eq!(detail.board.writer, alice.id);
}

#[tokio::test]
async fn list_filters_by_type_newest_first() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    for i in 0..3 {
        state
            .board_service
            .create(&form(&format!("notice {}", i), "notice"), Some(&alice))
            .await
            .unwrap();
        state
            .board_service
            .create(&form(&format!("general {}", i), "general"), Some(&alice))
            .await
            .unwrap();
    }

    let page = state
        .board_service
        .list(Some(BoardType::Notice), 1, Some(&alice))
        .await
        .unwrap();

    assert!(page.items.len() <= 4);
    assert_eq!(page.items.len(), 3);
    assert!(page
        .items
        .iter()
        .all(|b| b.board_type == BoardType::Notice));
    let ids: Vec<i64> = page.items.iter().map(|b| b.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn listing_slices_pages_of_four() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    let mut ids = Vec::new();
    for i in 0..10 {
        let id = state
            .board_service
            .create(&form(&format!("contest {}", i), "contest"), Some(&alice))
            .await
            .unwrap();
        ids.push(id);
    }

    let first = state
        .board_service
        .list(Some(BoardType::Contest), 1, Some(&alice))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 4);
    assert_eq!(first.items[0].id, ids[9]);
    assert_eq!(first.total_pages, 3);

    // Page 3 holds exactly the two oldest posts
    let third = state
        .board_service
        .list(Some(BoardType::Contest), 3, Some(&alice))
        .await
        .unwrap();
    let third_ids: Vec<i64> = third.items.iter().map(|b| b.id).collect();
    assert_eq!(third_ids, vec![ids[1], ids[0]]);

    // Past the end: empty page, not an error
    let fourth = state
        .board_service
        .list(Some(BoardType::Contest), 4, Some(&alice))
        .await
        .unwrap();
    assert!(fourth.items.is_empty());
}

#[tokio::test]
async fn unfiltered_list_spans_all_types() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    state
        .board_service
        .create(&form("a", "notice"), Some(&alice))
        .await
        .unwrap();
    state
        .board_service
        .create(&form("b", "dsum"), Some(&alice))
        .await
        .unwrap();
    state
        .board_service
        .create(&form("c", "tutoring"), Some(&alice))
        .await
        .unwrap();

    let page = state.board_service.list(None, 1, Some(&alice)).await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_items, 3);
}

#[tokio::test]
async fn detail_comments_are_newest_first_and_scoped() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;
    let bob = register_user(&state, "bob").await;

    let first = state
        .board_service
        .create(&form("first", "general"), Some(&alice))
        .await
        .unwrap();
    let second = state
        .board_service
        .create(&form("second", "general"), Some(&alice))
        .await
        .unwrap();

    for body in ["one", "two", "three"] {
        state
            .comment_service
            .create(first, &comment(body), Some(&bob))
            .await
            .unwrap();
    }
    state
        .comment_service
        .create(second, &comment("elsewhere"), Some(&bob))
        .await
        .unwrap();

    let detail = state
        .board_service
        .get_detail(first, Some(&alice))
        .await
        .unwrap();
    let bodies: Vec<&str> = detail.comments.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["three", "two", "one"]);
    assert!(detail.comments.iter().all(|c| c.board_id == first));
    for window in detail.comments.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }
}

#[tokio::test]
async fn delete_removes_the_post() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    let id = state
        .board_service
        .create(&form("short lived", "dsum"), Some(&alice))
        .await
        .unwrap();
    state
        .comment_service
        .create(id, &comment("gone soon"), Some(&alice))
        .await
        .unwrap();

    state.board_service.delete(id, Some(&alice)).await.unwrap();

    let err = state
        .board_service
        .get_detail(id, Some(&alice))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn unauthenticated_calls_are_rejected() {
    let state = test_state().await;

    let err = state.board_service.list(None, 1, None).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));

    let err = state.board_service.get_detail(1, None).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));

    let err = state
        .board_service
        .create(&form("nope", "general"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
}

#[tokio::test]
async fn create_rejects_invalid_fields_and_persists_nothing() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    let bad = BoardForm {
        title: "  ".to_string(),
        body: "has a body".to_string(),
        board_type: "gossip".to_string(),
    };
    let err = state
        .board_service
        .create(&bad, Some(&alice))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(errors) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["title", "type"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let page = state.board_service.list(None, 1, Some(&alice)).await.unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn missing_posts_are_not_found() {
    let state = test_state().await;
    let alice = register_user(&state, "alice").await;

    let err = state
        .board_service
        .get_detail(4242, Some(&alice))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = state
        .board_service
        .update(4242, &form("x", "general"), Some(&alice))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = state
        .comment_service
        .create(4242, &comment("into the void"), Some(&alice))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
