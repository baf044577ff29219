//! Drag gestures applied through the workspace

use std::sync::Arc;

use termtile_core::{
    Confirmation, ConnectionRef, CoreSettings, DragGesture, DragReorganizer, DropAction, Edge,
    Intent, IntentOutcome, PaneId, Point, Rect, RecordingTransport, SplitAxis, TabId, Workspace,
};

async fn workspace_with_tabs(count: usize) -> (Workspace, Vec<TabId>) {
    let (transport, events) = RecordingTransport::channel();
    let mut ws = Workspace::new(Arc::new(transport), events, CoreSettings::default());
    let mut tabs = Vec::new();
    for index in 0..count {
        ws.dispatch(
            Intent::NewTab {
                connection: ConnectionRef::local(),
                display_name: Some(format!("tab {index}")),
            },
            Confirmation::Unconfirmed,
        )
        .await;
        tabs.push(ws.tabs().active_tab_id().unwrap());
    }
    (ws, tabs)
}

/// Splits the active tab's only pane side by side; returns (left, right).
async fn split_active(ws: &mut Workspace) -> (PaneId, PaneId) {
    let left = ws.tabs().active_tab().unwrap().pane_tree.first_leaf().id;
    ws.dispatch(
        Intent::Split {
            pane_id: left,
            axis: SplitAxis::Horizontal,
            connection: ConnectionRef::local(),
            display_name: None,
        },
        Confirmation::Unconfirmed,
    )
    .await;
    let right = ws.tabs().active_tab().unwrap().pane_tree.focused().unwrap().id;
    (left, right)
}

#[tokio::test]
async fn dragging_pane_onto_left_edge_swaps_sides() {
    let (mut ws, _) = workspace_with_tabs(1).await;
    let (left, right) = split_active(&mut ws).await;
    let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);

    let mut drag = DragReorganizer::new();
    assert!(drag.begin(DragGesture::Pane(right)));
    let tree = ws.tabs().active_tab().unwrap().pane_tree.clone();
    assert_eq!(
        drag.pointer_over_tree(&tree, bounds, Point::new(2.0, 50.0)),
        Some((left, Edge::Left))
    );

    let action = drag.drop_gesture().unwrap();
    assert!(!drag.is_dragging());
    assert_eq!(ws.dispatch_drop(action).await, IntentOutcome::Applied);

    let tree = &ws.tabs().active_tab().unwrap().pane_tree;
    assert_eq!(tree.leaf_ids(), vec![right, left]);
    assert_eq!(tree.focused().map(|leaf| leaf.id), Some(right));
    assert!(tree.check_invariants().is_ok());
}

#[tokio::test]
async fn dragging_pane_over_itself_proposes_nothing() {
    let (ws, _) = workspace_with_tabs(1).await;
    let tree = ws.tabs().active_tab().unwrap().pane_tree.clone();
    let only = tree.first_leaf().id;

    let mut drag = DragReorganizer::new();
    drag.begin(DragGesture::Pane(only));
    let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(drag.pointer_over_tree(&tree, bounds, Point::new(50.0, 1.0)), None);
    assert_eq!(drag.drop_gesture(), None);
}

#[tokio::test]
async fn dropping_pane_on_tab_bar_detaches_it() {
    let (mut ws, tabs) = workspace_with_tabs(1).await;
    let (_, right) = split_active(&mut ws).await;

    let mut drag = DragReorganizer::new();
    drag.begin(DragGesture::Pane(right));
    drag.hover_tab_slot(1);
    let action = drag.drop_gesture().unwrap();
    assert_eq!(action, DropAction::DetachPane(right));

    assert_eq!(ws.dispatch_drop(action).await, IntentOutcome::Applied);
    assert_eq!(ws.tabs().len(), 2);
    assert_eq!(ws.tabs().tab(tabs[0]).unwrap().leaf_count(), 1);
    let new_tab = ws.tabs().active_tab().unwrap();
    assert_ne!(new_tab.id, tabs[0]);
    assert_eq!(new_tab.pane_tree.first_leaf().id, right);
}

#[tokio::test]
async fn dropping_tab_on_tab_merges() {
    let (mut ws, tabs) = workspace_with_tabs(2).await;

    let mut drag = DragReorganizer::new();
    drag.begin(DragGesture::Tab(tabs[1]));
    drag.hover_tab(tabs[1]);
    assert_eq!(drag.drop_target(), None);
    drag.hover_tab(tabs[0]);
    let action = drag.drop_gesture().unwrap();

    assert_eq!(ws.dispatch_drop(action).await, IntentOutcome::Applied);
    assert_eq!(ws.tabs().tab_ids(), vec![tabs[0]]);
    assert_eq!(ws.tabs().tab(tabs[0]).unwrap().leaf_count(), 2);
}

#[tokio::test]
async fn dropping_tab_in_gap_moves_it() {
    let (mut ws, tabs) = workspace_with_tabs(3).await;

    let mut drag = DragReorganizer::new();
    drag.begin(DragGesture::Tab(tabs[2]));
    drag.hover_tab_slot(0);
    let action = drag.drop_gesture().unwrap();

    assert_eq!(ws.dispatch_drop(action).await, IntentOutcome::Applied);
    assert_eq!(ws.tabs().tab_ids(), vec![tabs[2], tabs[0], tabs[1]]);
}

#[tokio::test]
async fn stale_drop_after_pane_closed_is_noop() {
    let (mut ws, _) = workspace_with_tabs(1).await;
    let (left, right) = split_active(&mut ws).await;

    let action = DropAction::Reorganize {
        source: right,
        target: left,
        edge: Edge::Bottom,
    };
    ws.dispatch(Intent::Close { pane_id: right }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(ws.dispatch_drop(action).await, IntentOutcome::NoOp);
    assert_eq!(
        ws.dispatch_drop(DropAction::DetachPane(right)).await,
        IntentOutcome::NoOp
    );
}
