//! Workspace lifecycle tests
//!
//! **Validates: two-phase session creation, confirmed teardown, detach and
//! merge bookkeeping**

use std::collections::HashSet;
use std::sync::Arc;

use termtile_core::{
    Confirmation, ConnectionId, ConnectionRef, CoreSettings, Intent, IntentOutcome,
    NotificationLevel, PaneId, Placement, RecordingTransport, SessionEvent, SplitAxis, TabId,
    ViewId, Workspace,
};

fn workspace() -> (Arc<RecordingTransport>, Workspace) {
    workspace_with(CoreSettings::default())
}

fn workspace_with(settings: CoreSettings) -> (Arc<RecordingTransport>, Workspace) {
    let (transport, events) = RecordingTransport::channel();
    let transport = Arc::new(transport);
    let workspace = Workspace::new(transport.clone(), events, settings);
    (transport, workspace)
}

async fn open_tab(ws: &mut Workspace, name: &str) -> TabId {
    let outcome = ws
        .dispatch(
            Intent::NewTab {
                connection: ConnectionRef::local(),
                display_name: Some(name.to_string()),
            },
            Confirmation::Unconfirmed,
        )
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    ws.tabs().active_tab_id().unwrap()
}

async fn split(ws: &mut Workspace, pane_id: PaneId, axis: SplitAxis) -> IntentOutcome {
    ws.dispatch(
        Intent::Split {
            pane_id,
            axis,
            connection: ConnectionRef::local(),
            display_name: None,
        },
        Confirmation::Unconfirmed,
    )
    .await
}

fn focused_pane(ws: &Workspace) -> PaneId {
    ws.tabs()
        .active_tab()
        .and_then(|tab| tab.pane_tree.focused())
        .map(|leaf| leaf.id)
        .unwrap()
}

/// Builds one tab holding three panes.
async fn three_pane_tab(ws: &mut Workspace) -> TabId {
    let tab_id = open_tab(ws, "main").await;
    let first = focused_pane(ws);
    split(ws, first, SplitAxis::Horizontal).await;
    let second = focused_pane(ws);
    split(ws, second, SplitAxis::Vertical).await;
    assert_eq!(ws.tabs().tab(tab_id).unwrap().leaf_count(), 3);
    tab_id
}

#[tokio::test]
async fn close_tab_with_three_panes_needs_confirmation_then_disconnects_each_once() {
    let (transport, mut ws) = workspace();
    let tab_id = three_pane_tab(&mut ws).await;
    let sessions = ws.tabs().tab(tab_id).unwrap().session_ids();

    let outcome = ws
        .dispatch(Intent::CloseTab { tab_id }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(
        outcome,
        IntentOutcome::NeedsConfirmation {
            sessions: sessions.clone()
        }
    );
    assert!(ws.tabs().tab(tab_id).is_some());
    assert!(transport.disconnects().await.is_empty());

    let outcome = ws
        .dispatch(Intent::CloseTab { tab_id }, Confirmation::Confirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    assert!(ws.tabs().is_empty());
    assert!(ws.registry().is_empty());

    let disconnects = transport.disconnects().await;
    assert_eq!(disconnects.len(), 3);
    let unique: HashSet<_> = disconnects.iter().copied().collect();
    let expected: HashSet<_> = sessions.into_iter().collect();
    assert_eq!(unique, expected);
}

#[tokio::test]
async fn single_pane_tab_closes_without_confirmation() {
    let (transport, mut ws) = workspace();
    let tab_id = open_tab(&mut ws, "solo").await;
    let outcome = ws
        .dispatch(Intent::CloseTab { tab_id }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    assert_eq!(transport.disconnects().await.len(), 1);
}

#[tokio::test]
async fn higher_threshold_skips_confirmation() {
    let (_transport, mut ws) =
        workspace_with(CoreSettings::default().with_confirm_close_threshold(5));
    let tab_id = three_pane_tab(&mut ws).await;
    let outcome = ws
        .dispatch(Intent::CloseTab { tab_id }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
}

#[tokio::test]
async fn closing_split_subtree_needs_confirmation() {
    let (transport, mut ws) = workspace();
    let tab_id = three_pane_tab(&mut ws).await;
    let tree = &ws.tabs().tab(tab_id).unwrap().pane_tree;
    let inner = tree.as_split().unwrap().second.id();

    let outcome = ws
        .dispatch(Intent::Close { pane_id: inner }, Confirmation::Unconfirmed)
        .await;
    assert!(matches!(outcome, IntentOutcome::NeedsConfirmation { ref sessions } if sessions.len() == 2));

    let outcome = ws
        .dispatch(Intent::Close { pane_id: inner }, Confirmation::Confirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    assert_eq!(ws.tabs().tab(tab_id).unwrap().leaf_count(), 1);
    assert_eq!(transport.disconnects().await.len(), 2);
    assert_eq!(ws.registry().len(), 1);
}

#[tokio::test]
async fn failed_connect_leaves_layout_untouched_and_notifies() {
    let (transport, mut ws) = workspace();
    open_tab(&mut ws, "main").await;
    let before = ws.snapshot();
    let pane = focused_pane(&ws);

    transport.set_fail_connects(true);
    let outcome = split(&mut ws, pane, SplitAxis::Vertical).await;

    assert_eq!(outcome, IntentOutcome::Failed);
    assert_eq!(ws.snapshot(), before);
    assert_eq!(ws.registry().len(), 1);
    let notes = ws.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn session_resolved_after_target_closed_is_disconnected() {
    let (transport, mut ws) = workspace();
    open_tab(&mut ws, "keep").await;
    open_tab(&mut ws, "doomed").await;
    let target = focused_pane(&ws);

    let pending = ws.begin_connect(
        ConnectionRef::local(),
        Placement::SplitPane {
            pane_id: target,
            axis: SplitAxis::Horizontal,
        },
    );
    ws.dispatch(Intent::Close { pane_id: target }, Confirmation::Unconfirmed)
        .await;
    let resolution = pending.resolve().await;
    let new_session = *resolution.result.as_ref().unwrap();

    let outcome = ws.finish_connect(resolution).await;
    assert_eq!(outcome, IntentOutcome::Cancelled);
    assert!(transport.disconnects().await.contains(&new_session));
    assert!(!transport.open_sessions().await.contains(&new_session));
    assert!(!ws.registry().has(new_session));
    assert_eq!(ws.tabs().len(), 1);
}

#[tokio::test]
async fn disconnect_failure_is_reported_and_teardown_continues() {
    let (transport, mut ws) = workspace();
    open_tab(&mut ws, "main").await;
    let pane = focused_pane(&ws);

    transport.set_fail_disconnects(true);
    let outcome = ws
        .dispatch(Intent::Close { pane_id: pane }, Confirmation::Unconfirmed)
        .await;

    assert_eq!(outcome, IntentOutcome::Applied);
    assert!(ws.registry().is_empty());
    let notes = ws.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Warning);
}

#[tokio::test]
async fn detaching_only_pane_keeps_session_count() {
    let (transport, mut ws) = workspace();
    open_tab(&mut ws, "first").await;
    let tab_id = open_tab(&mut ws, "second").await;
    let pane = focused_pane(&ws);
    let sessions_before = ws.registry().len();

    let outcome = ws
        .dispatch(
            Intent::Detach {
                tab_id,
                pane_id: pane,
            },
            Confirmation::Unconfirmed,
        )
        .await;

    assert_eq!(outcome, IntentOutcome::Applied);
    assert_eq!(ws.tabs().len(), 2);
    assert!(ws.tabs().tab(tab_id).is_none());
    assert_eq!(ws.registry().len(), sessions_before);
    assert_eq!(ws.tabs().session_ids().len(), sessions_before);
    assert!(transport.disconnects().await.is_empty());
}

#[tokio::test]
async fn merge_keeps_one_focused_pane() {
    let (_transport, mut ws) = workspace();
    let target = three_pane_tab(&mut ws).await;
    let source = open_tab(&mut ws, "other").await;

    let outcome = ws
        .dispatch(Intent::MergeTab { source, target }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    assert_eq!(ws.tabs().len(), 1);
    assert_eq!(ws.tabs().active_tab_id(), Some(target));

    let tree = &ws.tabs().tab(target).unwrap().pane_tree;
    assert_eq!(tree.leaf_count(), 4);
    assert_eq!(tree.leaves().iter().filter(|leaf| leaf.focused).count(), 1);
    assert!(tree.check_invariants().is_ok());
}

#[tokio::test]
async fn focus_in_other_tab_switches_tab() {
    let (_transport, mut ws) = workspace();
    let first_tab = three_pane_tab(&mut ws).await;
    let last_leaf = *ws
        .tabs()
        .tab(first_tab)
        .unwrap()
        .pane_tree
        .leaf_ids()
        .last()
        .unwrap();
    open_tab(&mut ws, "other").await;

    let outcome = ws
        .dispatch(Intent::Focus { pane_id: last_leaf }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    assert_eq!(ws.tabs().active_tab_id(), Some(first_tab));
    assert_eq!(focused_pane(&ws), last_leaf);
}

#[tokio::test]
async fn focus_adjacent_cycles_through_panes() {
    let (_transport, mut ws) = workspace();
    let tab_id = three_pane_tab(&mut ws).await;
    let order = ws.tabs().tab(tab_id).unwrap().pane_tree.leaf_ids();
    let start = focused_pane(&ws);

    for _ in 0..order.len() {
        let outcome = ws
            .dispatch(
                Intent::FocusAdjacent {
                    direction: termtile_core::NavDirection::Next,
                },
                Confirmation::Unconfirmed,
            )
            .await;
        assert_eq!(outcome, IntentOutcome::Applied);
    }
    assert_eq!(focused_pane(&ws), start);
}

#[tokio::test]
async fn ratio_change_is_clamped() {
    let (_transport, mut ws) = workspace();
    let tab_id = three_pane_tab(&mut ws).await;
    let split_id = ws.tabs().tab(tab_id).unwrap().pane_tree.id();

    let outcome = ws
        .dispatch(
            Intent::RatioChange {
                split_id,
                ratio: 3.0,
            },
            Confirmation::Unconfirmed,
        )
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    let split = ws.tabs().tab(tab_id).unwrap().pane_tree.as_split().unwrap().clone();
    assert!((split.ratio - 0.9).abs() < f64::EPSILON);

    // Same value again changes nothing
    let outcome = ws
        .dispatch(
            Intent::RatioChange {
                split_id,
                ratio: 0.95,
            },
            Confirmation::Unconfirmed,
        )
        .await;
    assert_eq!(outcome, IntentOutcome::NoOp);
}

#[tokio::test]
async fn reorganize_across_tabs_is_noop() {
    let (_transport, mut ws) = workspace();
    open_tab(&mut ws, "a").await;
    let a = focused_pane(&ws);
    open_tab(&mut ws, "b").await;
    let b = focused_pane(&ws);
    let before = ws.snapshot();

    let outcome = ws
        .dispatch(
            Intent::Reorganize {
                source: a,
                target: b,
                edge: termtile_core::Edge::Left,
            },
            Confirmation::Unconfirmed,
        )
        .await;
    assert_eq!(outcome, IntentOutcome::NoOp);
    assert_eq!(ws.snapshot(), before);
}

#[tokio::test]
async fn tab_bar_intents_round_trip() {
    let (_transport, mut ws) = workspace();
    let a = open_tab(&mut ws, "a").await;
    let b = open_tab(&mut ws, "b").await;
    let c = open_tab(&mut ws, "c").await;

    let outcome = ws
        .dispatch(Intent::ReorderTabs { order: vec![c, a, b] }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);
    assert_eq!(ws.tabs().tab_ids(), vec![c, a, b]);

    let outcome = ws
        .dispatch(Intent::ReorderTabs { order: vec![c, a] }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::NoOp);

    ws.dispatch(Intent::MoveTab { tab_id: c, index: 9 }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(ws.tabs().tab_ids(), vec![a, b, c]);

    ws.dispatch(
        Intent::RenameTab {
            tab_id: a,
            name: "renamed".to_string(),
        },
        Confirmation::Unconfirmed,
    )
    .await;
    assert_eq!(ws.tabs().tab(a).unwrap().name, "renamed");

    assert_eq!(
        ws.dispatch(Intent::SwitchTab { tab_id: a }, Confirmation::Unconfirmed)
            .await,
        IntentOutcome::Applied
    );
    assert_eq!(
        ws.dispatch(Intent::SwitchTab { tab_id: a }, Confirmation::Unconfirmed)
            .await,
        IntentOutcome::NoOp
    );
}

#[tokio::test]
async fn saved_connection_is_passed_through() {
    let (transport, mut ws) = workspace();
    let connection = ConnectionRef::saved(ConnectionId::new());
    ws.dispatch(
        Intent::NewTab {
            connection: connection.clone(),
            display_name: Some("prod".to_string()),
        },
        Confirmation::Unconfirmed,
    )
    .await;
    let leaf = ws.tabs().active_tab().unwrap().pane_tree.first_leaf().clone();
    assert_eq!(leaf.session.connection, connection);
    assert_eq!(leaf.session.display_name, "prod");
    assert_eq!(transport.connect_count().await, 1);
}

#[tokio::test]
async fn echoed_input_reaches_buffer() {
    let (transport, mut ws) = workspace();
    transport.set_echo(true);
    open_tab(&mut ws, "echo").await;
    let session = ws.session_ids()[0];

    ws.send_input(session, b"hello\n").await.unwrap();
    assert_eq!(ws.pump_events(), 1);
    let buffer = ws.registry().get(session).unwrap();
    assert_eq!(buffer.borrow().lines(), vec!["hello"]);
}

#[tokio::test]
async fn next_event_routes_exit_status() {
    let (transport, mut ws) = workspace();
    open_tab(&mut ws, "exits").await;
    let session = ws.session_ids()[0];
    transport.emit(SessionEvent::Exit {
        session_id: session,
        code: Some(0),
    });

    let event = ws.next_event().await.unwrap();
    assert_eq!(event.session_id(), session);
    let entry = ws.registry().entry(session).unwrap();
    assert!(!entry.status().is_active());
}

#[tokio::test]
async fn shutdown_disconnects_everything() {
    let (transport, mut ws) = workspace();
    three_pane_tab(&mut ws).await;
    open_tab(&mut ws, "other").await;

    ws.shutdown().await;
    assert!(ws.tabs().is_empty());
    assert!(ws.registry().is_empty());
    assert!(transport.open_sessions().await.is_empty());
    assert_eq!(transport.disconnects().await.len(), 4);
}

#[tokio::test]
async fn stale_remount_after_close_leaves_nothing_to_tear_down() {
    let (transport, mut ws) = workspace();
    let tab_id = open_tab(&mut ws, "gone").await;
    let session = ws.session_ids()[0];
    let outcome = ws
        .dispatch(Intent::CloseTab { tab_id }, Confirmation::Unconfirmed)
        .await;
    assert_eq!(outcome, IntentOutcome::Applied);

    assert_eq!(ws.registry_mut().attach_view(session, ViewId::new(), Vec::new()), None);
    assert!(ws.registry().is_empty());

    ws.shutdown().await;
    assert!(ws.notifications().is_empty());
    assert_eq!(transport.disconnects().await, vec![session]);
}

#[tokio::test]
async fn snapshot_serializes_active_tab() {
    let (_transport, mut ws) = workspace();
    let tab_id = open_tab(&mut ws, "json").await;
    let json = ws.snapshot().to_json().unwrap();
    assert!(json.contains(&tab_id.0.to_string()));
    assert!(json.contains("\"kind\":\"leaf\""));
}
