//! Property-based tests for the tab set
//!
//! **Validates: active tab consistency, session conservation across detach
//! and merge, close plans**

use std::collections::HashSet;

use proptest::prelude::*;
use termtile_core::split::{SessionRef, SplitAxis};
use termtile_core::tabs::{ApplyOutcome, TabSet};

// ============================================================================
// Test Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum TabOperation {
    Open,
    SplitActive(SplitAxis),
    CloseActivePane(usize),
    Detach { tab: usize, pane: usize },
    Merge { source: usize, target: usize },
    CloseTab(usize),
    Switch(usize),
    Move { tab: usize, index: usize },
    Reverse,
}

fn operation_strategy() -> impl Strategy<Value = TabOperation> {
    prop_oneof![
        2 => Just(TabOperation::Open),
        3 => prop_oneof![Just(SplitAxis::Horizontal), Just(SplitAxis::Vertical)]
            .prop_map(TabOperation::SplitActive),
        1 => (0usize..16).prop_map(TabOperation::CloseActivePane),
        1 => (0usize..16, 0usize..16).prop_map(|(tab, pane)| TabOperation::Detach { tab, pane }),
        1 => (0usize..16, 0usize..16)
            .prop_map(|(source, target)| TabOperation::Merge { source, target }),
        1 => (0usize..16).prop_map(TabOperation::CloseTab),
        1 => (0usize..16).prop_map(TabOperation::Switch),
        1 => (0usize..16, 0usize..16).prop_map(|(tab, index)| TabOperation::Move { tab, index }),
        1 => Just(TabOperation::Reverse),
    ]
}

fn operations_strategy(max_ops: usize) -> impl Strategy<Value = Vec<TabOperation>> {
    proptest::collection::vec(operation_strategy(), 0..=max_ops)
}

/// Applies an operation and returns how many sessions it discarded
fn apply(tabs: &mut TabSet, op: &TabOperation) -> usize {
    let ids = tabs.tab_ids();
    let pick = |index: usize| ids.get(index % ids.len().max(1)).copied();
    match op {
        TabOperation::Open => {
            tabs.open_tab(SessionRef::local("tab"));
            0
        }
        TabOperation::SplitActive(axis) => {
            tabs.apply_to_active(|tree| {
                let target = tree.focused().map_or(tree.first_leaf().id, |leaf| leaf.id);
                Some(tree.split(target, *axis, SessionRef::local("pane")))
            });
            0
        }
        TabOperation::CloseActivePane(index) => {
            let Some(tab) = tabs.active_tab() else {
                return 0;
            };
            let leaves = tab.pane_tree.leaf_ids();
            let victim = leaves[index % leaves.len()];
            tabs.apply_to_active(|tree| tree.close(victim));
            1
        }
        TabOperation::Detach { tab, pane } => {
            if let Some(tab_id) = pick(*tab) {
                let leaves = tabs.tab(tab_id).map(|t| t.pane_tree.leaf_ids()).unwrap_or_default();
                if !leaves.is_empty() {
                    tabs.detach_pane(tab_id, leaves[pane % leaves.len()]);
                }
            }
            0
        }
        TabOperation::Merge { source, target } => {
            if let (Some(source), Some(target)) = (pick(*source), pick(*target)) {
                tabs.merge_tab(source, target);
            }
            0
        }
        TabOperation::CloseTab(index) => pick(*index)
            .and_then(|tab_id| tabs.close_tab(tab_id))
            .map_or(0, |tab| tab.leaf_count()),
        TabOperation::Switch(index) => {
            if let Some(tab_id) = pick(*index) {
                tabs.switch_tab(tab_id);
            }
            0
        }
        TabOperation::Move { tab, index } => {
            if let Some(tab_id) = pick(*tab) {
                tabs.move_tab(tab_id, *index);
            }
            0
        }
        TabOperation::Reverse => {
            let mut order = tabs.tab_ids();
            order.reverse();
            tabs.reorder_tabs(&order);
            0
        }
    }
}

fn check_tab_set(tabs: &TabSet) -> Result<(), TestCaseError> {
    prop_assert_eq!(tabs.active_tab_id().is_some(), !tabs.is_empty());
    if let Some(active) = tabs.active_tab_id() {
        prop_assert!(tabs.tab(active).is_some(), "active tab must exist");
    }
    let mut seen = HashSet::new();
    for tab in tabs.tabs() {
        prop_assert!(tab.pane_tree.check_invariants().is_ok());
        for leaf in tab.pane_tree.leaves() {
            prop_assert!(seen.insert(leaf.id), "pane id shared across tabs");
        }
    }
    let sessions = tabs.session_ids();
    let unique: HashSet<_> = sessions.iter().collect();
    prop_assert_eq!(unique.len(), sessions.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Active tab exists iff there are tabs; trees stay valid
    #[test]
    fn prop_tab_set_stays_consistent(ops in operations_strategy(40)) {
        let mut tabs = TabSet::new();
        for op in &ops {
            apply(&mut tabs, op);
            check_tab_set(&tabs)?;
        }
    }

    /// Sessions only disappear through explicit closes
    #[test]
    fn prop_sessions_are_conserved(ops in operations_strategy(40)) {
        let mut tabs = TabSet::new();
        let mut opened = 0usize;
        let mut discarded = 0usize;
        for op in &ops {
            let before = tabs.session_ids().len();
            discarded += apply(&mut tabs, op);
            let after = tabs.session_ids().len();
            if after > before {
                opened += after - before;
            }
            prop_assert_eq!(tabs.session_ids().len(), opened - discarded);
        }
    }

    /// Detach of any pane keeps the session count
    #[test]
    fn prop_detach_keeps_sessions(splits in 0usize..6, pane in 0usize..16) {
        let mut tabs = TabSet::new();
        let tab_id = tabs.open_tab(SessionRef::local("a"));
        for _ in 0..splits {
            tabs.apply_to_active(|tree| {
                let target = tree.first_leaf().id;
                Some(tree.split(target, SplitAxis::Horizontal, SessionRef::local("b")))
            });
        }
        let leaves = tabs.tab(tab_id).unwrap().pane_tree.leaf_ids();
        let victim = leaves[pane % leaves.len()];
        let before = tabs.session_ids().len();

        let new_tab = tabs.detach_pane(tab_id, victim);
        prop_assert!(new_tab.is_some());
        prop_assert_eq!(tabs.session_ids().len(), before);
        prop_assert_eq!(tabs.active_tab_id(), new_tab);
        prop_assert_eq!(tabs.tab(tab_id).is_none(), leaves.len() == 1);
        check_tab_set(&tabs)?;
    }

    /// Merge leaves exactly one focused pane in the target
    #[test]
    fn prop_merge_has_one_focus(source_splits in 0usize..4, target_splits in 0usize..4) {
        let mut tabs = TabSet::new();
        let target = tabs.open_tab(SessionRef::local("t"));
        for _ in 0..target_splits {
            tabs.apply_to_active(|tree| {
                let focus = tree.focused().map_or(tree.first_leaf().id, |leaf| leaf.id);
                Some(tree.split(focus, SplitAxis::Vertical, SessionRef::local("t")))
            });
        }
        let source = tabs.open_tab(SessionRef::local("s"));
        for _ in 0..source_splits {
            tabs.apply_to_active(|tree| {
                let focus = tree.focused().map_or(tree.first_leaf().id, |leaf| leaf.id);
                Some(tree.split(focus, SplitAxis::Horizontal, SessionRef::local("s")))
            });
        }

        prop_assert!(tabs.merge_tab(source, target));
        let tree = &tabs.tab(target).unwrap().pane_tree;
        prop_assert_eq!(tree.leaf_count(), source_splits + target_splits + 2);
        prop_assert_eq!(tree.leaves().iter().filter(|leaf| leaf.focused).count(), 1);
        prop_assert_eq!(tabs.active_tab_id(), Some(target));
        prop_assert_eq!(tabs.len(), 1);
    }

    /// Confirmation is required exactly when the tab has more than one pane
    #[test]
    fn prop_close_plan_threshold(splits in 0usize..6) {
        let mut tabs = TabSet::new();
        let tab_id = tabs.open_tab(SessionRef::local("a"));
        for _ in 0..splits {
            let outcome = tabs.apply_to_tab(tab_id, |tree| {
                let target = tree.first_leaf().id;
                Some(tree.split(target, SplitAxis::Vertical, SessionRef::local("b")))
            });
            prop_assert_eq!(outcome, ApplyOutcome::Updated);
        }
        let plan = tabs.close_plan(tab_id).unwrap();
        prop_assert_eq!(plan.sessions.len(), splits + 1);
        prop_assert_eq!(plan.requires_confirmation, splits > 0);
    }
}
