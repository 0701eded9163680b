//! Scripted traversal of the navigation state machine.

use pretty_assertions::assert_eq as pretty_assert_eq;

use rulegen::Error;
use rulegen::navigator::{
    Mode, NavEvent, NavState, Navigator, SearchScope, Step, search,
};
use rulegen::render::TargetSystem;

use crate::fixture_catalog;

fn apply(navigator: &Navigator, state: NavState, event: NavEvent) -> NavState {
    match navigator.transition(&state, event).unwrap() {
        Step::Next(next) => next,
        Step::Generate(_) => panic!("expected a state transition"),
    }
}

#[test]
fn test_browse_select_confirm_trace() {
    let navigator = Navigator::new(fixture_catalog());
    let state = NavState::root();

    let state = apply(&navigator, state, NavEvent::PickCategory("Testing".to_string()));
    pretty_assert_eq!(state.mode, Mode::Rule);

    let rules = navigator.catalog().get("Testing").unwrap().rules.clone();
    let state = apply(&navigator, state, NavEvent::PickRules(rules.clone()));
    pretty_assert_eq!(state.mode, Mode::Ide);
    pretty_assert_eq!(state.breadcrumb, "Testing > Jest Setup, Testing Library");

    let step = navigator
        .transition(&state, NavEvent::Confirm(vec![TargetSystem::Cursor]))
        .unwrap();
    let Step::Generate(selection) = step else {
        panic!("expected a generate action");
    };
    pretty_assert_eq!(selection.category, "Testing");
    pretty_assert_eq!(selection.rules, rules);
    pretty_assert_eq!(selection.targets, vec![TargetSystem::Cursor]);
}

#[test]
fn test_search_hit_shortcuts_to_target_selection() {
    let navigator = Navigator::new(fixture_catalog());
    let catalog = navigator.catalog();

    let hits = search(catalog, "hook", &SearchScope::All).unwrap();
    pretty_assert_eq!(hits.len(), 1);
    pretty_assert_eq!(hits[0].category, "React");

    let hit = hits.into_iter().next().unwrap();
    let state = apply(
        &navigator,
        NavState::root(),
        NavEvent::SearchHit {
            category: hit.category,
            rule: hit.rule,
        },
    );
    pretty_assert_eq!(state.mode, Mode::Ide);
    pretty_assert_eq!(state.breadcrumb, "React > React Hooks");
}

#[test]
fn test_back_from_target_returns_to_rule_selection() {
    let navigator = Navigator::new(fixture_catalog());
    let state = apply(
        &navigator,
        NavState::root(),
        NavEvent::PickCategory("React".to_string()),
    );
    let rules = navigator.catalog().get("React").unwrap().rules.clone();
    let state = apply(&navigator, state, NavEvent::PickRules(rules));

    let state = apply(&navigator, state, NavEvent::Back);
    pretty_assert_eq!(state.mode, Mode::Rule);
    pretty_assert_eq!(state.category.as_deref(), Some("React"));
    assert!(state.rules.is_empty());
}

#[test]
fn test_validation_failures_do_not_consume_state() {
    let navigator = Navigator::new(fixture_catalog());
    let state = apply(
        &navigator,
        NavState::root(),
        NavEvent::PickCategory("Testing".to_string()),
    );

    let err = navigator
        .transition(&state, NavEvent::PickRules(Vec::new()))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // The same state is still usable for the retry.
    let rules = navigator.catalog().get("Testing").unwrap().rules.clone();
    let retried = apply(&navigator, state, NavEvent::PickRules(rules));
    pretty_assert_eq!(retried.mode, Mode::Ide);
}

#[test]
fn test_scoped_search_restricts_hits() {
    let catalog = fixture_catalog();

    let all = search(&catalog, "test", &SearchScope::All).unwrap();
    assert!(all.len() >= 2);

    let scoped = search(
        &catalog,
        "test",
        &SearchScope::Category("Testing".to_string()),
    )
    .unwrap();
    assert!(scoped.iter().all(|hit| hit.category == "Testing"));
    assert!(scoped.len() < all.len() || all.iter().all(|h| h.category == "Testing"));
}
