//! Integration tests driving a search session against an in-memory host,
//! the way an editor front-end would.

use indoc::indoc;
use pretty_assertions::assert_eq;
use scenekit_editor::{
    Direction, EditError, HostEditor, MemoryBuffer, SearchOptions, SearchSession, SessionConfig,
    SessionState, find,
};

const STORY: &str = indoc! {r#"
    scene cellar {
        "Barrels line the walls. A barrel in the corner is open."
        set barrels = 3
        choice "Inspect the barrel" -> barrel_room
        choice "Climb the stairs" -> kitchen
    }

    scene kitchen {
        "You count {barrels} barrels on the cart."
    }
"#};

#[test]
fn test_typed_query_then_replace_all_round_trip() {
    let mut host = MemoryBuffer::new(STORY);
    let mut session = SearchSession::new(SessionConfig::default());

    // Simulate typing "bar", "barr", "barrel" with the debounce only firing for the last.
    let stale = ["bar", "barr"]
        .into_iter()
        .filter_map(|q| session.begin_query(q, SearchOptions::new().whole_word(true)))
        .collect::<Vec<_>>();
    let ticket = session
        .begin_query("barrel", SearchOptions::new().whole_word(true))
        .unwrap();
    for old in stale {
        assert!(session.complete_query(old, &host.text()).is_none());
    }

    let matches = session.complete_query(ticket, &host.text()).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(
        matches.iter().map(|m| (m.line, m.column)).collect::<Vec<_>>(),
        vec![(2, 32), (4, 25)]
    );

    let ops = session.replace_all("cask", &mut host).unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(session.state(), SessionState::Idle);

    let text = host.text();
    assert!(text.contains("A cask in the corner"));
    assert!(text.contains("\"Inspect the cask\" -> barrel_room"));
    assert!(find(&text, "barrel", &SearchOptions::new().whole_word(true)).is_empty());

    assert!(host.undo());
    assert_eq!(host.text(), STORY);
}

#[test]
fn test_navigate_and_replace_current_walks_through_matches() {
    let mut host = MemoryBuffer::new(STORY);
    let mut session = SearchSession::default();
    session.search("barrels", SearchOptions::new().case_sensitive(true), &host.text());
    assert_eq!(session.match_count(), 3);

    let second = session.navigate(Direction::Next, &mut host).unwrap().clone();
    assert_eq!((second.line, second.column), (9, 17));
    assert_eq!(host.selection().map(|s| s.start_line), Some(9));

    session.replace_current("crates", &mut host).unwrap();
    assert_eq!(session.match_count(), 2);
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.current_match().unwrap().column, 25);
    assert!(host.text().contains("You count {crates} barrels"));
}

#[test]
fn test_edits_from_outside_the_session_invalidate_matches() {
    let mut host = MemoryBuffer::new(STORY);
    let mut session = SearchSession::default();
    session.search("kitchen", SearchOptions::new(), &host.text());

    let op = scenekit_editor::EditOperation::new(1, 1, 7, "chapter");
    host.apply_edits(&[op]).unwrap();

    let err = session.replace_current("pantry", &mut host).unwrap_err();
    assert!(matches!(err, EditError::StaleMatches { .. }));

    session.search("kitchen", SearchOptions::new(), &host.text());
    assert!(session.replace_current("pantry", &mut host).unwrap().is_some());
}
