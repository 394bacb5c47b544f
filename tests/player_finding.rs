use covalence::players::PlayerRegistry;
use covalence::storage::MemoryRecordStore;

fn populated() -> PlayerRegistry<()> {
    let mut players = PlayerRegistry::new(Box::new(MemoryRecordStore::new()), "covalence");
    players.notify_join("76561197960287930", "Steve");
    players.notify_join("76561197960287931", "SteveTheBuilder");
    players.notify_join("42", "Alex");
    players.notify_join("7", "steve42");
    players
}

#[test]
fn find_by_id_is_exact() {
    let players = populated();
    assert_eq!(players.find_by_id("42").unwrap().name(), "Alex");
    assert!(players.find_by_id("4").is_none(), "no prefix semantics for ids");
    assert!(players.find_by_id("ALEX").is_none(), "ids never match names");
}

#[test]
fn find_all_is_case_insensitive_on_names() {
    let players = populated();
    let names: Vec<_> = players.find_all("STEVE").map(|p| p.name().to_string()).collect();
    assert_eq!(names, vec!["Steve", "SteveTheBuilder", "steve42"]);
}

#[test]
fn find_all_matches_ids_only_exactly() {
    let players = populated();

    // "42" is an exact id and a substring of two names
    let matched: Vec<_> = players.find_all("42").map(|p| p.id().to_string()).collect();
    assert_eq!(matched, vec!["42", "7"]);

    // a partial id matches nothing unless it appears in a name
    assert_eq!(players.find_all("765611979").count(), 0);
}

#[test]
fn find_needs_an_unambiguous_match() {
    let players = populated();
    assert!(players.find("steve").is_none(), "three candidates");
    assert!(players.find("zombie").is_none(), "zero candidates");
    assert_eq!(players.find("builder").unwrap().id(), "76561197960287931");
    assert!(players.find("42").is_none(), "id plus name substring is ambiguous");
    assert_eq!(players.find("7").unwrap().id(), "7");
}

#[test]
fn find_all_restarts_fresh_on_every_call() {
    let mut players = populated();

    let first: Vec<_> = players.find_all("alex").map(|p| p.id().to_string()).collect();
    assert_eq!(first, vec!["42"]);

    players.notify_join("43", "AlexTwin");
    let second: Vec<_> = players.find_all("alex").map(|p| p.id().to_string()).collect();
    assert_eq!(second, vec!["42", "43"], "a fresh call sees current state");
}
