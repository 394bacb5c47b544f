use covalence::players::PlayerRegistry;
use covalence::storage::MemoryRecordStore;

/// Stand-in for whatever the engine hands the adapter at connect time.
#[derive(Debug, PartialEq, Eq)]
struct EngineHandle(u32);

fn registry() -> PlayerRegistry<EngineHandle> {
    PlayerRegistry::new(Box::new(MemoryRecordStore::new()), "covalence")
}

#[test]
fn connect_marks_online_and_disconnect_marks_offline() {
    let mut players = registry();
    players.notify_connect("77", "Steve", EngineHandle(1));
    assert_eq!(players.connected().count(), 1);
    assert_eq!(players.connected().next().unwrap().id(), "77");

    players.notify_disconnect("77");
    assert_eq!(players.connected().count(), 0);
    assert!(players.find_by_id("77").is_some(), "identity history is kept");
}

#[test]
fn disconnect_of_an_unconnected_id_is_a_no_op() {
    let mut players = registry();
    players.notify_connect("77", "Steve", EngineHandle(1));

    players.notify_disconnect("unknown");
    players.notify_disconnect("unknown");
    assert_eq!(players.connected().count(), 1, "connected view unchanged");
}

#[test]
fn connect_implies_join() {
    let mut players = registry();
    players.notify_connect("77", "Steve", EngineHandle(1));

    // The identity record exists even though notify_join was never called
    // explicitly, and it carries the connect-time name.
    let player = players.find_by_id("77").expect("record created by connect");
    assert_eq!(player.name(), "Steve");
    assert_eq!(player.session(), Some(&EngineHandle(1)));
}

#[test]
fn every_connected_player_is_in_the_identity_map() {
    let mut players = registry();
    players.notify_connect("1", "Steve", EngineHandle(1));
    players.notify_connect("2", "Alex", EngineHandle(2));
    players.notify_join("3", "Herobrine");

    for connected in players.connected() {
        assert!(
            players.find_by_id(connected.id()).is_some(),
            "connected id {} missing from the identity map",
            connected.id()
        );
    }
    assert_eq!(players.all().count(), 3);
    assert_eq!(players.connected().count(), 2);
}

#[test]
fn reconnect_swaps_in_a_fresh_session_handle() {
    let mut players = registry();
    players.notify_connect("77", "Steve", EngineHandle(1));
    let stale = players.find_by_id("77").unwrap().clone();

    players.notify_disconnect("77");
    players.notify_connect("77", "Steve", EngineHandle(2));

    // The old snapshot still holds the dead handle; current lookups see the
    // live one.
    assert_eq!(stale.session(), Some(&EngineHandle(1)));
    assert_eq!(
        players.find_by_id("77").unwrap().session(),
        Some(&EngineHandle(2))
    );
    assert_eq!(
        players.connected().next().unwrap().session(),
        Some(&EngineHandle(2))
    );
}

#[test]
fn players_loaded_from_storage_have_no_session() {
    let mut players = registry();
    players.notify_join("77", "Steve");
    assert!(players.find_by_id("77").unwrap().session().is_none());
}
