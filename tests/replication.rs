mod support;

use rect_game::domain::{Animation, EntityId, EntityType, Position};
use rect_game::interface_adapters::protocol::{
    EntityStateDto, EntityUpdatePacket, Packet, PositionDto, SoundNameDto, SoundPlayPacket,
};
use rect_game::use_cases::{CharacterCommand, MatchError, MatchResult, MatchState, Role};
use support::{deliver, drain, opponent, peers, run_frames, started_peers};

fn update_packet(id: EntityId, x: f32, y: f32) -> Packet {
    Packet::EntityUpdate(EntityUpdatePacket {
        entity_id: id.as_uuid(),
        new_entity_state: EntityStateDto {
            new_position: Some(PositionDto { x, y }),
            new_rotation_radians: None,
        },
    })
}

fn ending_result(state: &MatchState) -> Option<&MatchResult> {
    match state {
        MatchState::Ending { result, .. } | MatchState::Ended(result) => Some(result),
        _ => None,
    }
}

#[test]
fn when_guest_receives_the_map_then_it_mirrors_the_host_roster() {
    let peers = started_peers();

    assert_eq!(peers.guest.state(), &MatchState::Initialized);
    assert_eq!(peers.guest.role(), Some(Role::Guest));
    assert_eq!(peers.guest.registry().ids(), peers.host.registry().ids());
    for entity in peers.host.registry().iter() {
        let mirror = peers.guest.entity(entity.id()).expect("replicated");
        assert_eq!(mirror.kind(), entity.kind());
        assert_eq!(mirror.initial_position(), entity.initial_position());
        assert_eq!(mirror.is_remote(), !entity.is_remote());
    }
    assert_eq!(
        peers.guest_stage.snapshot().attached.len(),
        peers.guest.registry().len()
    );
}

#[test]
fn when_guest_has_not_received_the_map_then_it_stays_bootstrapping() {
    let mut peers = peers();

    peers.guest.initialize().expect("guest bootstrap");
    peers.guest.tick(support::FRAME).expect("tick");

    assert_eq!(peers.guest.state(), &MatchState::Bootstrapping);
    assert!(peers.guest.registry().is_empty());
}

#[test]
fn when_update_arrives_before_the_map_then_it_is_applied_after_the_map() {
    let mut peers = peers();
    peers.host.initialize().expect("host bootstrap");
    peers.guest.initialize().expect("guest bootstrap");
    let bootstrap = drain(&mut peers.guest_inbox);
    let host_character = peers.host.local_character().expect("host character");

    peers.guest.handle_packet(update_packet(host_character, 300.0, 400.0));
    assert!(peers.guest.entity(host_character).is_none());

    for packet in bootstrap {
        peers.guest.handle_packet(packet);
    }

    let mirror = peers.guest.entity(host_character).expect("created from map");
    assert_eq!(mirror.position(), Ok(Position::new(300.0, 400.0)));
    assert_eq!(peers.guest.protocol_errors(), 0);
}

#[test]
fn when_host_character_falls_then_guest_mirror_follows() {
    let mut peers = started_peers();
    let host_character = peers.host.local_character().expect("host character");

    run_frames(&mut peers, 30);

    let authoritative = peers
        .host
        .entity(host_character)
        .expect("alive")
        .position()
        .expect("hooked");
    let mirrored = peers
        .guest
        .entity(host_character)
        .expect("alive")
        .position()
        .expect("hooked");
    assert!(authoritative.y > 20.0);
    assert_eq!(mirrored, authoritative);
}

#[test]
fn when_update_targets_a_locally_owned_entity_then_it_is_ignored() {
    let mut peers = started_peers();
    let own = peers.host.local_character().expect("host character");
    let before = peers.host.entity(own).expect("alive").position();

    peers.host.handle_packet(update_packet(own, 999.0, 999.0));

    assert_eq!(peers.host.entity(own).expect("alive").position(), before);
    assert_eq!(peers.host.protocol_errors(), 0);
}

#[test]
fn when_destroy_names_an_unknown_entity_then_nothing_changes() {
    let mut peers = started_peers();
    let before = peers.guest.registry().len();

    peers.guest.handle_packet(Packet::DestroyEntity(
        rect_game::interface_adapters::protocol::DestroyEntityPacket {
            entity_id: EntityId::new().as_uuid(),
        },
    ));

    assert_eq!(peers.guest.registry().len(), before);
    assert_eq!(peers.guest.protocol_errors(), 0);
}

#[test]
fn when_host_shoots_then_guest_mirrors_the_bullet_until_it_hits() {
    let mut peers = started_peers();

    peers
        .host
        .command_character(CharacterCommand::ShootAt(Position::new(1900.0, 900.0)))
        .expect("shot");
    deliver(&mut peers.guest_inbox, &mut peers.guest);

    let bullet = peers
        .host
        .registry()
        .iter()
        .find(|e| e.entity_type() == EntityType::Bullet)
        .map(|e| e.id())
        .expect("bullet on host");
    assert!(peers.guest.entity(bullet).expect("mirrored").is_remote());

    run_frames(&mut peers, 120);

    assert!(peers.host.entity(bullet).is_none());
    assert!(peers.guest.entity(bullet).is_none());
}

#[test]
fn when_host_kills_the_guest_then_results_are_opposite() {
    let mut peers = started_peers();
    let guest_character = opponent(&peers.host);

    for _ in 0..10 {
        peers
            .host
            .damage_and_sync(guest_character, 10)
            .expect("character alive");
    }
    deliver(&mut peers.guest_inbox, &mut peers.guest);

    assert_eq!(ending_result(peers.host.state()), Some(&MatchResult::Won));
    assert_eq!(ending_result(peers.guest.state()), Some(&MatchResult::Lost));
    assert!(peers.guest.local_character().is_none());
    assert!(peers.host.entity(guest_character).is_none());
}

#[test]
fn when_damage_is_replicated_then_both_sides_agree_on_health() {
    let mut peers = started_peers();
    let guest_character = opponent(&peers.host);

    let outcome = peers
        .host
        .damage_and_sync(guest_character, 10)
        .expect("character alive");
    deliver(&mut peers.guest_inbox, &mut peers.guest);

    assert_eq!(outcome.health, 90);
    assert_eq!(
        peers.guest.entity(guest_character).expect("alive").health(),
        Some(90)
    );
}

#[tokio::test]
async fn when_host_goes_away_then_guest_ends_with_opponent_disconnected() {
    let support::Peers {
        host,
        mut guest,
        mut guest_inbox,
        ..
    } = started_peers();
    let host_character = host.local_character().expect("host character");

    // Dropping the game tears it down and closes its outbound channel.
    drop(host);
    while guest_inbox.recv().await.is_some() {}
    guest.handle_peer_disconnect();

    assert_eq!(
        ending_result(guest.state()),
        Some(&MatchResult::Error(MatchError::OpponentDisconnected))
    );
    assert!(guest.entity(host_character).is_none());
    assert!(guest.local_character().is_some());
}

#[test]
fn when_desyncs_pile_up_then_the_match_is_stopped() {
    let mut peers = started_peers();

    for i in 0..10 {
        peers
            .guest
            .handle_packet(update_packet(EntityId::new(), i as f32, 0.0));
    }

    assert_eq!(peers.guest.protocol_errors(), 10);
    assert!(matches!(
        ending_result(peers.guest.state()),
        Some(MatchResult::Error(MatchError::Stopped(_)))
    ));
}

#[test]
fn when_a_destroyed_bullet_is_created_again_then_the_id_is_rejected() {
    let mut peers = started_peers();

    peers
        .host
        .command_character(CharacterCommand::ShootAt(Position::new(1900.0, 900.0)))
        .expect("shot");
    let sent = drain(&mut peers.guest_inbox);
    let create = sent
        .iter()
        .find(|packet| matches!(packet, Packet::CreateEntity(_)))
        .cloned()
        .expect("bullet create packet");
    let bullet = create.entity_id().expect("addressed packet");
    for packet in sent {
        peers.guest.handle_packet(packet);
    }
    assert!(peers.guest.entity(bullet).is_some());

    peers.host.destroy_entity(bullet, true);
    deliver(&mut peers.guest_inbox, &mut peers.guest);
    assert!(peers.guest.entity(bullet).is_none());

    peers.guest.handle_packet(create);

    assert!(peers.guest.entity(bullet).is_none());
    assert_eq!(peers.guest.protocol_errors(), 1);
}

#[test]
fn when_host_starts_running_left_then_guest_mirror_plays_run_left() {
    let mut peers = started_peers();
    let host_character = peers.host.local_character().expect("host character");

    peers
        .host
        .command_character(CharacterCommand::StartMoveLeft)
        .expect("command");
    deliver(&mut peers.guest_inbox, &mut peers.guest);

    assert_eq!(
        peers.guest.entity(host_character).expect("mirrored").animation(),
        Some(Animation::RunLeft)
    );
    assert_eq!(peers.guest.protocol_errors(), 0);
}

#[test]
fn when_guest_plays_a_received_sound_then_nothing_is_sent_back() {
    let mut peers = started_peers();
    drain(&mut peers.host_inbox);

    peers.guest.handle_packet(Packet::SoundPlay(SoundPlayPacket {
        sound_name: SoundNameDto::Jump,
    }));

    assert!(drain(&mut peers.host_inbox).is_empty());
    assert_eq!(peers.guest.protocol_errors(), 0);
}
