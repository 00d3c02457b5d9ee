mod support;

use rect_game::use_cases::{CharacterCommand, MatchState};
use support::{FRAME, opponent, run_frames, started_peers};

#[test]
fn when_guest_ticks_then_the_mirrored_host_character_does_not_move() {
    let mut peers = started_peers();
    let host_character = peers.host.local_character().expect("host character");
    let before = peers
        .guest
        .entity(host_character)
        .expect("mirrored")
        .position()
        .expect("hooked");

    // Only the guest simulates; nothing is delivered.
    for _ in 0..60 {
        peers.guest.tick(FRAME).expect("guest tick");
    }

    let after = peers
        .guest
        .entity(host_character)
        .expect("mirrored")
        .position()
        .expect("hooked");
    assert_eq!(after, before);
}

#[test]
fn when_characters_settle_then_they_rest_on_a_surface() {
    let mut peers = started_peers();

    run_frames(&mut peers, 180);

    for game in [&peers.host, &peers.guest] {
        let own = game.local_character().expect("own character");
        let status = game.entity(own).expect("alive").movement().copied().expect("character");
        assert!(status.is_grounded);
        assert_eq!(game.state(), &MatchState::Running);
    }
}

#[test]
fn when_host_fires_along_the_floor_then_the_guest_character_is_hit_on_both_sides() {
    let mut peers = started_peers();
    let guest_character = opponent(&peers.host);

    // Step off any ledge so both characters end up on the floor.
    peers
        .host
        .command_character(CharacterCommand::StartMoveLeft)
        .expect("command");
    run_frames(&mut peers, 10);
    peers
        .host
        .command_character(CharacterCommand::StopMoveLeft)
        .expect("command");
    run_frames(&mut peers, 150);

    let aim = peers
        .host
        .entity(guest_character)
        .expect("mirrored")
        .bounds()
        .expect("hooked")
        .center();
    peers
        .host
        .command_character(CharacterCommand::ShootAt(aim))
        .expect("shot");
    run_frames(&mut peers, 60);

    assert_eq!(
        peers.host.entity(guest_character).expect("alive").health(),
        Some(90)
    );
    assert_eq!(
        peers.guest.entity(guest_character).expect("alive").health(),
        Some(90)
    );
}
