//! Coordinator: debounce → resolve → dispatch → completion → menu.

use smarthome::app::commands::Command;
use smarthome::app::coordinator::{Coordinator, CoordinatorState};
use smarthome::app::events::AppEvent;
use smarthome::config::SystemConfig;
use smarthome::error::{CommandError, CommsError};
use smarthome::radio::address::{BROADCAST_PORT, DOOR_PORT, GATE_PORT, SAUNA_PORT};
use smarthome::radio::{Message, NodeAddress};
use smarthome::runtime::Node;
use smarthome::app::commands::Mode;

use crate::mock_hw::{
    broadcast_done, deliver, press, run_until, unicast_done, unicast_gave_up, unicast_rx,
    MockPorts, Sent,
};

fn make_coordinator() -> (Coordinator, MockPorts) {
    let mut c = Coordinator::new(&SystemConfig::default());
    let mut io = MockPorts::new();
    c.start(0, &mut io);
    (c, io)
}

#[test]
fn start_renders_full_menu() {
    let (c, io) = make_coordinator();
    assert_eq!(c.state(), CoordinatorState::AwaitingInput);
    assert_eq!(io.menus_rendered(), 1);
    assert_eq!(io.last_menu().unwrap().entries().len(), Command::ALL.len());
}

#[test]
fn count_resolves_after_inactivity_window() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 2);
    press(&mut c, &mut io, 3_000, 1);
    assert_eq!(c.state(), CoordinatorState::Counting);

    run_until(&mut c, &mut io, 6_999);
    assert!(io.sent.is_empty(), "window re-armed by the last press");

    run_until(&mut c, &mut io, 7_000);
    assert_eq!(
        io.sent,
        vec![Sent::Broadcast {
            port: BROADCAST_PORT,
            msg: Message::Command(Command::OpenEntry)
        }]
    );
}

#[test]
fn broadcast_completes_on_local_send() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 3);
    run_until(&mut c, &mut io, 4_000);
    assert_eq!(c.state(), CoordinatorState::Dispatching);
    assert_eq!(io.menus_rendered(), 1, "no menu while dispatching");

    deliver(&mut c, &mut io, 4_010, broadcast_done(BROADCAST_PORT));
    assert_eq!(c.state(), CoordinatorState::AwaitingInput);
    assert_eq!(io.menus_rendered(), 2);
}

#[test]
fn unknown_count_is_rejected_without_transmission() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 7);
    run_until(&mut c, &mut io, 4_000);

    assert!(io.sent.is_empty());
    assert!(io.has_event(&AppEvent::CommandRejected {
        code: 7,
        reason: CommandError::Unknown(7)
    }));
    assert_eq!(c.state(), CoordinatorState::AwaitingInput);
    assert_eq!(io.menus_rendered(), 2);
}

#[test]
fn alarm_disables_every_other_command() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 1);
    run_until(&mut c, &mut io, 4_000);
    assert!(c.alarm_active(), "mirror flips when the broadcast is handed over");
    deliver(&mut c, &mut io, 4_010, broadcast_done(BROADCAST_PORT));

    let menu = io.last_menu().unwrap();
    assert_eq!(menu.entries().len(), 1);
    assert!(menu.offers(Command::ToggleAlarm));

    for count in 2..=6u8 {
        let t = u64::from(count) * 10_000;
        press(&mut c, &mut io, t, count);
        run_until(&mut c, &mut io, t + 4_000);
        assert!(io.has_event(&AppEvent::CommandRejected {
            code: count,
            reason: CommandError::NotAvailable(count)
        }));
    }
    assert_eq!(io.sent.len(), 1, "only the alarm broadcast went out");
}

#[test]
fn lock_mirror_is_optimistic_and_stays_stale_on_give_up() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 2);
    run_until(&mut c, &mut io, 4_000);

    assert!(c.lock_mirror());
    assert_eq!(c.state(), CoordinatorState::AwaitingCompletion);
    assert_eq!(
        io.sent,
        vec![Sent::Unicast {
            port: GATE_PORT,
            to: NodeAddress::GATE,
            msg: Message::Command(Command::ToggleLock),
            max_retx: 5
        }]
    );

    deliver(&mut c, &mut io, 10_000, unicast_gave_up(GATE_PORT, NodeAddress::GATE));
    assert!(io.has_event(&AppEvent::DeliveryFailed {
        command: Command::ToggleLock,
        error: CommsError::GivenUp { retransmissions: 5 }
    }));
    assert!(c.lock_mirror(), "give-up does not roll the mirror back");
    assert_eq!(c.state(), CoordinatorState::AwaitingInput);
    assert_eq!(
        io.last_menu().unwrap().label_of(Command::ToggleLock),
        Some("Unlock the gate")
    );
}

#[test]
fn query_during_pending_lock_is_dropped() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 2);
    run_until(&mut c, &mut io, 4_000);
    io.clear();

    press(&mut c, &mut io, 5_000, 4);
    run_until(&mut c, &mut io, 9_000);

    assert!(io.sent.is_empty(), "no transmission attempt for the dropped query");
    assert_eq!(io.menus_rendered(), 0, "no feedback for the dropped press");
    assert_eq!(c.state(), CoordinatorState::AwaitingCompletion);
    assert_eq!(c.session().unwrap().command, Command::ToggleLock);

    deliver(&mut c, &mut io, 9_500, unicast_done(GATE_PORT, NodeAddress::GATE, 0));
    assert_eq!(c.state(), CoordinatorState::AwaitingInput);
    assert_eq!(io.menus_rendered(), 1);
}

#[test]
fn temperature_reply_maps_sentinel_to_no_measurement() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 4);
    run_until(&mut c, &mut io, 4_000);
    assert!(matches!(
        io.sent[0],
        Sent::Unicast {
            port: DOOR_PORT,
            to: NodeAddress::DOOR,
            ..
        }
    ));

    deliver(
        &mut c,
        &mut io,
        4_020,
        unicast_rx(DOOR_PORT, NodeAddress::DOOR, Message::Reading(-100)),
    );
    deliver(&mut c, &mut io, 4_020, unicast_done(DOOR_PORT, NodeAddress::DOOR, 0));
    assert!(io.has_event(&AppEvent::TemperatureReport(None)));

    press(&mut c, &mut io, 10_000, 4);
    run_until(&mut c, &mut io, 14_000);
    deliver(
        &mut c,
        &mut io,
        14_020,
        unicast_rx(DOOR_PORT, NodeAddress::DOOR, Message::Reading(21)),
    );
    assert!(io.has_event(&AppEvent::TemperatureReport(Some(21))));
}

#[test]
fn light_reply_is_reported() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 5);
    run_until(&mut c, &mut io, 4_000);
    deliver(
        &mut c,
        &mut io,
        4_020,
        unicast_rx(GATE_PORT, NodeAddress::GATE, Message::Reading(512)),
    );
    assert!(io.has_event(&AppEvent::LightReport(512)));
}

#[test]
fn steam_room_command_goes_to_sauna() {
    let (mut c, mut io) = make_coordinator();
    press(&mut c, &mut io, 0, 6);
    run_until(&mut c, &mut io, 4_000);
    assert_eq!(
        io.sent,
        vec![Sent::Unicast {
            port: SAUNA_PORT,
            to: NodeAddress::SAUNA,
            msg: Message::Command(Command::ToggleSteamRoom),
            max_retx: 5
        }]
    );
}

#[test]
fn sauna_notices_do_not_rerender_menu() {
    let (mut c, mut io) = make_coordinator();
    deliver(
        &mut c,
        &mut io,
        1_000,
        unicast_rx(SAUNA_PORT, NodeAddress::SAUNA, Message::ModeSelected(Mode::SteamBath)),
    );
    deliver(
        &mut c,
        &mut io,
        2_000,
        unicast_rx(SAUNA_PORT, NodeAddress::SAUNA, Message::SessionEnded),
    );
    assert!(io.has_event(&AppEvent::SteamRoomModeSelected(Mode::SteamBath)));
    assert!(io.has_event(&AppEvent::SteamRoomSessionEnded));
    assert_eq!(io.menus_rendered(), 1);
}
