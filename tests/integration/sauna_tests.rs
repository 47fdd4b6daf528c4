//! Sauna node: mode selection, measurement loop, every shutdown path.

use smarthome::app::commands::{Command, Mode};
use smarthome::app::events::{AppEvent, ShutdownReason};
use smarthome::app::sauna::{SaunaNode, SteamRoomState};
use smarthome::config::{InvalidSelectionPolicy, SystemConfig};
use smarthome::drivers::indicators::Indicator;
use smarthome::events::NodeEvent;
use smarthome::radio::address::SAUNA_PORT;
use smarthome::radio::{Message, NodeAddress};
use smarthome::runtime::Node;
use smarthome::safety::Violation;

use crate::mock_hw::{deliver, press, run_until, unicast_done, unicast_rx, MockPorts, Sent};

fn make_sauna(config: &SystemConfig) -> (SaunaNode, MockPorts) {
    let mut sauna = SaunaNode::new(config);
    let mut io = MockPorts::new();
    sauna.start(0, &mut io);
    (sauna, io)
}

fn toggle() -> NodeEvent {
    unicast_rx(
        SAUNA_PORT,
        NodeAddress::COORDINATOR,
        Message::Command(Command::ToggleSteamRoom),
    )
}

fn ack() -> NodeEvent {
    unicast_done(SAUNA_PORT, NodeAddress::COORDINATOR, 0)
}

fn notice(msg: Message) -> Sent {
    Sent::Unicast {
        port: SAUNA_PORT,
        to: NodeAddress::COORDINATOR,
        msg,
        max_retx: 5,
    }
}

/// Switch on at t=0 and select `presses` at t=1000; active at t=4000.
fn activate(sauna: &mut SaunaNode, io: &mut MockPorts, presses: u8) {
    deliver(sauna, io, 0, toggle());
    press(sauna, io, 1_000, presses);
    run_until(sauna, io, 4_000);
    deliver(sauna, io, 4_020, ack());
}

#[test]
fn presses_ignored_while_off() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    press(&mut sauna, &mut io, 0, 2);
    assert_eq!(sauna.next_deadline(), None);
    assert_eq!(sauna.state(), SteamRoomState::Off);
}

#[test]
fn toggle_on_waits_for_selection() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    deliver(&mut sauna, &mut io, 0, toggle());
    assert_eq!(sauna.state(), SteamRoomState::SelectingMode);
    assert!(io.is_on(Indicator::Green));
    assert!(io.has_event(&AppEvent::SteamRoomSwitchedOn));
}

#[test]
fn one_press_selects_sauna_and_arms_both_loops() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    activate(&mut sauna, &mut io, 1);

    assert_eq!(sauna.state(), SteamRoomState::Active(Mode::Sauna));
    assert_eq!(sauna.safety_deadline(), Some(64_000));
    assert!(sauna.measuring());
    assert_eq!(io.sent, vec![notice(Message::ModeSelected(Mode::Sauna))]);
}

#[test]
fn two_presses_select_steam_bath() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    activate(&mut sauna, &mut io, 2);
    assert_eq!(sauna.mode(), Some(Mode::SteamBath));
}

#[test]
fn invalid_count_is_rejected_and_keeps_selecting() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    deliver(&mut sauna, &mut io, 0, toggle());
    press(&mut sauna, &mut io, 1_000, 3);
    run_until(&mut sauna, &mut io, 4_000);

    assert_eq!(sauna.state(), SteamRoomState::SelectingMode);
    assert!(io.has_event(&AppEvent::SelectionRejected { presses: 3 }));
    assert!(io.sent.is_empty());

    press(&mut sauna, &mut io, 5_000, 1);
    run_until(&mut sauna, &mut io, 8_000);
    assert_eq!(sauna.state(), SteamRoomState::Active(Mode::Sauna));
}

#[test]
fn silent_reset_policy_emits_nothing() {
    let config = SystemConfig {
        invalid_selection: InvalidSelectionPolicy::SilentReset,
        ..Default::default()
    };
    let (mut sauna, mut io) = make_sauna(&config);
    deliver(&mut sauna, &mut io, 0, toggle());
    press(&mut sauna, &mut io, 1_000, 4);
    run_until(&mut sauna, &mut io, 4_000);

    assert_eq!(sauna.state(), SteamRoomState::SelectingMode);
    assert!(!io
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::SelectionRejected { .. })));
}

#[test]
fn three_hot_ticks_shut_down() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    activate(&mut sauna, &mut io, 1);
    io.temperature = 85;

    run_until(&mut sauna, &mut io, 14_000);
    assert_eq!(sauna.violation_counts(), (2, 0));
    assert_eq!(sauna.state(), SteamRoomState::Active(Mode::Sauna));

    run_until(&mut sauna, &mut io, 19_000);
    assert_eq!(sauna.state(), SteamRoomState::Off);
    assert!(io.has_event(&AppEvent::SessionShutdown(ShutdownReason::Breach(
        Violation::Temperature
    ))));
    assert_eq!(io.sent.last(), Some(&notice(Message::SessionEnded)));
    assert!(!io.is_on(Indicator::Green));
    assert_eq!(sauna.next_deadline(), None, "safety timer and loop torn down");
    assert_eq!(sauna.mode(), None);
}

#[test]
fn clean_tick_resets_both_counters() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    activate(&mut sauna, &mut io, 2);
    io.humidities.extend([95, 95, 60, 95, 95]);

    run_until(&mut sauna, &mut io, 29_000);
    assert_eq!(sauna.state(), SteamRoomState::Active(Mode::SteamBath));
    assert_eq!(sauna.violation_counts(), (0, 2));
}

#[test]
fn safety_timer_ends_session() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    activate(&mut sauna, &mut io, 1);

    run_until(&mut sauna, &mut io, 63_999);
    assert_eq!(sauna.state(), SteamRoomState::Active(Mode::Sauna));
    run_until(&mut sauna, &mut io, 64_000);
    assert_eq!(sauna.state(), SteamRoomState::Off);
    assert!(io.has_event(&AppEvent::SessionShutdown(ShutdownReason::SafetyTimeout)));
    assert_eq!(sauna.next_deadline(), None);
}

#[test]
fn manual_toggle_ends_session() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    activate(&mut sauna, &mut io, 1);
    deliver(&mut sauna, &mut io, 6_000, toggle());

    assert_eq!(sauna.state(), SteamRoomState::Off);
    assert!(io.has_event(&AppEvent::SessionShutdown(ShutdownReason::Manual)));
    assert_eq!(io.sent.last(), Some(&notice(Message::SessionEnded)));
}

#[test]
fn reselecting_switches_mode_and_keeps_deadline() {
    let (mut sauna, mut io) = make_sauna(&SystemConfig::default());
    activate(&mut sauna, &mut io, 1);
    io.temperature = 85;
    run_until(&mut sauna, &mut io, 9_000);
    assert_eq!(sauna.violation_counts(), (1, 0));

    press(&mut sauna, &mut io, 10_000, 2);
    run_until(&mut sauna, &mut io, 13_000);

    assert_eq!(sauna.state(), SteamRoomState::Active(Mode::SteamBath));
    assert_eq!(sauna.safety_deadline(), Some(64_000));
    assert_eq!(sauna.violation_counts(), (0, 0));
    assert_eq!(
        io.sent.last(),
        Some(&notice(Message::ModeSelected(Mode::SteamBath)))
    );
}
