//! Gate node: lock toggle, light query, alarm blink, 16 s entry sequence.

use smarthome::app::commands::Command;
use smarthome::app::events::{AppEvent, EntryPhase};
use smarthome::app::gate::GateNode;
use smarthome::config::SystemConfig;
use smarthome::drivers::indicators::{Indicator, IndicatorSet};
use smarthome::events::NodeEvent;
use smarthome::radio::address::{BROADCAST_PORT, GATE_PORT};
use smarthome::radio::{Message, NodeAddress};
use smarthome::runtime::Node;

use crate::mock_hw::{broadcast_rx, deliver, run_until, unicast_rx, MockPorts, Sent};

fn make_gate() -> (GateNode, MockPorts) {
    let mut gate = GateNode::new(&SystemConfig::default());
    let mut io = MockPorts::new();
    gate.start(0, &mut io);
    (gate, io)
}

fn alarm() -> NodeEvent {
    broadcast_rx(BROADCAST_PORT, Message::Command(Command::ToggleAlarm))
}

fn open_entry() -> NodeEvent {
    broadcast_rx(BROADCAST_PORT, Message::Command(Command::OpenEntry))
}

fn toggle_lock() -> NodeEvent {
    unicast_rx(
        GATE_PORT,
        NodeAddress::COORDINATOR,
        Message::Command(Command::ToggleLock),
    )
}

#[test]
fn starts_unlocked() {
    let (gate, io) = make_gate();
    assert!(!gate.is_locked());
    assert!(io.is_on(Indicator::Green) && !io.is_on(Indicator::Red));
}

#[test]
fn lock_toggle_sets_pattern_without_reply() {
    let (mut gate, mut io) = make_gate();
    deliver(&mut gate, &mut io, 1_000, toggle_lock());
    assert!(gate.is_locked());
    assert!(io.is_on(Indicator::Red) && !io.is_on(Indicator::Green));
    assert!(io.has_event(&AppEvent::LockChanged { locked: true }));
    assert!(io.sent.is_empty(), "the transport ack is the only reply");

    deliver(&mut gate, &mut io, 2_000, toggle_lock());
    assert!(io.is_on(Indicator::Green) && !io.is_on(Indicator::Red));
}

#[test]
fn light_query_replies_with_one_reading() {
    let (mut gate, mut io) = make_gate();
    io.light = 731;
    deliver(
        &mut gate,
        &mut io,
        1_000,
        unicast_rx(GATE_PORT, NodeAddress::COORDINATOR, Message::Command(Command::QueryLight)),
    );
    assert_eq!(
        io.sent,
        vec![Sent::Unicast {
            port: GATE_PORT,
            to: NodeAddress::COORDINATOR,
            msg: Message::Reading(731),
            max_retx: 5
        }]
    );
}

#[test]
fn alarm_double_toggle_restores_bit_for_bit() {
    let (mut gate, mut io) = make_gate();
    io.indicators = IndicatorSet::from_bits(0b110);
    let before = io.indicators;

    deliver(&mut gate, &mut io, 0, alarm());
    assert!(gate.alarm_active());
    assert_eq!(io.indicators, IndicatorSet::OFF);

    run_until(&mut gate, &mut io, 1_000);
    assert_eq!(io.indicators, IndicatorSet::ALL_ON);
    run_until(&mut gate, &mut io, 2_000);
    assert_eq!(io.indicators, IndicatorSet::OFF);

    deliver(&mut gate, &mut io, 7_500, alarm());
    assert!(!gate.alarm_active());
    assert_eq!(io.indicators, before);
    assert_eq!(gate.next_deadline(), None, "blink loop cancelled");
}

#[test]
fn lock_during_alarm_lands_on_restore() {
    let (mut gate, mut io) = make_gate();
    deliver(&mut gate, &mut io, 0, alarm());
    deliver(&mut gate, &mut io, 1_500, toggle_lock());
    deliver(&mut gate, &mut io, 3_000, alarm());
    assert!(io.is_on(Indicator::Red) && !io.is_on(Indicator::Green));
}

#[test]
fn entry_blinks_for_sixteen_seconds() {
    let (mut gate, mut io) = make_gate();
    io.clear();
    deliver(&mut gate, &mut io, 0, open_entry());
    run_until(&mut gate, &mut io, 30_000);

    let expected: Vec<u64> = (0..16).map(|k| k * 1_000).collect();
    assert_eq!(io.changes_of(Indicator::Blue), expected);
    assert!(!io.is_on(Indicator::Blue));
    assert!(io.is_on(Indicator::Green), "lock pattern untouched");
    assert!(io.has_event(&AppEvent::Entry(EntryPhase::Finished)));
}

#[test]
fn open_entry_ignored_during_alarm() {
    let (mut gate, mut io) = make_gate();
    deliver(&mut gate, &mut io, 0, alarm());
    deliver(&mut gate, &mut io, 500, open_entry());
    assert!(!gate.entry_live());
    assert!(io.has_event(&AppEvent::EntryIgnored));
}

#[test]
fn repeated_open_entry_keeps_one_sequence() {
    let (mut gate, mut io) = make_gate();
    io.clear();
    deliver(&mut gate, &mut io, 0, open_entry());
    deliver(&mut gate, &mut io, 500, open_entry());
    run_until(&mut gate, &mut io, 30_000);
    assert_eq!(io.changes_of(Indicator::Blue).len(), 16);
    assert!(io.has_event(&AppEvent::EntryIgnored));
}

#[test]
fn alarm_aborts_entry_and_restores_after() {
    let (mut gate, mut io) = make_gate();
    let before = io.indicators;
    deliver(&mut gate, &mut io, 0, open_entry());
    deliver(&mut gate, &mut io, 500, alarm());
    assert!(!gate.entry_live());
    assert!(io.has_event(&AppEvent::Entry(EntryPhase::Aborted)));

    deliver(&mut gate, &mut io, 4_000, alarm());
    assert_eq!(io.indicators, before);
    run_until(&mut gate, &mut io, 30_000);
    assert_eq!(io.indicators, before, "no stray entry timers");
}
