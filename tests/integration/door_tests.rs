//! Door node: sampling, temperature queries, garden lights, delayed entry.

use smarthome::app::commands::Command;
use smarthome::app::door::DoorNode;
use smarthome::app::events::{AppEvent, EntryPhase};
use smarthome::config::SystemConfig;
use smarthome::drivers::indicators::Indicator;
use smarthome::radio::address::{BROADCAST_PORT, DOOR_PORT};
use smarthome::radio::{Message, NodeAddress};
use smarthome::runtime::Node;

use crate::mock_hw::{
    broadcast_rx, deliver, press, run_until, unicast_done, unicast_rx, MockPorts, Sent,
};

fn make_door() -> (DoorNode, MockPorts) {
    let mut door = DoorNode::new(&SystemConfig::default());
    let mut io = MockPorts::new();
    door.start(0, &mut io);
    (door, io)
}

fn query() -> smarthome::events::NodeEvent {
    unicast_rx(
        DOOR_PORT,
        NodeAddress::COORDINATOR,
        Message::Command(Command::QueryTemperature),
    )
}

fn reply(reading: i16) -> Sent {
    Sent::Unicast {
        port: DOOR_PORT,
        to: NodeAddress::COORDINATOR,
        msg: Message::Reading(reading),
        max_retx: 5,
    }
}

#[test]
fn starts_with_garden_lights_off() {
    let (door, io) = make_door();
    assert!(io.is_on(Indicator::Red));
    assert!(!io.is_on(Indicator::Green));
    assert_eq!(door.next_deadline(), Some(10_000), "sampling loop armed");
}

#[test]
fn query_before_any_sample_returns_sentinel() {
    let (mut door, mut io) = make_door();
    deliver(&mut door, &mut io, 5_000, query());
    assert_eq!(io.sent, vec![reply(-100)]);
}

#[test]
fn average_covers_last_five_samples() {
    let (mut door, mut io) = make_door();
    io.temperatures.extend([10, 12, 14, 16, 18, 20]);

    run_until(&mut door, &mut io, 50_000);
    deliver(&mut door, &mut io, 50_500, query());
    deliver(&mut door, &mut io, 50_520, unicast_done(DOOR_PORT, NodeAddress::COORDINATOR, 0));

    run_until(&mut door, &mut io, 60_000);
    deliver(&mut door, &mut io, 60_500, query());

    assert_eq!(io.sent, vec![reply(14), reply(16)]);
}

#[test]
fn second_reply_is_dropped_while_first_is_pending() {
    let (mut door, mut io) = make_door();
    deliver(&mut door, &mut io, 1_000, query());
    deliver(&mut door, &mut io, 1_100, query());
    assert_eq!(io.sent.len(), 1);
}

#[test]
fn query_ignored_while_alarm_active() {
    let (mut door, mut io) = make_door();
    deliver(
        &mut door,
        &mut io,
        0,
        broadcast_rx(BROADCAST_PORT, Message::Command(Command::ToggleAlarm)),
    );
    deliver(&mut door, &mut io, 1_000, query());
    assert!(io.sent.is_empty());
}

#[test]
fn button_toggles_garden_lights() {
    let (mut door, mut io) = make_door();
    press(&mut door, &mut io, 1_000, 1);
    assert!(io.is_on(Indicator::Green) && !io.is_on(Indicator::Red));
    assert!(door.garden_lights());

    press(&mut door, &mut io, 2_000, 1);
    assert!(!io.is_on(Indicator::Green) && io.is_on(Indicator::Red));
    assert!(io.has_event(&AppEvent::GardenLightsChanged { on: false }));
}

#[test]
fn button_ignored_while_alarm_active() {
    let (mut door, mut io) = make_door();
    deliver(
        &mut door,
        &mut io,
        0,
        broadcast_rx(BROADCAST_PORT, Message::Command(Command::ToggleAlarm)),
    );
    press(&mut door, &mut io, 500, 1);
    assert!(!door.garden_lights());
}

#[test]
fn entry_blinks_only_in_last_two_seconds() {
    let (mut door, mut io) = make_door();
    io.clear();
    deliver(
        &mut door,
        &mut io,
        0,
        broadcast_rx(BROADCAST_PORT, Message::Command(Command::OpenEntry)),
    );
    assert!(io.has_event(&AppEvent::Entry(EntryPhase::Armed)));

    run_until(&mut door, &mut io, 20_000);
    assert_eq!(io.changes_of(Indicator::Blue), vec![14_000, 15_000]);
    assert!(!io.is_on(Indicator::Blue));
    assert!(io.has_event(&AppEvent::Entry(EntryPhase::Finished)));
    assert!(!door.entry_live());
}

#[test]
fn garden_lights_survive_entry_sequence() {
    let (mut door, mut io) = make_door();
    deliver(
        &mut door,
        &mut io,
        0,
        broadcast_rx(BROADCAST_PORT, Message::Command(Command::OpenEntry)),
    );
    press(&mut door, &mut io, 14_500, 1);
    run_until(&mut door, &mut io, 16_000);
    assert!(io.is_on(Indicator::Green));
    assert!(!io.is_on(Indicator::Blue));
}
