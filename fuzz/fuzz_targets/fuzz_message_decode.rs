//! Fuzz target: radio frame decoding.
//!
//! Arbitrary bytes go through the wire decoder and the received-frame
//! helper.  Neither may panic, and anything that decodes must encode back
//! into a frame that decodes to the same message.
//!
//! cargo fuzz run fuzz_message_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use smarthome::radio::codec::{decode, encode};
use smarthome::radio::{decode_received, NodeAddress};
use smarthome::radio::address::DOOR_PORT;

fuzz_target!(|data: &[u8]| {
    let _ = decode_received(DOOR_PORT, NodeAddress::COORDINATOR, data);

    if let Ok(msg) = decode(data) {
        let frame = encode(&msg).expect("decoded message must re-encode");
        assert_eq!(decode(&frame), Ok(msg));
    }
});
