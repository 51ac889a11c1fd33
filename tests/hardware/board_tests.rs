//! Tests against a real board.

use std::env;
use testprotocol::port::{list_ports, PortConfiguration, SerialLink, SyncSerialPort};
use testprotocol::protocol::{parse_selection, Selection};

/// Test port configuration from environment.
struct TestPortConfig {
    port_name: String,
    baud_rate: u32,
}

impl TestPortConfig {
    fn from_env() -> Option<Self> {
        let port_name = env::var("TEST_PORT").ok()?;
        let baud_rate = env::var("TEST_BAUD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(115_200);
        Some(Self {
            port_name,
            baud_rate,
        })
    }
}

#[test]
#[ignore = "requires serial hardware"]
fn test_enumeration_on_this_host() {
    let ports = list_ports().expect("host platform should be supported");
    println!("openable ports: {ports:?}");

    for port in &ports {
        assert!(
            SyncSerialPort::open(port, PortConfiguration::default()).is_ok(),
            "{port} was listed but cannot be opened"
        );
    }
}

#[test]
#[ignore = "requires the motor controller board"]
fn test_led_test_round_trip() {
    let Some(test) = TestPortConfig::from_env() else {
        eprintln!("TEST_PORT not set, skipping");
        return;
    };
    let Selection::Code(selection) = parse_selection("11") else {
        panic!("11 is a valid test code");
    };

    let mut port = SyncSerialPort::open(&test.port_name, PortConfiguration::with_baud(test.baud_rate))
        .expect("failed to open test port");
    port.write_bytes(&selection.frame()).expect("write failed");

    // The board acknowledges every request before running it.
    let first = port.read_line().expect("read failed");
    assert!(first.contains("Message Received: 11"), "unexpected answer {first:?}");
}
