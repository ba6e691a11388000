//! Integration tests for client construction and the compatibility gate
//!
//! These tests run a BraviaClient against a mocked device endpoint and
//! verify that the lazy version check behaves as documented.

use bravia_api::{BraviaClient, Error, ErrorCode};
use mockito::Matcher;
use serde_json::json;

/// Serve getInterfaceInformation reporting the given interface version
fn mock_interface_information(server: &mut mockito::Server, version: &str) -> mockito::Mock {
    server
        .mock("POST", "/sony/system")
        .match_body(Matcher::PartialJson(
            json!({"method": "getInterfaceInformation"}),
        ))
        .with_status(200)
        .with_body(
            json!({
                "result": [{
                    "productCategory": "tv",
                    "productName": "BRAVIA",
                    "modelName": "FW-55BZ40H",
                    "serverName": "",
                    "interfaceVersion": version
                }],
                "id": 1
            })
            .to_string(),
        )
        .create()
}

fn mock_power_status(server: &mut mockito::Server, status: &str) -> mockito::Mock {
    server
        .mock("POST", "/sony/system")
        .match_body(Matcher::PartialJson(json!({"method": "getPowerStatus"})))
        .with_status(200)
        .with_body(json!({"result": [{"status": status}], "id": 1}).to_string())
        .create()
}

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn test_construction_performs_no_network_io() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create();

        let _client = BraviaClient::new(server.host_with_port(), "0000").unwrap();

        mock.assert();
    }

    #[test]
    fn test_construction_rejects_empty_parameters() {
        assert!(matches!(
            BraviaClient::new("", "0000"),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            BraviaClient::new("192.168.1.128", ""),
            Err(Error::InvalidParameter(_))
        ));
    }
}

#[cfg(test)]
mod compatibility_gate_tests {
    use super::*;

    #[test]
    fn test_unsupported_versions_are_rejected() {
        for version in ["4.0.0", "2.1.0"] {
            let mut server = mockito::Server::new();
            let _info = mock_interface_information(&mut server, version);
            let client = BraviaClient::new(server.host_with_port(), "0000").unwrap();

            match client.system().get_power_status() {
                Err(Error::IncompatibleApiVersion { version: reported }) => {
                    assert_eq!(reported, version);
                }
                other => panic!(
                    "Expected IncompatibleApiVersion for {}, got {:?}",
                    version, other
                ),
            }
        }
    }

    #[test]
    fn test_compatibility_probe_runs_once() {
        let mut server = mockito::Server::new();
        let info = mock_interface_information(&mut server, "3.10.0");
        let power = server
            .mock("POST", "/sony/system")
            .match_body(Matcher::PartialJson(json!({"method": "getPowerStatus"})))
            .with_status(200)
            .with_body(json!({"result": [{"status": "active"}], "id": 1}).to_string())
            .expect(2)
            .create();
        let client = BraviaClient::new(server.host_with_port(), "0000").unwrap();

        assert!(client.system().get_power_status().unwrap());
        assert!(client.system().get_power_status().unwrap());

        // One probe serves both requests
        info.assert();
        power.assert();
    }

    #[test]
    fn test_failed_probe_is_retried() {
        let mut server = mockito::Server::new();
        let failing = server
            .mock("POST", "/sony/system")
            .match_body(Matcher::PartialJson(
                json!({"method": "getInterfaceInformation"}),
            ))
            .with_status(500)
            .expect(1)
            .create();
        let client = BraviaClient::new(server.host_with_port(), "0000").unwrap();

        assert!(client.system().get_power_status().is_err());
        failing.assert();

        // A later request probes again and succeeds
        let info = mock_interface_information(&mut server, "3.10.0");
        let power = mock_power_status(&mut server, "active");

        assert!(client.system().get_power_status().unwrap());
        info.assert();
        power.assert();
    }

    #[test]
    fn test_wrong_passcode_surfaces_as_forbidden() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/sony/system")
            .with_status(403)
            .create();
        let client = BraviaClient::new(server.host_with_port(), "wrong").unwrap();

        match client.system().get_power_status() {
            Err(e) => assert_eq!(e.code(), Some(ErrorCode::Forbidden)),
            Ok(status) => panic!("Expected a forbidden error, got Ok({})", status),
        }
    }
}
