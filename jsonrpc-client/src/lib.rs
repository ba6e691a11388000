//! Private JSON-RPC client for BRAVIA display communication
//!
//! This crate provides a minimal JSON-RPC-over-HTTP client specifically
//! designed for communicating with the IP-control interface of Sony BRAVIA
//! Professional Displays. It also supports the SOAP-based IRCC endpoint used
//! to emulate remote-control button presses.

mod error;

pub use error::RpcError;

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A minimal JSON-RPC client scoped to a single display
///
/// The host and pre-shared key are fixed at construction and attached to
/// every outgoing request. Request ids increment monotonically per client.
#[derive(Debug)]
pub struct RpcClient {
    agent: ureq::Agent,
    host: String,
    psk: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client for the given host, authenticating with the given
    /// pre-shared key
    pub fn new(host: impl Into<String>, psk: impl Into<String>) -> Self {
        Self::with_agent(
            host,
            psk,
            ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(Duration::from_secs(10))
                .build(),
        )
    }

    /// Create a client with a custom agent (for advanced use cases)
    ///
    /// Most applications should use `RpcClient::new()` instead. This method
    /// is provided for cases where custom timeout or proxy configuration is
    /// needed.
    pub fn with_agent(
        host: impl Into<String>,
        psk: impl Into<String>,
        agent: ureq::Agent,
    ) -> Self {
        Self {
            agent,
            host: host.into(),
            psk: psk.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// The host this client talks to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Send a JSON-RPC request to a service endpoint and unwrap the result
    ///
    /// The API encapsulates results in an array. A single-element result is
    /// extracted and returned alone (the majority of calls), an empty result
    /// becomes `None`, and a multi-element result is returned whole.
    pub fn call(
        &self,
        service: &str,
        method: &str,
        params: Option<Value>,
        version: &str,
    ) -> Result<Option<Value>, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // The device expects params as an array holding at most one object
        let request_params = match params {
            Some(params) => vec![params],
            None => Vec::new(),
        };
        let payload = json!({
            "method": method,
            "params": request_params,
            "version": version,
            "id": id,
        });

        let url = format!("http://{}/sony/{}", self.host, service);
        tracing::debug!("request {} to {} (id {})", method, url, id);

        let response = self
            .agent
            .post(&url)
            .set("X-Auth-PSK", &self.psk)
            .set("Pragma", "no-cache")
            .set("Cache-Control", "no-cache")
            .set("Content-Type", "application/json; charset=UTF-8")
            .send_string(&payload.to_string());

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(RpcError::Http(code)),
            Err(e) => return Err(RpcError::Network(e.to_string())),
        };

        let body: Value = response.into_json().map_err(|e| {
            RpcError::Malformed(format!("undecodable response for {}: {}", method, e))
        })?;

        unwrap_result(body, method)
    }

    /// Send an IRCC remote code through the SOAP endpoint
    pub fn send_ircc(&self, remote_code: &str) -> Result<(), RpcError> {
        let body = format!(
            r#"<s:Envelope
    xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"
    s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
    <s:Body>
        <u:X_SendIRCC xmlns:u="urn:schemas-sony-com:service:IRCC:1">
            <IRCCCode>{}</IRCCCode>
        </u:X_SendIRCC>
    </s:Body>
</s:Envelope>"#,
            remote_code
        );

        let url = format!("http://{}/sony/ircc", self.host);
        tracing::debug!("IRCC request to {}", url);

        let result = self
            .agent
            .post(&url)
            .set("X-Auth-PSK", &self.psk)
            .set("Pragma", "no-cache")
            .set("Cache-Control", "no-cache")
            .set("SOAPACTION", "\"urn:schemas-sony-com:service:IRCC:1#X_SendIRCC\"")
            .set("Content-Type", "application/xml; charset=UTF-8")
            .set("Accept", "*/*")
            .send_string(&body);

        match result {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, _)) => Err(RpcError::Http(code)),
            Err(e) => Err(RpcError::Network(e.to_string())),
        }
    }
}

/// Translate the `result`/`error` members of an API response body
fn unwrap_result(body: Value, method: &str) -> Result<Option<Value>, RpcError> {
    let mut body = match body {
        Value::Object(map) => map,
        other => {
            return Err(RpcError::Malformed(format!(
                "non-object response for {}: {}",
                method, other
            )))
        }
    };

    if let Some(error) = body.remove("error") {
        tracing::debug!("device rejected {}: {}", method, error);
        let parts = error.as_array();
        let code = parts
            .and_then(|parts| parts.first())
            .and_then(Value::as_i64);
        let message = parts
            .and_then(|parts| parts.get(1))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return match code {
            Some(code) => Err(RpcError::Device {
                code: code as i32,
                message,
            }),
            None => Err(RpcError::Malformed(format!(
                "malformed error member for {}: {}",
                method, error
            ))),
        };
    }

    let result = body.remove("result").ok_or_else(|| {
        RpcError::Malformed(format!("response for {} has no result member", method))
    })?;
    let mut items = match result {
        Value::Array(items) => items,
        other => {
            return Err(RpcError::Malformed(format!(
                "non-array result for {}: {}",
                method, other
            )))
        }
    };

    Ok(match items.len() {
        0 => None,
        1 => Some(items.remove(0)),
        _ => Some(Value::Array(items)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> RpcClient {
        RpcClient::new(server.host_with_port(), "0000")
    }

    #[test]
    fn test_call_unwraps_single_element_result() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/sony/system")
            .match_header("x-auth-psk", "0000")
            .match_header("content-type", "application/json; charset=UTF-8")
            .match_body(Matcher::PartialJson(json!({
                "method": "getPowerStatus",
                "params": [],
                "version": "1.0",
                "id": 1,
            })))
            .with_status(200)
            .with_body(r#"{"result":[{"status":"active"}],"id":1}"#)
            .create();

        let client = client_for(&server);
        let result = client.call("system", "getPowerStatus", None, "1.0").unwrap();

        assert_eq!(result, Some(json!({"status": "active"})));
        mock.assert();
    }

    #[test]
    fn test_call_sends_params_wrapped_in_array() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/sony/system")
            .match_body(Matcher::PartialJson(json!({
                "method": "setPowerStatus",
                "params": [{"status": true}],
                "version": "1.0",
            })))
            .with_status(200)
            .with_body(r#"{"result":[],"id":1}"#)
            .create();

        let client = client_for(&server);
        let result = client
            .call("system", "setPowerStatus", Some(json!({"status": true})), "1.0")
            .unwrap();

        assert_eq!(result, None);
        mock.assert();
    }

    #[test]
    fn test_call_increments_request_id() {
        let mut server = mockito::Server::new();
        let first = server
            .mock("POST", "/sony/system")
            .match_body(Matcher::PartialJson(json!({"id": 1})))
            .with_body(r#"{"result":[],"id":1}"#)
            .create();
        let second = server
            .mock("POST", "/sony/system")
            .match_body(Matcher::PartialJson(json!({"id": 2})))
            .with_body(r#"{"result":[],"id":2}"#)
            .create();

        let client = client_for(&server);
        client.call("system", "getPowerStatus", None, "1.0").unwrap();
        client.call("system", "getPowerStatus", None, "1.0").unwrap();

        first.assert();
        second.assert();
    }

    #[test]
    fn test_call_translates_device_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/sony/avContent")
            .with_status(200)
            .with_body(r#"{"error":[7,"Illegal State"],"id":1}"#)
            .create();

        let client = client_for(&server);
        let err = client
            .call("avContent", "getPlayingContentInfo", None, "1.0")
            .unwrap_err();

        match err {
            RpcError::Device { code, message } => {
                assert_eq!(code, 7);
                assert_eq!(message, "Illegal State");
            }
            other => panic!("Expected RpcError::Device, got {:?}", other),
        }
    }

    #[test]
    fn test_call_translates_http_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/sony/system")
            .with_status(403)
            .with_body("Forbidden")
            .create();

        let client = client_for(&server);
        let err = client.call("system", "getPowerStatus", None, "1.0").unwrap_err();

        match err {
            RpcError::Http(status) => assert_eq!(status, 403),
            other => panic!("Expected RpcError::Http, got {:?}", other),
        }
    }

    #[test]
    fn test_send_ircc_posts_soap_envelope() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/sony/ircc")
            .match_header("x-auth-psk", "0000")
            .match_header(
                "soapaction",
                "\"urn:schemas-sony-com:service:IRCC:1#X_SendIRCC\"",
            )
            .match_header("content-type", "application/xml; charset=UTF-8")
            .match_body(Matcher::Regex(
                "<IRCCCode>AAAAAQAAAAEAAAAVAw==</IRCCCode>".to_string(),
            ))
            .with_status(200)
            .create();

        let client = client_for(&server);
        client.send_ircc("AAAAAQAAAAEAAAAVAw==").unwrap();

        mock.assert();
    }

    #[test]
    fn test_send_ircc_translates_http_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/sony/ircc")
            .with_status(500)
            .create();

        let client = client_for(&server);
        let err = client.send_ircc("AAAAAQAAAAEAAAAVAw==").unwrap_err();

        match err {
            RpcError::Http(status) => assert_eq!(status, 500),
            other => panic!("Expected RpcError::Http, got {:?}", other),
        }
    }

    #[test]
    fn test_unwrap_result_empty_array_is_none() {
        let body = json!({"result": [], "id": 1});
        assert_eq!(unwrap_result(body, "getFoo").unwrap(), None);
    }

    #[test]
    fn test_unwrap_result_multi_element_returned_whole() {
        let body = json!({"result": [{"a": 1}, [{"b": 2}]], "id": 1});
        let result = unwrap_result(body, "getFoo").unwrap();
        assert_eq!(result, Some(json!([{"a": 1}, [{"b": 2}]])));
    }

    #[test]
    fn test_unwrap_result_missing_result_is_malformed() {
        let body = json!({"id": 1});
        let err = unwrap_result(body, "getFoo").unwrap_err();
        match err {
            RpcError::Malformed(msg) => assert!(msg.contains("no result member")),
            other => panic!("Expected RpcError::Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_unwrap_result_malformed_error_member() {
        let body = json!({"error": "nope", "id": 1});
        let err = unwrap_result(body, "getFoo").unwrap_err();
        match err {
            RpcError::Malformed(msg) => assert!(msg.contains("malformed error member")),
            other => panic!("Expected RpcError::Malformed, got {:?}", other),
        }
    }
}
