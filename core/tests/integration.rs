//! Full operation lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through a ureq-backed `Transport`. Validates
//! request building and response classification end-to-end, including the
//! 210, 400, and 500 paths.

use pushwoosh_core::{
    ApiResponse, ClientOptions, DeviceRegistration, Error, MessageOptions, PushwooshClient,
    TagSet, Transport, TransportError, WireRequest, WireResponse,
};
use serde_json::{json, Map, Value};

/// Execute a `WireRequest` using ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status classification.
struct UreqTransport;

impl Transport for UreqTransport {
    fn post(&self, request: &WireRequest) -> Result<WireResponse, TransportError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        let mut response = agent
            .post(&request.uri)
            .content_type("application/json")
            .send(request.body.to_string().as_bytes())
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string().unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        Ok(WireResponse { status, body })
    }
}

fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/json")
}

fn expect_success(result: Result<ApiResponse, Error>) -> Value {
    match result.expect("operation failed") {
        ApiResponse::Success(payload) => payload,
        ApiResponse::ArgumentError(err) => panic!("unexpected argument error: {err:?}"),
    }
}

#[test]
fn operation_lifecycle() {
    let host = start_mock_server();
    let transport = UreqTransport;
    let client = PushwooshClient::with_options(
        "testAppCode",
        "testAuthToken",
        ClientOptions {
            host,
            ..ClientOptions::default()
        },
    )
    .unwrap();

    // Step 1: register a device.
    let registration = DeviceRegistration::new("someToken", "hw-1", 3);
    expect_success(client.register_device(&transport, &registration));

    // Step 2: broadcast send.
    let payload = expect_success(client.send_message(
        &transport,
        "Hello World",
        &MessageOptions::default(),
    ));
    let codes = payload["Messages"].as_array().unwrap();
    assert_eq!(codes.len(), 1);
    let message_code = codes[0].as_str().unwrap().to_string();

    // Step 3: send addressed to the registered device.
    expect_success(client.send_message(
        &transport,
        "Hello World",
        &MessageOptions::to_device("hw-1"),
    ));

    // Step 4: a send to an unknown device completes successfully, carrying
    // the service's argument error as the result value.
    let result = client
        .send_message(&transport, "Hello World", &MessageOptions::to_device("nobody"))
        .unwrap();
    match result {
        ApiResponse::ArgumentError(err) => {
            assert_eq!(err.description, "Argument error");
            assert_eq!(err.code, 210);
            assert!(err.detail.is_some());
        }
        other => panic!("expected argument error, got {other:?}"),
    }

    // Step 5: set tags, read them back.
    let mut tags = Map::new();
    tags.insert("language".to_string(), json!("fr"));
    tags.insert("visits".to_string(), json!(7));
    expect_success(client.set_tags(
        &transport,
        &TagSet {
            hwid: "hw-1".to_string(),
            tags,
            user_id: None,
        },
    ));
    let payload = expect_success(client.get_tags(&transport, "hw-1"));
    assert_eq!(payload["result"], json!({"language": "fr", "visits": 7}));

    // Step 6: targeted message.
    let payload = expect_success(client.send_targeted_message(
        &transport,
        "Hello World",
        "T(\"city\", EQ, \"Madrid\")",
        &Map::new(),
    ));
    assert!(payload["MessageCode"].is_string());

    // Step 7: delete the broadcast message.
    expect_success(client.delete_message(&transport, &message_code));

    // Step 8: unregister; a second unregister reports the device gone.
    expect_success(client.unregister_device(&transport, "hw-1"));
    let result = client.unregister_device(&transport, "hw-1").unwrap();
    assert!(matches!(result, ApiResponse::ArgumentError(_)));

    // Step 9: HTTP 500 classifies as Internal.
    let err = client.get_tags(&transport, "hwid-500").unwrap_err();
    assert_eq!(err, Error::Internal);

    // Step 10: HTTP 400 classifies as Malformed. The builders always wrap
    // the envelope, so a raw request without it goes through `execute`.
    let raw = WireRequest {
        operation: "createMessage".to_string(),
        uri: format!("{}/1.3/createMessage", client.host()),
        body: json!({"not_request": {}}),
    };
    let err = client.execute(&transport, &raw).unwrap_err();
    assert_eq!(err, Error::Malformed);

    // Step 11: an unmapped status (404 for an unknown operation)
    // classifies as Unknown.
    let raw = WireRequest {
        operation: "sendSmoke".to_string(),
        uri: format!("{}/1.3/sendSmoke", client.host()),
        body: json!({"request": {}}),
    };
    let err = client.execute(&transport, &raw).unwrap_err();
    assert_eq!(err, Error::Unknown);
}

#[test]
fn transport_failure_propagates_unchanged() {
    // Nothing listens on this port; the ureq error surfaces as
    // Error::Transport with the transport's own message.
    let client = PushwooshClient::with_options(
        "testAppCode",
        "testAuthToken",
        ClientOptions {
            host: "http://127.0.0.1:9/json".to_string(),
            ..ClientOptions::default()
        },
    )
    .unwrap();

    let err = client
        .get_tags(&UreqTransport, "someHwid")
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
