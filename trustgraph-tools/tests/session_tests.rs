//! Stdio agent session, driven with an in-memory transcript

mod common;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{ALICE, BOB};
use trustgraph_tools::Session;

/// Feed `lines` through a session and parse every response line.
async fn transcript(lines: &[Value]) -> (Vec<Value>, trustgraph_tools::session::SessionState) {
    let mut input = String::new();
    for line in lines {
        input.push_str(&line.to_string());
        input.push('\n');
    }

    let session = Session::new(common::registry());
    let mut output: Vec<u8> = Vec::new();
    session.run(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (responses, session.state())
}

#[tokio::test]
async fn test_handshake_list_and_call() {
    let (responses, state) = transcript(&[
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "getTrustScore", "arguments": { "address": BOB } }
        }),
    ])
    .await;

    // the notification produced nothing
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["capabilities"]["tools"]["listChanged"], false);

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 4);
    assert_eq!(tools[0]["name"], "getTrustScore");
    assert!(tools[0]["inputSchema"]["properties"]["address"].is_object());

    let result = &responses[2]["result"];
    assert_eq!(result["structuredContent"]["address"], BOB);
    assert_eq!(result["content"][0]["type"], "text");
    let text: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(text, result["structuredContent"]);

    assert!(state.initialized);
    assert_eq!(state.tool_calls, 1);
}

#[tokio::test]
async fn test_error_codes() {
    let (responses, _) = transcript(&[
        json!({ "jsonrpc": "2.0", "id": "a", "method": "tools/call", "params": { "name": "nope", "arguments": {} } }),
        json!({ "jsonrpc": "2.0", "id": "b", "method": "tools/call", "params": { "name": "getTrustScore", "arguments": { "address": "0x12" } } }),
        json!({ "jsonrpc": "2.0", "id": "c", "method": "prompts/list" }),
    ])
    .await;

    assert_eq!(responses[0]["id"], "a");
    assert_eq!(responses[0]["error"]["code"], -32601);
    assert_eq!(
        responses[0]["error"]["data"]["validTools"],
        json!(["getTrustScore", "getAttestations", "verifyCredential", "findTrustedExperts"])
    );

    assert_eq!(responses[1]["error"]["code"], -32602);
    assert_eq!(responses[1]["error"]["data"]["violations"][0]["field"], "address");

    assert_eq!(responses[2]["error"]["code"], -32601);
    assert!(responses[2]["error"].get("data").is_none());
}

#[tokio::test]
async fn test_garbage_and_blank_lines() {
    let session = Session::new(common::registry());
    let input = format!(
        "\n{{broken\n\n{}\n",
        json!({ "jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": { "name": "verifyCredential", "arguments": { "address": ALICE, "claim": "defi" } } })
    );
    let mut output: Vec<u8> = Vec::new();
    session.run(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], 7);
    assert_eq!(responses[1]["result"]["structuredContent"]["verified"], true);
}

#[tokio::test]
async fn test_invalid_utf8_line_keeps_session_alive() {
    let session = Session::new(common::registry());
    let mut input: Vec<u8> = Vec::new();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
    input.extend_from_slice(b"\xff\xfe garbage\n");
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

    let mut output: Vec<u8> = Vec::new();
    session.run(input.as_slice(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert!(responses[0].get("error").is_none());
    assert_eq!(responses[1]["id"], Value::Null);
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[2]["id"], 2);
    assert!(responses[2].get("error").is_none());
}
