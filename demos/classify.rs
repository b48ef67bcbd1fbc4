//! Classify a few inbound payloads and answer them.
//!
//! This example demonstrates:
//! - Peeking at a payload's kind before materializing it
//! - Parsing with custom limits
//! - Mapping parse failures onto JSON-RPC error responses
//!
//! Run this example with:
//! ```bash
//! RUST_LOG=ash_rpc_envelope=debug cargo run --example classify
//! ```

use ash_rpc_envelope::*;

fn answer(request: &Request) -> Result<Option<Response>> {
    if request.is_notification() {
        return Ok(None);
    }
    let response = match request.method() {
        "echo" => ResponseBuilder::new()
            .success(request.params().cloned().unwrap_or_default())
            .id(request.id().clone())
            .build()?,
        _ => rpc_method_not_found!(request.id().clone())?,
    };
    Ok(Some(response))
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("\n=== Message Classification Example ===\n");

    let codec = Codec::new(Limits::default().with_max_batch_len(8));

    let inbound: [&[u8]; 5] = [
        br#"{"jsonrpc":"2.0","id":42,"method":"echo","params":["hello"]}"#,
        br#"[{"jsonrpc":"2.0","id":1,"method":"echo","params":{"n":1}},{"jsonrpc":"2.0","method":"log"}]"#,
        br#"{"jsonrpc":"2.0","id":"abc","result":true}"#,
        br#"[]"#,
        br#"{"jsonrpc":"2.0","id":1.5,"method":"echo"}"#,
    ];

    for text in inbound {
        println!("<- {}", String::from_utf8_lossy(text));
        match codec.peek_kind(text) {
            Ok(kind) => println!("   kind: {kind}"),
            Err(err) => println!("   kind: undetermined ({err})"),
        }

        let mut replies: Vec<Response> = match codec.parse_message(text) {
            Ok(Message::Request(request)) => answer(&request)?.into_iter().collect(),
            Ok(Message::RequestBatch(batch)) => {
                let mut replies = Vec::new();
                for request in &batch {
                    replies.extend(answer(request)?);
                }
                replies
            }
            Ok(other) => {
                println!("   nothing to answer for a {}", other.kind());
                Vec::new()
            }
            Err(err) => {
                let mut response = Response::with_id(&Id::Null);
                response.set_error(err.to_error_object())?;
                vec![response]
            }
        };

        if replies.len() == 1 {
            println!("-> {}", replies[0].to_json()?);
        } else if !replies.is_empty() {
            println!("-> {}", ResponseBatch::from(replies).to_json()?);
        }
    }

    let mut ping = rpc_request!("ping", {"seq": 1}, 7)?;
    let mut buffer = [0u8; 16];
    if let Err(err) = ping.serialize_into(&mut buffer) {
        println!("\n16-byte buffer: {err}");
    }
    println!("ping still owns its params: {}", ping.params().is_some());

    Ok(())
}
