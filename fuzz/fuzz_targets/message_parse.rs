#![no_main]

use ash_rpc_envelope::{Codec, Limits, Message, MessageKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new(Limits::default().with_max_batch_len(64));

    let peeked = codec.peek_kind(data);
    match codec.parse_message(data) {
        Ok(mut message) => {
            let kind = message.kind();
            assert_ne!(kind, MessageKind::Unknown);
            assert_eq!(peeked.ok(), Some(kind));

            match &mut message {
                Message::Request(request) => {
                    let _ = request.to_json();
                }
                Message::Response(response) => {
                    let _ = response.to_json();
                }
                Message::RequestBatch(batch) => {
                    let _ = batch.to_json();
                }
                Message::ResponseBatch(batch) => {
                    let _ = batch.to_json();
                }
                Message::Unknown => unreachable!(),
            }

            assert!(message.clear().is_ok());
            assert!(message.clear().is_err());
        }
        Err(err) => {
            let _ = err.to_error_object();
        }
    }
});
