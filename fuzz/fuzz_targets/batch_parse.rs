#![no_main]

use ash_rpc_envelope::{Codec, Limits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new(Limits::default().with_max_batch_len(32));

    if let Ok(mut batch) = codec.parse_request_batch(data) {
        if !batch.is_empty() {
            let first = batch.to_json().expect("parsed batch must serialize");
            let second = batch.to_json().expect("parsed batch must serialize twice");
            assert_eq!(first, second);
        }
    }

    if let Ok(mut batch) = codec.parse_response_batch(data) {
        if !batch.is_empty() {
            let text = batch.to_json().expect("parsed batch must serialize");
            let reparsed = codec
                .parse_response_batch(text.as_bytes())
                .expect("serialized batch must parse");
            assert_eq!(reparsed, batch);
        }
    }
});
