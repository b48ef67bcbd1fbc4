#![no_main]

use ash_rpc_envelope::Response;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut response) = Response::parse(data) {
        assert!(response.is_success() != response.is_error());

        let text = response.to_json().expect("parsed response must serialize");
        let reparsed = Response::parse(text.as_bytes()).expect("serialized response must parse");
        assert_eq!(reparsed, response);
    }
});
