#![no_main]

use ash_rpc_envelope::Request;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut request) = Request::parse(data) {
        assert!(request.validate().is_ok());

        let text = request.to_json().expect("parsed request must serialize");
        let reparsed = Request::parse(text.as_bytes()).expect("serialized request must parse");
        assert_eq!(reparsed, request);
    }
});
