#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use ash_rpc_envelope::{Codec, ErrorBuilder, Limits, ResponseBuilder};
use libfuzzer_sys::arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    result_raw: Vec<u8>,
    error_code: i32,
    error_message: String,
    error_data_raw: Vec<u8>,
    id: Option<i64>,
    use_result: bool,
    use_error: bool,
    use_error_data: bool,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    if let Ok(input) = FuzzInput::arbitrary(&mut u) {
        let mut builder = ResponseBuilder::new();
        if let Some(id) = input.id {
            builder = builder.id(id);
        }

        if input.use_result {
            if let Ok(result) = serde_json::from_slice::<serde_json::Value>(&input.result_raw) {
                builder = builder.success(result);
            }
        }

        if input.use_error {
            let mut error = ErrorBuilder::new(input.error_code, &input.error_message);
            if input.use_error_data {
                if let Ok(data) = serde_json::from_slice::<serde_json::Value>(&input.error_data_raw)
                {
                    error = error.data(data);
                }
            }
            if let Ok(error) = error.build() {
                builder = builder.error(error);
            }
        }

        let Ok(mut response) = builder.build() else {
            return;
        };
        assert!(response.is_success() != response.is_error());

        let text = response.to_json().expect("built response must serialize");
        let codec = Codec::new(Limits::unlimited().with_max_error_message_len(usize::MAX));
        let reparsed = codec
            .parse_response(text.as_bytes())
            .expect("serialized response must parse");
        assert_eq!(reparsed, response);
    }
});
