#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use ash_rpc_envelope::{Id, RequestBuilder};
use libfuzzer_sys::arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum FuzzId {
    None,
    Number(i64),
    String(String),
    Null,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    method: String,
    id: FuzzId,
    params_raw: Vec<u8>,
    use_params: bool,
    buffer_len: u16,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    if let Ok(input) = FuzzInput::arbitrary(&mut u) {
        let id = match input.id {
            FuzzId::None => Id::None,
            FuzzId::Number(value) => Id::Number(value),
            FuzzId::String(value) => Id::String(value),
            FuzzId::Null => Id::Null,
        };

        let mut builder = RequestBuilder::new(&input.method).id(id);
        if input.use_params {
            if let Ok(params) = serde_json::from_slice::<serde_json::Value>(&input.params_raw) {
                builder = builder.params(params);
            }
        }

        let Ok(mut request) = builder.build() else {
            return;
        };
        let before = request.clone();

        let mut buffer = vec![0u8; usize::from(input.buffer_len)];
        let _ = request.serialize_into(&mut buffer);
        assert_eq!(request, before);

        let text = request.to_json().expect("built request must serialize");
        let reparsed = ash_rpc_envelope::Request::parse(text.as_bytes())
            .expect("serialized request must parse");
        assert_eq!(reparsed, before);
    }
});
