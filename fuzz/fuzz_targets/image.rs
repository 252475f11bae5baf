#![no_main]

use dxilmd::{CodecConfig, Container, MetadataCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut container) = Container::from_bytes(data) {
        let _ = MetadataCodec::new(&mut container).load_all();
        let _ = MetadataCodec::new(&mut container)
            .with_config(CodecConfig::structural())
            .load_all();
    }
});
