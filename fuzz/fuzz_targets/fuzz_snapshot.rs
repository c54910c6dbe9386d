#![no_main]

use libfuzzer_sys::fuzz_target;
use satdash::fetch::decode_documents;
use satdash::render::{render_dashboard, RenderConfig};
use satdash::table::build;

fuzz_target!(|data: &[u8]| {
    // Snapshot contents are untrusted; decoding, building and rendering must
    // fail with an error or succeed, never panic
    let Ok(documents) = serde_json::from_slice::<Vec<serde_json::Value>>(data) else {
        return;
    };
    let Ok(records) = decode_documents(&documents) else {
        return;
    };
    if let Ok(table) = build(&records) {
        render_dashboard(&table, &RenderConfig::default());
    }
});
