#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must not panic on any config content
    let _ = mistlog::config::extract_sources(data);
    if let Ok(config) = mistlog::Config::parse(data) {
        let _ = config.parse_level();
        for file in config.files.values() {
            let _ = file.options();
        }
    }
});
