#![no_main]

use libfuzzer_sys::fuzz_target;
use lingotouch::Config;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Must never panic, whatever the input.
        if let Ok(config) = Config::from_toml_str(text) {
            let _ = config.validate();
        }
    }
});
