#![no_main]

use libfuzzer_sys::fuzz_target;
use rayshot::link;
use rayshot::registry::Registry;
use rayshot::view;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must return an error, never panic.
    let Ok(registry) = Registry::from_toml(text) else {
        return;
    };

    // A table that validates has unique names, so every theme round-trips.
    for theme in registry.iter() {
        let token = link::serialize_theme(&registry, theme);
        assert_eq!(link::deserialize_theme(&registry, &token), theme);
        let _ = view::style_map(theme, true);
        let _ = view::background(theme);
    }
});
