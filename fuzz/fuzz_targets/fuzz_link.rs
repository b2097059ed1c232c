#![no_main]

use libfuzzer_sys::fuzz_target;
use rayshot::link::{Fragment, LinkState, THEME_KEY};
use rayshot::registry::Registry;
use rayshot::state::Selection;
use rayshot::view::View;

fuzz_target!(|data: &[u8]| {
    let Ok(link) = std::str::from_utf8(data) else {
        return;
    };

    // Hydration and derivation must not panic on arbitrary links.
    let registry = Registry::builtin();
    let mut selection = Selection::new(registry);
    selection.hydrate(&Fragment::from_link(link));
    let _ = View::derive(&selection);

    // Whatever was resolved must be a registry theme.
    let theme = selection.theme();
    assert!(registry.lookup(&theme.id).is_some());

    // Writing the selection back and re-reading it is stable.
    let mut fragment = Fragment::parse(link);
    selection.write_link(&mut fragment);
    assert_eq!(fragment.get(THEME_KEY).as_deref(), Some(theme.id.as_str()));

    let mut reread = Selection::new(registry);
    reread.hydrate(&Fragment::parse(&fragment.to_string()));
    assert_eq!(reread.theme(), selection.theme());
    assert_eq!(reread.dark_mode(), selection.dark_mode());
});
