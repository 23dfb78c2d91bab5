// tests/mode_resolver.rs

use assetwatch::mode::BuildMode;
use proptest::prelude::*;

proptest! {
    #[test]
    fn flags_follow_the_production_switch(production in any::<bool>(), livereload in proptest::option::of(any::<bool>())) {
        let mode = BuildMode::resolve(production, livereload);

        prop_assert_eq!(mode.minify, production);
        prop_assert_eq!(mode.source_maps, production);
        prop_assert_eq!(mode.fault_barrier, !production);
        prop_assert_eq!(mode.pretty_output, !production);
        prop_assert_eq!(mode.live_reload, livereload.unwrap_or(!production));
        prop_assert_eq!(mode.is_production(), production);
    }
}

#[test]
fn explicit_livereload_overrides_implicit_rule() {
    assert!(BuildMode::resolve(true, Some(true)).live_reload);
    assert!(!BuildMode::resolve(false, Some(false)).live_reload);
    assert!(BuildMode::resolve(false, None).live_reload);
    assert!(!BuildMode::resolve(true, None).live_reload);
}
