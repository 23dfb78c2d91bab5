// src/mode.rs

//! Build mode flags derived once from the command line.

/// Immutable set of build toggles for one process invocation.
///
/// Constructed at startup and handed by value to every pipeline task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Run the script minifier.
    pub minify: bool,
    /// Write `.map` files next to outputs.
    pub source_maps: bool,
    /// Skip and log broken input files instead of failing the task.
    pub fault_barrier: bool,
    /// Render templates with indentation and newlines.
    pub pretty_output: bool,
    /// Notify live-reload listeners after a task wrote its outputs.
    pub live_reload: bool,
}

impl BuildMode {
    /// Derive the mode from the `production` flag.
    ///
    /// `livereload` picks the live-reload rule: an explicit value wins,
    /// `None` means "on in development, off in production".
    pub fn resolve(production: bool, livereload: Option<bool>) -> Self {
        Self {
            minify: production,
            source_maps: production,
            fault_barrier: !production,
            pretty_output: !production,
            live_reload: livereload.unwrap_or(!production),
        }
    }

    pub fn development() -> Self {
        Self::resolve(false, None)
    }

    pub fn production() -> Self {
        Self::resolve(true, None)
    }

    /// True when built with `--production`.
    pub fn is_production(&self) -> bool {
        self.minify
    }

    pub fn label(&self) -> &'static str {
        if self.is_production() {
            "production"
        } else {
            "development"
        }
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        Self::resolve(false, Some(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_flags() {
        let mode = BuildMode::resolve(true, Some(false));
        assert!(mode.minify);
        assert!(mode.source_maps);
        assert!(!mode.fault_barrier);
        assert!(!mode.pretty_output);
        assert!(!mode.live_reload);
    }

    #[test]
    fn development_flags_are_the_negation() {
        let prod = BuildMode::resolve(true, None);
        let dev = BuildMode::resolve(false, None);
        assert_eq!(dev.minify, !prod.minify);
        assert_eq!(dev.source_maps, !prod.source_maps);
        assert_eq!(dev.fault_barrier, !prod.fault_barrier);
        assert_eq!(dev.pretty_output, !prod.pretty_output);
    }

    #[test]
    fn implicit_live_reload_follows_development() {
        assert!(BuildMode::resolve(false, None).live_reload);
        assert!(!BuildMode::resolve(true, None).live_reload);
    }

    #[test]
    fn explicit_live_reload_wins() {
        assert!(BuildMode::resolve(true, Some(true)).live_reload);
        assert!(!BuildMode::resolve(false, Some(false)).live_reload);
    }

    #[test]
    fn absent_input_is_development() {
        let mode = BuildMode::default();
        assert!(!mode.is_production());
        assert!(mode.fault_barrier);
        assert_eq!(mode.label(), "development");
    }
}
