//! Session mode detection.
//!
//! Demo mode tolerates decryption-service unavailability by substituting
//! a deterministic locally-derived verdict; live mode treats the remote
//! decryption as authoritative. The mode is resolved once at session
//! start and never re-evaluated mid-session, so a single submit/decrypt
//! cycle cannot flip behavior halfway through.

use std::fmt;

/// Session behavior profile, fixed at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Demo,
}

impl Mode {
    pub fn is_demo(self) -> bool {
        matches!(self, Mode::Demo)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Live => "live",
            Mode::Demo => "demo",
        })
    }
}

/// The inputs mode detection consults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeFlags {
    /// Explicit per-session override (query-parameter analog).
    pub override_demo: Option<bool>,

    /// Persisted preference (localStorage analog).
    pub persisted_demo: Option<bool>,

    /// Build-time default.
    pub build_default_demo: bool,
}

impl ModeFlags {
    /// Resolve the session mode.
    ///
    /// Precedence, highest first: explicit override, persisted
    /// preference, build-time default. An override of `false` forces
    /// live mode even over a persisted demo preference.
    pub fn detect(self) -> Mode {
        let demo = self
            .override_demo
            .or(self.persisted_demo)
            .unwrap_or(self.build_default_demo);
        if demo { Mode::Demo } else { Mode::Live }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_live() {
        assert_eq!(ModeFlags::default().detect(), Mode::Live);
    }

    #[test]
    fn build_default_applies_when_nothing_else_is_set() {
        let flags = ModeFlags {
            build_default_demo: true,
            ..Default::default()
        };
        assert_eq!(flags.detect(), Mode::Demo);
    }

    #[test]
    fn persisted_preference_beats_build_default() {
        let flags = ModeFlags {
            persisted_demo: Some(false),
            build_default_demo: true,
            ..Default::default()
        };
        assert_eq!(flags.detect(), Mode::Live);

        let flags = ModeFlags {
            persisted_demo: Some(true),
            build_default_demo: false,
            ..Default::default()
        };
        assert_eq!(flags.detect(), Mode::Demo);
    }

    #[test]
    fn explicit_override_beats_everything() {
        let flags = ModeFlags {
            override_demo: Some(false),
            persisted_demo: Some(true),
            build_default_demo: true,
        };
        assert_eq!(flags.detect(), Mode::Live);

        let flags = ModeFlags {
            override_demo: Some(true),
            persisted_demo: Some(false),
            build_default_demo: false,
        };
        assert_eq!(flags.detect(), Mode::Demo);
    }
}
