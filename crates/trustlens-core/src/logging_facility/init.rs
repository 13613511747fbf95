//! Subscriber installation

use std::sync::OnceLock;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output profile of the process-wide subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines on stderr, `trustlens=debug`
    Development,
    /// One JSON object per event on stderr, `trustlens=info`
    Production,
    /// No output; pair with `init_test_capture()` to assert on events
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset. The directive is a target
    /// prefix, so it covers every `trustlens_*` crate.
    fn default_filter(self) -> EnvFilter {
        EnvFilter::new(match self {
            Profile::Development => "trustlens=debug",
            Profile::Production => "trustlens=info",
            Profile::Test => "off",
        })
    }
}

static ACTIVE: OnceLock<Profile> = OnceLock::new();

/// Install the global subscriber for `profile`.
///
/// Only the first call has any effect. `RUST_LOG` replaces the profile's
/// default filter. If another subscriber is already installed (a test
/// capture layer, say), that subscriber is left in place.
pub fn init(profile: Profile) {
    ACTIVE.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| profile.default_filter());
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
        if installed.is_err() {
            tracing::debug!(?profile, "subscriber already installed");
        }
        profile
    });
}

/// Profile passed to the first [`init`] call, if any
pub fn active_profile() -> Option<Profile> {
    ACTIVE.get().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_profile_wins() {
        init(Profile::Test);
        init(Profile::Production);
        assert_eq!(active_profile(), Some(Profile::Test));
    }
}
