//! `tracing` subscriber setup for hosts embedding the forms.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Installs a global fmt subscriber. `RUST_LOG` takes precedence over
/// `default_filter`; an unparsable filter falls back to `info`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let _ = init("debug");
        assert!(!init("debug"));
    }
}
