//! Log setup for the `cart-sync` binary.
//!
//! Standard output carries the cart snapshot, so every event goes to stderr.
//! `RUST_LOG` wins over the built-in directives when it is set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is absent. Quiet mode still lets failure
/// notifications (`error`) and store warnings through.
fn default_directives(verbose: bool, json: bool) -> &'static str {
    match (verbose, json) {
        (true, _) => "cart_sync=debug,info",
        (false, true) => "cart_sync=info",
        (false, false) => "cart_sync=warn",
    }
}

fn filter(verbose: bool, json: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, json)))
}

/// Install the global subscriber: compact lines for a terminal, one JSON
/// object per event when `json` is set.
pub fn init_logger(verbose: bool, json: bool) {
    let registry = tracing_subscriber::registry().with(filter(verbose, json));
    let base = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if json {
        registry.with(base.json()).init();
    } else {
        registry.with(base.compact()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false, false), "cart_sync=warn");
        assert_eq!(default_directives(false, true), "cart_sync=info");
        assert_eq!(default_directives(true, true), "cart_sync=debug,info");
    }
}
