//! Log output setup
//!
//! Builds the dispatcher for one invocation. The caller installs it as the
//! scoped default, no global subscriber is ever set.

use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Console output at debug level when `debug` is set, JSON lines at info
/// level otherwise. `RUST_LOG` refines either. Everything goes to stderr.
pub fn dispatch(debug: bool) -> Dispatch {
    let default_level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if debug {
        Dispatch::new(builder.compact().finish())
    } else {
        Dispatch::new(builder.json().finish())
    }
}

