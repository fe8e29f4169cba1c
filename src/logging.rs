//! Logger setup for the command-line tool.
//!
//! The library logs through the `log` facade:
//! - `info!` when a search starts (candidate count, inventory size, strategy)
//!   and when it ends (placements evaluated, elapsed time)
//! - `debug!` for the per-beam step cap and every refractive split
//! - `warn!` when a beam is abandoned at the step cap

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default level for a run: search progress only, or split-by-split detail.
fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` takes precedence over the level chosen by `verbose`. Output
/// carries no timestamps. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);

    if let Err(err) = builder.try_init() {
        log::debug!("keeping the installed logger: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_debug() {
        assert_eq!(default_level(true), LevelFilter::Debug);
        assert_eq!(default_level(false), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
