// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

/// Initializes the logging framework to capture logs from the crates specified with a minimum
/// [`log::Level`] of [`Info`](log::Level::Info) on debug builds and [`Warn`](log::Level::Warn) on
/// release builds.  On desktop platforms, these defaults can be overridden by setting the
/// `RUST_LOG` environment variable.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    crates: Vec<&'static str>,
    level: log::LevelFilter,
}

impl LoggingConfig {
    /// Creates a new [`LoggingConfig`] capturing logs from the specified list of crates at the
    /// build profile's default level.
    pub fn new(crates: Vec<&'static str>) -> Self {
        Self {
            crates,
            level: if cfg!(debug_assertions) {
                log::LevelFilter::Info
            } else {
                log::LevelFilter::Warn
            },
        }
    }

    /// Overrides the minimum level captured from every listed crate.
    pub fn with_level(mut self, level: log::LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> log::LevelFilter {
        self.level
    }

    /// The filter string that would have been set in `RUST_LOG`, e.g.
    /// `imf_sandbox=info,imf_dynamics=info`.
    pub fn filter_directives(&self) -> String {
        let level_str = match self.level {
            log::LevelFilter::Off => "off",
            log::LevelFilter::Error => "error",
            log::LevelFilter::Warn => "warn",
            log::LevelFilter::Info => "info",
            log::LevelFilter::Debug => "debug",
            log::LevelFilter::Trace => "trace",
        };
        self.crates
            .iter()
            .map(|&pkg_name| format!("{}={}", pkg_name, level_str))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Installs the platform logger.  Returns false when a logger was already installed or the
    /// platform has none, in which case log records are silently dropped.
    pub fn init(&self) -> bool {
        crate::platform_impl::init_with_filter(&self.filter_directives(), self.level)
    }
}


// End of File
