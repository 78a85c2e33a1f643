// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # The Sandbox Logging Framework
//!
//! This crate initializes logging for the particle sandbox.  Everything logs through the [`log`]
//! facade; [`env_logger`] reads the logging configuration from the environment on desktop
//! platforms, and `console_log` forwards records to the Javascript console in the browser.
//! Build a [`LoggingConfig`] naming the crates to capture and call [`LoggingConfig::init`] once at
//! startup.
//!
//! By default, the logging level is set to [`Info`](log::Level::Info) for debug builds, and
//! [`Warn`](log::Level::Warn) for release builds. This can be overridden by setting the `RUST_LOG`
//! environment variable, like so:
//!
//! ```sh
//! $> RUST_LOG=imf_dynamics=trace cargo run
//! ```

mod platform;
mod platform_impl;
pub use platform::LoggingConfig;

/// A module which is typically glob imported.
pub mod prelude {
    pub use super::LoggingConfig;
}

// End of File
