// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

/// Installs env_logger with `filter` as the default directive string.  A `RUST_LOG` variable in
/// the environment takes precedence.  Returns false if a logger was already installed.
pub(crate) fn init_with_filter(filter: &str, _level: log::LevelFilter) -> bool {
    // Use env_logger's builder API to avoid unsafe set_var call
    let env = if std::env::var("RUST_LOG").is_err() {
        env_logger::Env::default().default_filter_or(filter)
    } else {
        env_logger::Env::default()
    };
    env_logger::Builder::from_env(env).try_init().is_ok()
}

// End of File
