// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

pub(crate) fn init_with_filter(_filter: &str, log_level: log::LevelFilter) -> bool {
    // console_log filters by a single level, not per crate.
    let log_level = match log_level.to_level() {
        Some(level) => level,
        // console_log does not have an "off" level, so just don't configure it.
        None => return false,
    };
    console_log::init_with_level(log_level).is_ok()
}

// End of File
