// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Headless driver: loads a scenario, steps it at a fixed frame rate and logs population
//! statistics once per simulated second.
//!
//! ```text
//! imf-sandbox [scenario.toml] [--substance=water] [--frames=600] [--fps=60] [--dump-config]
//! ```

use anyhow::{anyhow, bail, Context, Result};
use dynamics::prelude::*;
use log::{debug, info};
use logging::LoggingConfig;
use std::env;

const DEFAULT_FRAMES: u64 = 600;
const DEFAULT_FPS: f64 = 60.0;

struct Options {
    config_path: Option<String>,
    substance: Option<Substance>,
    frames: u64,
    fps: f64,
    dump_config: bool,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        config_path: None,
        substance: None,
        frames: DEFAULT_FRAMES,
        fps: DEFAULT_FPS,
        dump_config: false,
    };

    for arg in env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--frames=") {
            options.frames = value
                .parse()
                .with_context(|| format!("invalid frame count {:?}", value))?;
        } else if let Some(value) = arg.strip_prefix("--fps=") {
            let fps: f64 = value
                .parse()
                .with_context(|| format!("invalid frame rate {:?}", value))?;
            if !(fps.is_finite() && fps > 0.0) {
                bail!("frame rate must be positive, got {}", fps);
            }
            options.fps = fps;
        } else if let Some(value) = arg.strip_prefix("--substance=") {
            options.substance = Some(parse_substance(value)?);
        } else if arg == "--dump-config" {
            options.dump_config = true;
        } else if arg.starts_with("--") {
            bail!("unknown option {}", arg);
        } else if options.config_path.is_none() {
            options.config_path = Some(arg);
        } else {
            bail!("more than one scenario file given");
        }
    }
    Ok(options)
}

fn parse_substance(value: &str) -> Result<Substance> {
    let wanted = value.replace(['_', '-'], " ").to_lowercase();
    Substance::ALL
        .into_iter()
        .find(|substance| substance.name() == wanted)
        .ok_or_else(|| {
            let known: Vec<_> = Substance::ALL.iter().map(Substance::name).collect();
            anyhow!("unknown substance {:?}, expected one of {}", value, known.join(", "))
        })
}

fn run() -> Result<()> {
    LoggingConfig::new(vec!["imf_sandbox", "imf_dynamics"]).init();
    let options = parse_args()?;

    let mut config = match &options.config_path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading scenario {}", path))?,
        None => SimulationConfig::default(),
    };
    if let Some(substance) = options.substance {
        config.substance = Some(substance);
    }

    if options.dump_config {
        print!("{}", config.sanitized().to_toml_string()?);
        return Ok(());
    }

    let mut simulation = Simulation::new(config);
    let dt = 1.0 / options.fps;
    let frames_per_report = options.fps.round().max(1.0) as u64;

    for frame in 1..=options.frames {
        let report = simulation.step(dt);
        if report.transitions.evaporated + report.transitions.condensed > 0 {
            debug!(
                "frame {}: {} evaporated, {} condensed",
                frame, report.transitions.evaporated, report.transitions.condensed
            );
        }
        if frame % frames_per_report == 0 || frame == options.frames {
            let stats = simulation.statistics();
            info!(
                "t={:.2}s particles={} gas={:.1}% kT={:.1} heat={:.2} substeps={} contacts={}",
                stats.time,
                stats.particle_count,
                100.0 * stats.gas_fraction,
                stats.temperature,
                stats.mean_thermal_load,
                report.substeps,
                report.collisions.contacts,
            );
        }
    }

    let stats = simulation.statistics();
    println!(
        "{:.2}s simulated: {} particles, {:.1}% gas, mean kinetic energy {:.2}",
        stats.time,
        stats.particle_count,
        100.0 * stats.gas_fraction,
        stats.mean_kinetic_energy
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("because: {}", cause);
        }
        std::process::exit(1);
    }
}

// End of File
