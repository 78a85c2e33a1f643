// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use serde::{Deserialize, Serialize};

use crate::forces::ForceCoefficients;

/// Preset substances, ordered roughly from strongest to weakest cohesion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substance {
    /// Hydrogen bonding and a strong dipole.
    Water,
    /// Weaker hydrogen bonding.
    Ethanol,
    /// Dipole-dipole only.
    Acetone,
    /// Dispersion only, but a deep well.
    Hexane,
    /// Dispersion only, shallow well.
    NobleGas,
}

impl Substance {
    pub const ALL: [Substance; 5] = [
        Substance::Water,
        Substance::Ethanol,
        Substance::Acetone,
        Substance::Hexane,
        Substance::NobleGas,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Substance::Water => "water",
            Substance::Ethanol => "ethanol",
            Substance::Acetone => "acetone",
            Substance::Hexane => "hexane",
            Substance::NobleGas => "noble gas",
        }
    }

    pub fn coefficients(&self) -> ForceCoefficients {
        let (pair_strength, hydrogen_bond, dipole) = match self {
            Substance::Water => (1.0, 40.0, 15.0),
            Substance::Ethanol => (1.0, 25.0, 10.0),
            Substance::Acetone => (1.0, 0.0, 18.0),
            Substance::Hexane => (1.4, 0.0, 0.0),
            Substance::NobleGas => (0.5, 0.0, 0.0),
        };
        ForceCoefficients {
            pair_strength,
            hydrogen_bond,
            dipole,
        }
    }
}

impl std::fmt::Display for Substance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}


// End of File
