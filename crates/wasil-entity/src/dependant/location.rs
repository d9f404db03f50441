//! Supported service areas.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use wasil_core::AppError;

/// An area covered by the dispatcher network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    BeirutCentral,
    BeirutHamra,
    BeirutAshrafieh,
    JalElDib,
    Antelias,
    Jounieh,
    Byblos,
    Zahle,
    Tripoli,
    Saida,
    Tyre,
}

impl Location {
    /// Every supported area.
    pub const ALL: [Location; 11] = [
        Self::BeirutCentral,
        Self::BeirutHamra,
        Self::BeirutAshrafieh,
        Self::JalElDib,
        Self::Antelias,
        Self::Jounieh,
        Self::Byblos,
        Self::Zahle,
        Self::Tripoli,
        Self::Saida,
        Self::Tyre,
    ];

    /// Stored identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeirutCentral => "beirut_central",
            Self::BeirutHamra => "beirut_hamra",
            Self::BeirutAshrafieh => "beirut_ashrafieh",
            Self::JalElDib => "jal_el_dib",
            Self::Antelias => "antelias",
            Self::Jounieh => "jounieh",
            Self::Byblos => "byblos",
            Self::Zahle => "zahle",
            Self::Tripoli => "tripoli",
            Self::Saida => "saida",
            Self::Tyre => "tyre",
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BeirutCentral => "Beirut (Central)",
            Self::BeirutHamra => "Beirut (Hamra)",
            Self::BeirutAshrafieh => "Beirut (Ashrafieh)",
            Self::JalElDib => "Jal El Dib",
            Self::Antelias => "Antelias",
            Self::Jounieh => "Jounieh",
            Self::Byblos => "Byblos",
            Self::Zahle => "Zahle",
            Self::Tripoli => "Tripoli",
            Self::Saida => "Saida",
            Self::Tyre => "Tyre",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Location {
    type Err = AppError;

    /// Accepts either the stored identifier or the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s || l.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::validation(format!("Unsupported location: '{s}'")))
    }
}
