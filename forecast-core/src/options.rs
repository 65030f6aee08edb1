//! Closed sets of request options and their wire tokens.

use std::{fmt, str::FromStr};

use crate::error::UnknownOption;

/// Measurement convention applied to numeric fields of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitSystem {
    /// Imperial units, the API default.
    Us,
    /// SI units.
    Si,
    /// SI, except wind speed in kilometers per hour.
    Ca,
    /// SI, except wind speed in miles per hour.
    Uk,
    /// Chosen by the server from the requested location.
    Auto,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Us => "us",
            UnitSystem::Si => "si",
            UnitSystem::Ca => "ca",
            UnitSystem::Uk => "uk",
            UnitSystem::Auto => "auto",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[
            UnitSystem::Us,
            UnitSystem::Si,
            UnitSystem::Ca,
            UnitSystem::Uk,
            UnitSystem::Auto,
        ]
    }
}

/// Server-side switch for a longer forecast range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionMode {
    /// Return hour-by-hour data for the next week instead of two days.
    Hourly,
}

impl ExtensionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionMode::Hourly => "hourly",
        }
    }

    pub const fn all() -> &'static [ExtensionMode] {
        &[ExtensionMode::Hourly]
    }
}

/// A section of the response the caller can ask the server to omit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExcludeBlock {
    Currently,
    Minutely,
    Hourly,
    Daily,
    Alerts,
    Flags,
}

impl ExcludeBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExcludeBlock::Currently => "currently",
            ExcludeBlock::Minutely => "minutely",
            ExcludeBlock::Hourly => "hourly",
            ExcludeBlock::Daily => "daily",
            ExcludeBlock::Alerts => "alerts",
            ExcludeBlock::Flags => "flags",
        }
    }

    pub const fn all() -> &'static [ExcludeBlock] {
        &[
            ExcludeBlock::Currently,
            ExcludeBlock::Minutely,
            ExcludeBlock::Hourly,
            ExcludeBlock::Daily,
            ExcludeBlock::Alerts,
            ExcludeBlock::Flags,
        ]
    }
}

// Display, TryFrom<&str> and FromStr all go through `as_str`/`all`, so a new
// variant only needs an arm in `as_str` and an entry in `all`.
macro_rules! wire_token_impls {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = UnknownOption;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let lower = value.trim().to_lowercase();

                $ty::all()
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == lower)
                    .ok_or_else(|| UnknownOption {
                        kind: $kind,
                        value: value.to_string(),
                        supported: $ty::all()
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl FromStr for $ty {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::try_from(s)
            }
        }
    };
}

wire_token_impls!(UnitSystem, "unit system");
wire_token_impls!(ExtensionMode, "extension mode");
wire_token_impls!(ExcludeBlock, "exclude block");
