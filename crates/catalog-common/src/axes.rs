//! Axis values that a coverage configuration can expose.
//!
//! Every value has a canonical string form (`as_str`) that is used verbatim in
//! identifiers, templates and configuration files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not the canonical form of any axis value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {axis} value: {value}")]
pub struct UnknownAxisValue {
    pub axis: &'static str,
    pub value: String,
}

macro_rules! axis_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $axis:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant ),+
        }

        impl $name {
            /// All values of this axis, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical string form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownAxisValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(UnknownAxisValue {
                        axis: $axis,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

axis_enum! {
    /// Whether a coverage holds model projections or past data.
    CoverageCategory, "coverage category" {
        Forecast => "forecast",
        Historical => "historical",
    }
}

axis_enum! {
    /// How an indicator value is expressed.
    MeasureType, "measure type" {
        Absolute => "absolute",
        Anomaly => "anomaly",
    }
}

axis_enum! {
    /// Temporal aggregation applied to an indicator.
    AggregationPeriod, "aggregation period" {
        Annual => "annual",
        TenYear => "10yr",
        ThirtyYear => "30yr",
    }
}

axis_enum! {
    /// Emission scenario of a forecast.
    Scenario, "scenario" {
        Rcp26 => "rcp26",
        Rcp45 => "rcp45",
        Rcp85 => "rcp85",
    }
}

axis_enum! {
    /// Part of the year an indicator is computed over.
    YearPeriod, "year period" {
        AllYear => "all_year",
        Winter => "winter",
        Spring => "spring",
        Summer => "summer",
        Autumn => "autumn",
        January => "january",
        February => "february",
        March => "march",
        April => "april",
        May => "may",
        June => "june",
        July => "july",
        August => "august",
        September => "september",
        October => "october",
        November => "november",
        December => "december",
    }
}

axis_enum! {
    /// Ten-year window of a historical decadal coverage.
    Decade, "decade" {
        Decade1961_1970 => "decade_1961_1970",
        Decade1971_1980 => "decade_1971_1980",
        Decade1981_1990 => "decade_1981_1990",
        Decade1991_2000 => "decade_1991_2000",
        Decade2001_2010 => "decade_2001_2010",
        Decade2011_2020 => "decade_2011_2020",
        Decade2021_2030 => "decade_2021_2030",
    }
}

axis_enum! {
    /// Climatological normal used as the baseline of anomalies.
    ReferencePeriod, "reference period" {
        ClimateStandardNormal1961_1990 => "climate_standard_normal_1961_1990",
        ClimateStandardNormal1991_2020 => "climate_standard_normal_1991_2020",
    }
}

impl Decade {
    /// First calendar year covered by the decade.
    pub fn start_year(&self) -> i32 {
        match self {
            Decade::Decade1961_1970 => 1961,
            Decade::Decade1971_1980 => 1971,
            Decade::Decade1981_1990 => 1981,
            Decade::Decade1991_2000 => 1991,
            Decade::Decade2001_2010 => 2001,
            Decade::Decade2011_2020 => 2011,
            Decade::Decade2021_2030 => 2021,
        }
    }

    /// Last calendar year covered by the decade (inclusive).
    pub fn end_year(&self) -> i32 {
        self.start_year() + 9
    }
}

impl ReferencePeriod {
    /// Inclusive `(start, end)` years of the normal.
    pub fn years(&self) -> (i32, i32) {
        match self {
            ReferencePeriod::ClimateStandardNormal1961_1990 => (1961, 1990),
            ReferencePeriod::ClimateStandardNormal1991_2020 => (1991, 2020),
        }
    }
}
