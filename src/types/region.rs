//! Query dimensions of the Climate at a Glance global time series: the region
//! a series covers and the surface it is measured over.

use std::fmt;

/// A region with a published global time series.
///
/// Each variant carries the path code used by the remote service and the
/// human readable label written into output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Globe,
    NorthernHemisphere,
    SouthernHemisphere,
    Europe,
    Asia,
    Africa,
}

impl Region {
    /// Every region, in the order they are queried.
    pub const ALL: [Region; 6] = [
        Region::Globe,
        Region::NorthernHemisphere,
        Region::SouthernHemisphere,
        Region::Europe,
        Region::Asia,
        Region::Africa,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Globe => "globe",
            Region::NorthernHemisphere => "nhem",
            Region::SouthernHemisphere => "shem",
            Region::Europe => "europe",
            Region::Asia => "asia",
            Region::Africa => "africa",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Globe => "Global",
            Region::NorthernHemisphere => "Northern Hemisphere",
            Region::SouthernHemisphere => "Southern Hemisphere",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::Africa => "Africa",
        }
    }

    /// Continental regions have no ocean-only series upstream.
    pub fn is_continental(&self) -> bool {
        matches!(self, Region::Europe | Region::Asia | Region::Africa)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The measurement domain of a temperature series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    LandOcean,
    Land,
    Ocean,
}

impl SurfaceType {
    pub const ALL: [SurfaceType; 3] = [SurfaceType::LandOcean, SurfaceType::Land, SurfaceType::Ocean];

    pub fn code(&self) -> &'static str {
        match self {
            SurfaceType::LandOcean => "land_ocean",
            SurfaceType::Land => "land",
            SurfaceType::Ocean => "ocean",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SurfaceType::LandOcean => "Land and Ocean",
            SurfaceType::Land => "Land",
            SurfaceType::Ocean => "Ocean",
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A variable of the U.S. national series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NationalVariable {
    /// Total precipitation, inches.
    Precipitation,
    /// Average temperature, degrees Fahrenheit.
    AverageTemperature,
}

impl NationalVariable {
    pub fn code(&self) -> &'static str {
        match self {
            NationalVariable::Precipitation => "pcp",
            NationalVariable::AverageTemperature => "tavg",
        }
    }
}

impl fmt::Display for NationalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
