use crate::types::region::{NationalVariable, Region, SurfaceType};

pub const DEFAULT_GLOBAL_BASE_URL: &str =
    "https://www.ncei.noaa.gov/access/monitoring/climate-at-a-glance/global/time-series";
pub const DEFAULT_NATIONAL_BASE_URL: &str =
    "https://www.ncei.noaa.gov/access/monitoring/climate-at-a-glance/national/time-series";

/// Region code of the contiguous United States in the national series.
pub const NATIONAL_REGION_CODE: &str = "110";

/// Base URLs of the two time-series families and the URL templates under them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub global_base: String,
    pub national_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            global_base: DEFAULT_GLOBAL_BASE_URL.to_string(),
            national_base: DEFAULT_NATIONAL_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(global_base: impl Into<String>, national_base: impl Into<String>) -> Self {
        Self {
            global_base: global_base.into(),
            national_base: national_base.into(),
        }
    }

    pub fn global_url(
        &self,
        region: Region,
        surface: SurfaceType,
        start_year: i32,
        end_year: i32,
    ) -> String {
        format!(
            "{}/{}/{}/1/12/{}-{}/data.json",
            self.global_base.trim_end_matches('/'),
            region.code(),
            surface.code(),
            start_year,
            end_year
        )
    }

    pub fn national_url(&self, variable: NationalVariable, start_year: i32, end_year: i32) -> String {
        format!(
            "{}/{}/{}/1/12/{}-{}/data.json",
            self.national_base.trim_end_matches('/'),
            NATIONAL_REGION_CODE,
            variable.code(),
            start_year,
            end_year
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_url_template() {
        let endpoints = Endpoints::new("https://example.test/global/", "https://example.test/national");
        assert_eq!(
            endpoints.global_url(Region::NorthernHemisphere, SurfaceType::LandOcean, 1850, 2024),
            "https://example.test/global/nhem/land_ocean/1/12/1850-2024/data.json"
        );
    }

    #[test]
    fn test_national_url_template() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.national_url(NationalVariable::AverageTemperature, 1895, 2024),
            format!("{}/110/tavg/1/12/1895-2024/data.json", DEFAULT_NATIONAL_BASE_URL)
        );
    }
}
