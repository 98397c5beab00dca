//! Enumerates the (region, surface[, lookback]) combinations a processor
//! queries, dropping the combinations known to have no upstream data.

use crate::types::region::{Region, SurfaceType};

/// Lookback windows, in years, used for trend summaries.
pub const LOOKBACK_PERIODS: [i32; 3] = [10, 30, 50];

/// One region/surface pair to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub region: Region,
    pub surface: SurfaceType,
}

/// One region/surface pair with a lookback window in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrendKey {
    pub series: SeriesKey,
    pub period: i32,
}

/// Ocean-only series are not published for continental regions.
pub fn is_excluded(region: Region, surface: SurfaceType) -> bool {
    region.is_continental() && surface == SurfaceType::Ocean
}

/// Yields every region × surface combination that has data, region-major.
pub fn series_keys(
    regions: &[Region],
    surfaces: &[SurfaceType],
) -> impl Iterator<Item = SeriesKey> {
    let surfaces = surfaces.to_vec();
    regions.to_vec().into_iter().flat_map(move |region| {
        surfaces
            .clone()
            .into_iter()
            .filter(move |surface| !is_excluded(region, *surface))
            .map(move |surface| SeriesKey { region, surface })
    })
}

/// Crosses [`series_keys`] with lookback periods. Periods are never skipped.
pub fn trend_keys(
    regions: &[Region],
    surfaces: &[SurfaceType],
    periods: &[i32],
) -> impl Iterator<Item = TrendKey> {
    let periods = periods.to_vec();
    series_keys(regions, surfaces).flat_map(move |series| {
        periods
            .clone()
            .into_iter()
            .map(move |period| TrendKey { series, period })
    })
}
