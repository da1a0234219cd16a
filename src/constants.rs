//! Application constants for the subcatchment data server
//!
//! This module contains the fixed option lists served to the dashboard,
//! file naming conventions of the upstream pipeline, and configuration
//! defaults used throughout the application.

// =============================================================================
// Dashboard Option Lists
// =============================================================================

/// Simulation years available to the dashboard
pub const YEARS: &[&str] = &["1995", "2025", "2055", "2085"];

/// Climate variables (precipitation, evapotranspiration, relative humidity)
pub const VARIABLES: &[&str] = &["pr", "et", "rh"];

/// Shared socioeconomic pathway scenarios
pub const SCENARIOS: &[&str] = &["ssp126", "ssp585"];

// =============================================================================
// File and Column Conventions
// =============================================================================

/// Join key shared by geometry features and CSV rows
pub const SC_ID_COLUMN: &str = "SC_ID";

/// Static geometry file with all subcatchment boundaries
pub const SUBCATCHMENTS_FILENAME: &str = "subcatchments.geojson";

/// Suffix of per-year map data CSVs
pub const MAPDATA_FILE_SUFFIX: &str = "all_subcatchments.csv";

/// Content type for GeoJSON responses
pub const GEOJSON_CONTENT_TYPE: &str = "application/geo+json";

/// Content type for raw time series responses
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Error body for missing time series
pub const TIMESERIES_NOT_FOUND_MESSAGE: &str = "Time series data not found";

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listening port
pub const DEFAULT_PORT: u16 = 10000;

/// Default data root containing geojson/, mapdata/ and timeseries/
pub const DEFAULT_DATA_ROOT: &str = "data";

pub const GEOJSON_DIR_NAME: &str = "geojson";
pub const MAPDATA_DIR_NAME: &str = "mapdata";
pub const TIMESERIES_DIR_NAME: &str = "timeseries";

/// Default upper bound on cached map datasets
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 64;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted log level names
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Application name used for the config directory
pub const APP_NAME: &str = "subcatchment-server";

// =============================================================================
// Helper Functions
// =============================================================================

/// Map data CSV filename for a variable and year
pub fn mapdata_filename(variable: &str, year: &str) -> String {
    format!("{}_{}_{}", variable, year, MAPDATA_FILE_SUFFIX)
}

/// Year-specific geometry filename
pub fn vector_filename(year: &str) -> String {
    format!("vector_{}.geojson", year)
}

/// Time series CSV filename for a variable and site
pub fn timeseries_filename(variable: &str, sc_id: &str) -> String {
    format!("{}_{}.csv", variable, sc_id)
}

/// Name of the property added to each feature by the geometry join
pub fn joined_property_name(variable: &str, year: &str) -> String {
    format!("{}_{}", variable, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames() {
        assert_eq!(
            mapdata_filename("pr", "2025"),
            "pr_2025_all_subcatchments.csv"
        );
        assert_eq!(vector_filename("2055"), "vector_2055.geojson");
        assert_eq!(timeseries_filename("et", "000"), "et_000.csv");
    }

    #[test]
    fn test_joined_property_name() {
        assert_eq!(joined_property_name("pr", "2025"), "pr_2025");
        assert_eq!(joined_property_name("rh", "1995"), "rh_1995");
    }

    #[test]
    fn test_option_lists() {
        assert_eq!(YEARS, &["1995", "2025", "2055", "2085"]);
        assert_eq!(VARIABLES, &["pr", "et", "rh"]);
        assert_eq!(SCENARIOS, &["ssp126", "ssp585"]);
    }
}
