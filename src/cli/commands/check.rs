//! Check command implementation
//!
//! Reports, for the fixed dashboard options, which geometry and map data
//! files exist, and counts time series files per scenario and variable.

use super::shared::{load_configuration, log_config_source, setup_logging};
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::DataPaths;
use crate::constants::{SCENARIOS, SUBCATCHMENTS_FILENAME, VARIABLES, YEARS, vector_filename};
use crate::error::{Result, ServiceError};
use crate::models::DatasetKey;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize)]
pub struct RootStatus {
    pub label: String,
    pub path: PathBuf,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub scenario: Option<String>,
    pub variable: Option<String>,
    pub year: String,
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesCount {
    pub scenario: String,
    pub variable: String,
    pub files: usize,
}

/// Coverage of the data directories
#[derive(Debug, Clone, Serialize)]
pub struct DataReport {
    pub roots: Vec<RootStatus>,
    pub subcatchments_present: bool,
    pub geometry: Vec<FileStatus>,
    pub mapdata: Vec<FileStatus>,
    pub timeseries: Vec<SeriesCount>,
}

impl DataReport {
    pub fn build(paths: &DataPaths) -> Result<Self> {
        let roots = paths
            .entries()
            .iter()
            .map(|(label, path)| RootStatus {
                label: label.to_string(),
                path: path.to_path_buf(),
                exists: path.is_dir(),
            })
            .collect();

        let mut geometry = Vec::new();
        let mut mapdata = Vec::new();
        for year in YEARS {
            let vector = paths.geojson_dir.join(vector_filename(year));
            geometry.push(FileStatus {
                scenario: None,
                variable: None,
                year: year.to_string(),
                present: vector.is_file(),
                path: vector,
            });

            for scenario in SCENARIOS {
                for variable in VARIABLES {
                    let key = DatasetKey::new(*scenario, *variable, *year)?;
                    let path = key.mapdata_path(&paths.mapdata_dir);
                    mapdata.push(FileStatus {
                        scenario: Some(key.scenario),
                        variable: Some(key.variable),
                        year: key.year,
                        present: path.is_file(),
                        path,
                    });
                }
            }
        }

        Ok(Self {
            roots,
            subcatchments_present: paths.geojson_dir.join(SUBCATCHMENTS_FILENAME).is_file(),
            geometry,
            mapdata,
            timeseries: count_time_series(&paths.timeseries_dir)?,
        })
    }

    /// Number of expected files that are absent
    pub fn missing_count(&self) -> usize {
        let missing_files = self
            .geometry
            .iter()
            .chain(self.mapdata.iter())
            .filter(|status| !status.present)
            .count();
        missing_files + usize::from(!self.subcatchments_present)
    }
}

/// Count `<scenario>/<variable>/*.csv` files under the time series root
pub fn count_time_series(timeseries_root: &Path) -> Result<Vec<SeriesCount>> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    if !timeseries_root.is_dir() {
        warn!(
            "Time series directory not found: {}",
            timeseries_root.display()
        );
        return Ok(Vec::new());
    }

    for entry in WalkDir::new(timeseries_root)
        .min_depth(3)
        .max_depth(3)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| {
            ServiceError::configuration(format!(
                "Failed to walk {}: {}",
                timeseries_root.display(),
                e
            ))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "csv") {
            continue;
        }

        let Ok(relative) = path.strip_prefix(timeseries_root) else {
            continue;
        };
        let mut components = relative.components();
        let (Some(scenario), Some(variable)) = (components.next(), components.next()) else {
            continue;
        };
        *counts
            .entry((
                scenario.as_os_str().to_string_lossy().into_owned(),
                variable.as_os_str().to_string_lossy().into_owned(),
            ))
            .or_default() += 1;
    }

    debug!("Counted time series in {} groups", counts.len());
    Ok(counts
        .into_iter()
        .map(|((scenario, variable), files)| SeriesCount {
            scenario,
            variable,
            files,
        })
        .collect())
}

/// Check command runner
pub async fn run_check(args: CheckArgs) -> Result<DataReport> {
    setup_logging(args.get_log_level(), true)?;

    let config = load_configuration(&args.data)?;
    log_config_source(&config);
    info!("Checking data directories");

    let report = DataReport::build(&config.data)?;
    match args.output_format {
        OutputFormat::Human => print_human_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(report)
}

fn mark(present: bool) -> ColoredString {
    if present { "ok".green() } else { "missing".red() }
}

fn print_human_report(report: &DataReport) {
    println!("{}", "Data directories".bold());
    for root in &report.roots {
        println!(
            "  {:<11} {} [{}]",
            format!("{}:", root.label),
            root.path.display(),
            mark(root.exists)
        );
    }

    println!("\n{}", "Geometry".bold());
    println!(
        "  {:<28} [{}]",
        SUBCATCHMENTS_FILENAME,
        mark(report.subcatchments_present)
    );
    for status in &report.geometry {
        println!(
            "  {:<28} [{}]",
            vector_filename(&status.year),
            mark(status.present)
        );
    }

    println!("\n{}", "Map data".bold());
    for status in &report.mapdata {
        println!(
            "  {:<8} {:<4} {:<6} [{}]",
            status.scenario.as_deref().unwrap_or_default(),
            status.variable.as_deref().unwrap_or_default(),
            status.year,
            mark(status.present)
        );
    }

    println!("\n{}", "Time series".bold());
    if report.timeseries.is_empty() {
        println!("  {}", "no time series files found".yellow());
    }
    for count in &report.timeseries {
        println!(
            "  {:<8} {:<4} {} files",
            count.scenario, count.variable, count.files
        );
    }

    let missing = report.missing_count();
    println!();
    if missing == 0 {
        println!("{}", "All expected files present".green().bold());
    } else {
        println!(
            "{}",
            format!("{} expected files missing", missing).yellow().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_report_on_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DataPaths::from_root(temp_dir.path());

        let report = DataReport::build(&paths).unwrap();

        assert!(report.roots.iter().all(|root| !root.exists));
        assert_eq!(report.geometry.len(), 4);
        assert_eq!(report.mapdata.len(), 4 * 2 * 3);
        assert!(report.timeseries.is_empty());
        assert_eq!(report.missing_count(), 1 + 4 + 24);
    }

    #[test]
    fn test_report_counts_present_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DataPaths::from_root(temp_dir.path());

        fs::create_dir_all(&paths.geojson_dir).unwrap();
        fs::write(paths.geojson_dir.join("subcatchments.geojson"), "{}").unwrap();
        fs::write(paths.geojson_dir.join("vector_2025.geojson"), "{}").unwrap();

        let pr_dir = paths.mapdata_dir.join("ssp126").join("pr");
        fs::create_dir_all(&pr_dir).unwrap();
        fs::write(pr_dir.join("pr_2025_all_subcatchments.csv"), "SC_ID,pr\n").unwrap();

        let series_dir = paths.timeseries_dir.join("ssp585").join("et");
        fs::create_dir_all(&series_dir).unwrap();
        fs::write(series_dir.join("et_001.csv"), "date,et\n").unwrap();
        fs::write(series_dir.join("et_002.csv"), "date,et\n").unwrap();
        fs::write(series_dir.join("notes.txt"), "ignored").unwrap();

        let report = DataReport::build(&paths).unwrap();

        assert!(report.subcatchments_present);
        assert_eq!(report.missing_count(), 3 + 23);
        assert!(
            report
                .mapdata
                .iter()
                .any(|s| s.present && s.year == "2025" && s.variable.as_deref() == Some("pr"))
        );
        assert_eq!(
            report.timeseries,
            vec![SeriesCount {
                scenario: "ssp585".to_string(),
                variable: "et".to_string(),
                files: 2,
            }]
        );
    }
}
