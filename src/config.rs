use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

/// Default dataset file looked up in the working directory at start-up.
pub const DEFAULT_DATA_FILE: &str = "tainan_smart_enforcement.csv";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "enforcement-dashboard")]
#[command(about = "Explore traffic-enforcement device records by district and jurisdiction")]
pub struct Cli {
    /// CSV file with device records [default: tainan_smart_enforcement.csv]
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// JSON file mapping the recognised columns to source header names
    #[arg(short, long, value_name = "FILE")]
    pub columns: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the summary and frequency tables for one selection as JSON
    Report {
        /// Administrative district to select
        #[arg(long)]
        district: String,

        /// Police jurisdiction to select
        #[arg(long)]
        jurisdiction: String,

        /// Keyword matched against the installation location (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Source header names of the columns the dashboard understands.
///
/// Any key left out of a mapping file keeps its default, so
/// `{"district": "District"}` is a valid file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub district: String,
    pub jurisdiction: String,
    pub speed_limit: String,
    pub camera_direction: String,
    pub installation_location: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            district: "行政區".to_string(),
            jurisdiction: "轄區分局".to_string(),
            speed_limit: "速限".to_string(),
            camera_direction: "拍攝行向".to_string(),
            installation_location: "設置位置".to_string(),
        }
    }
}

impl Cli {
    /// Dataset path for the headless report: the named file or the default.
    pub fn data_path(&self) -> &Path {
        self.data
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DATA_FILE))
    }
}

impl ColumnNames {
    /// Read a JSON mapping file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading column mapping {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("parsing column mapping {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Mapping from CLI arguments, falling back to defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        match &cli.columns {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_mapping_keeps_defaults() {
        let names = ColumnNames::from_json_str(r#"{"district": "District"}"#).unwrap();
        assert_eq!(names.district, "District");
        assert_eq!(names.jurisdiction, ColumnNames::default().jurisdiction);
    }

    #[test]
    fn report_subcommand_collects_keywords() {
        let cli = Cli::try_parse_from([
            "enforcement-dashboard",
            "--data",
            "devices.csv",
            "report",
            "--district",
            "North",
            "--jurisdiction",
            "East Precinct",
            "-k",
            "speeding",
            "--keyword",
            "illegal parking",
        ])
        .unwrap();

        assert_eq!(cli.data, Some(PathBuf::from("devices.csv")));
        assert_eq!(cli.data_path(), Path::new("devices.csv"));
        match cli.command {
            Some(Command::Report { district, jurisdiction, keywords }) => {
                assert_eq!(district, "North");
                assert_eq!(jurisdiction, "East Precinct");
                assert_eq!(keywords, vec!["speeding", "illegal parking"]);
            }
            None => panic!("expected report subcommand"),
        }
    }

    #[test]
    fn gui_is_default_command() {
        let cli = Cli::try_parse_from(["enforcement-dashboard"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.data.is_none());
        assert_eq!(cli.data_path(), Path::new(DEFAULT_DATA_FILE));
    }
}
