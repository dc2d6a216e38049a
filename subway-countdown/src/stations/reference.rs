//! The static station reference dataset (`Stations.csv`).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::error::StationError;

/// One physical stop from the published station list.
///
/// Only the columns the resolver reads are kept; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StationRow {
    #[serde(rename = "GTFS Stop ID")]
    pub gtfs_stop_id: String,
    /// Operating division: IRT, IND, BMT or SIR.
    #[serde(rename = "Division", default)]
    pub division: String,
    #[serde(rename = "Stop Name")]
    pub stop_name: String,
    /// Whitespace-delimited daytime line codes, e.g. "A C".
    #[serde(rename = "Daytime Routes", default)]
    pub daytime_routes: String,
    #[serde(rename = "North Direction Label", default)]
    pub north_label: Option<String>,
    #[serde(rename = "South Direction Label", default)]
    pub south_label: Option<String>,
}

/// Parsed station list.
#[derive(Debug, Clone, Default)]
pub struct StationReference {
    rows: Vec<StationRow>,
}

impl StationReference {
    pub fn new(rows: Vec<StationRow>) -> Self {
        Self { rows }
    }

    /// Parse a station list in the published CSV layout.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, StationError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let rows = csv
            .deserialize::<StationRow>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }

    /// Parse a station list stored on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| StationError::Cache {
            message: format!("failed to open {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_csv(file)
    }

    /// The row for a GTFS stop ID, if any.
    pub fn find(&self, gtfs_stop_id: &str) -> Option<&StationRow> {
        self.rows.iter().find(|r| r.gtfs_stop_id == gtfs_stop_id)
    }

    pub fn rows(&self) -> &[StationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_CSV: &str = "\
Station ID,Complex ID,GTFS Stop ID,Division,Line,Stop Name,Borough,Daytime Routes,Structure,GTFS Latitude,GTFS Longitude,North Direction Label,South Direction Label
1,1,R01,BMT,Astoria,Astoria-Ditmars Blvd,Q,N W,Elevated,40.775036,-73.912034,,Manhattan
167,167,A27,IND,8th Av - Fulton St,Rockaway Av,Bk,A C,Subway,40.67834,-73.911946,Manhattan,Euclid - Lefferts - Rockaways
170,170,A31,IND,8th Av - Fulton St,14 St,M,A C E,Subway,40.740893,-74.00169,Uptown - Queens,Downtown & Brooklyn
611,611,D13,IND,Concourse,145 St,M,A B C D,Subway,40.824783,-73.944216,Uptown & The Bronx,Downtown & Brooklyn
318,318,902,IRT,42nd St Shuttle,Times Sq,M,S,Subway,40.755983,-73.986229,,
501,501,S31,SIR,Staten Island,St George,SI,SIR,Open Cut,40.643748,-74.073643,Tottenville,
999,999,X99,BMT,Closed,Closed Station,M,,Subway,40.0,-73.0,,
998,998,X98,BMT,Odd,Odd Station,M,QQ,Subway,40.0,-73.0,,
";
