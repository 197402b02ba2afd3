//! Catalog loading for catalog insights.
//!
//! Reads a headered CSV export of the title catalog and converts each row
//! into a [`RawRecord`] for the normalizer. Anything that can hand over a
//! full set of rows implements [`RecordSource`].

use std::io::Read;
use std::path::{Path, PathBuf};

use insights_core::error::{InsightsError, Result};
use insights_core::models::{RawRecord, REQUIRED_COLUMNS};
use tracing::{debug, info};

/// Cell values read as missing, matching the usual spreadsheet/CSV
/// conventions for "no value".
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ── RecordSource ──────────────────────────────────────────────────────────────

/// A full snapshot of catalog rows, read in one go.
pub trait RecordSource {
    /// Read every row of the source.
    fn read_records(&self) -> Result<Vec<RawRecord>>;

    /// Short human-readable description used in logs and metadata.
    fn describe(&self) -> String;
}

impl RecordSource for Vec<RawRecord> {
    fn read_records(&self) -> Result<Vec<RawRecord>> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.len())
    }
}

/// A catalog CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvSource {
    fn read_records(&self) -> Result<Vec<RawRecord>> {
        load_catalog_csv(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Open `path` and read every catalog row from it.
pub fn load_catalog_csv(path: &Path) -> Result<Vec<RawRecord>> {
    info!("Loading catalog CSV: {}", path.display());
    let file = std::fs::File::open(path).map_err(|source| InsightsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_catalog(file)
}

/// Read catalog rows from any CSV byte stream with a header line.
///
/// The header must name every column in [`REQUIRED_COLUMNS`]; other columns
/// are carried in [`RawRecord::extra`]. Short rows are padded with missing
/// values.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let layout = ColumnLayout::from_headers(rdr.headers()?)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        records.push(layout.to_raw_record(&row));
    }

    debug!(
        "Read {} catalog rows ({} extra columns)",
        records.len(),
        layout.extra.len()
    );
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Header positions of the columns the pipeline reads.
struct ColumnLayout {
    content_type: usize,
    date_added: usize,
    country: usize,
    rating: usize,
    duration: usize,
    listed_in: usize,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|&name| position(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(InsightsError::MissingColumns(missing));
        }

        let required = |name: &str| position(name).unwrap_or_default();
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.trim()))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        Ok(Self {
            content_type: required("type"),
            date_added: required("date_added"),
            country: required("country"),
            rating: required("rating"),
            duration: required("duration"),
            listed_in: required("listed_in"),
            extra,
        })
    }

    fn to_raw_record(&self, row: &csv::StringRecord) -> RawRecord {
        let cell = |i: usize| row.get(i).filter(|v| !NA_TOKENS.contains(v)).map(str::to_string);

        RawRecord {
            content_type: cell(self.content_type),
            date_added: cell(self.date_added),
            country: cell(self.country),
            rating: cell(self.rating),
            duration: cell(self.duration),
            listed_in: cell(self.listed_in),
            extra: self
                .extra
                .iter()
                .map(|(i, name)| (name.clone(), cell(*i).unwrap_or_default()))
                .collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str =
        "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── read_catalog ──────────────────────────────────────────────────────────

    #[test]
    fn test_read_catalog_maps_core_columns() {
        let data = format!(
            "{}\ns1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries,A film.\n",
            HEADER
        );
        let records = read_catalog(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.content_type.as_deref(), Some("Movie"));
        assert_eq!(r.date_added.as_deref(), Some("September 25, 2021"));
        assert_eq!(r.country.as_deref(), Some("United States"));
        assert_eq!(r.rating.as_deref(), Some("PG-13"));
        assert_eq!(r.duration.as_deref(), Some("90 min"));
        assert_eq!(r.listed_in.as_deref(), Some("Documentaries"));
    }

    #[test]
    fn test_read_catalog_keeps_extra_columns_in_order() {
        let data = format!("{}\ns1,Movie,Title,,,US,\"May 1, 2020\",2019,R,100 min,Dramas,Desc\n", HEADER);
        let records = read_catalog(data.as_bytes()).unwrap();

        let names: Vec<&str> = records[0].extra.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["show_id", "title", "director", "cast", "release_year", "description"]
        );
        assert_eq!(records[0].extra[0].1, "s1");
        assert_eq!(records[0].extra[2].1, "");
    }

    #[test]
    fn test_read_catalog_empty_cells_are_missing() {
        let data = format!("{}\ns2,TV Show,Show,,,,,2021,,2 Seasons,\"Dramas, Crime TV Shows\",Desc\n", HEADER);
        let records = read_catalog(data.as_bytes()).unwrap();

        let r = &records[0];
        assert!(r.country.is_none());
        assert!(r.date_added.is_none());
        assert!(r.rating.is_none());
        assert_eq!(r.listed_in.as_deref(), Some("Dramas, Crime TV Shows"));
    }

    #[test]
    fn test_read_catalog_na_tokens_are_missing() {
        let data = "type,date_added,country,rating,duration,listed_in\nMovie,NaN,NA,null,N/A,\n";
        let records = read_catalog(data.as_bytes()).unwrap();

        let r = &records[0];
        assert!(r.date_added.is_none());
        assert!(r.country.is_none());
        assert!(r.rating.is_none());
        assert!(r.duration.is_none());
        assert!(r.listed_in.is_none());
    }

    #[test]
    fn test_read_catalog_short_row_padded() {
        let data = "type,date_added,country,rating,duration,listed_in\nMovie,\"June 1, 2020\"\n";
        let records = read_catalog(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].country.is_none());
        assert!(records[0].listed_in.is_none());
    }

    #[test]
    fn test_read_catalog_missing_required_columns() {
        let data = "type,date_added,country\nMovie,\"June 1, 2020\",US\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();

        match err {
            InsightsError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["rating", "duration", "listed_in"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_catalog_header_only() {
        let records = read_catalog(HEADER.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    // ── load_catalog_csv / CsvSource ──────────────────────────────────────────

    #[test]
    fn test_csv_source_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "titles.csv",
            &[
                "type,date_added,country,rating,duration,listed_in",
                "Movie,\"September 9, 2019\",US,PG,90 min,Comedies",
                "TV Show,\"April 2, 2020\",India,TV-MA,1 Season,Dramas",
            ],
        );

        let source = CsvSource::new(&path);
        let records = source.read_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(source.describe(), path.display().to_string());
    }

    #[test]
    fn test_load_catalog_csv_missing_file() {
        let err = load_catalog_csv(Path::new("/tmp/does-not-exist-catalog-insights.csv")).unwrap_err();
        assert!(matches!(err, InsightsError::FileRead { .. }));
    }

    // ── Vec<RawRecord> source ─────────────────────────────────────────────────

    #[test]
    fn test_in_memory_source_returns_rows() {
        let rows = vec![RawRecord {
            content_type: Some("Movie".to_string()),
            ..Default::default()
        }];
        assert_eq!(rows.read_records().unwrap(), rows);
        assert_eq!(rows.describe(), "1 in-memory records");
    }
}
