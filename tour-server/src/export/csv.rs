//! CSV import and export of places.
//!
//! Columns are matched by header name, so their order in the file does not
//! matter. Legacy files with Spanish headers are accepted on import.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{Category, DomainError, Entity, EntityId};
use crate::index::IndexError;

use super::error::{ExportError, ImportError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column names, in export order.
pub const HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Category",
    "Latitude",
    "Longitude",
    "Price",
    "Rating",
    "EstimatedTime",
];

/// Dialect options shared by import and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,

    /// Write a UTF-8 byte order mark before the header (for spreadsheet
    /// tools). A mark is always tolerated on import.
    pub bom: bool,
}

impl CsvOptions {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            bom: false,
        }
    }

    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self::new(b',')
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows inserted into the index.
    pub inserted: usize,

    /// Rows skipped because their id was already registered.
    pub duplicates: Vec<EntityId>,
}

/// One CSV row.
#[derive(Debug, Serialize, Deserialize)]
struct PlaceRow {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "Name", alias = "Nombre")]
    name: String,
    #[serde(rename = "Category", alias = "Tipo")]
    category: String,
    #[serde(rename = "Latitude", alias = "Latitud")]
    latitude: f64,
    #[serde(rename = "Longitude", alias = "Longitud")]
    longitude: f64,
    #[serde(rename = "Price", alias = "Precio")]
    price: f64,
    #[serde(rename = "Rating", alias = "Calificación")]
    rating: f64,
    #[serde(rename = "EstimatedTime", alias = "Tiempo Estimado")]
    estimated_time: Option<f64>,
}

impl PlaceRow {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id().0,
            name: entity.name().to_string(),
            category: entity.category().to_string(),
            latitude: entity.location().lat(),
            longitude: entity.location().lon(),
            price: entity.price(),
            rating: entity.rating(),
            estimated_time: entity.visit_hours(),
        }
    }

    fn into_entity(self) -> Result<Entity, DomainError> {
        let category = Category::parse(&self.category)?;
        Entity::new(
            EntityId(self.id),
            self.name,
            category,
            self.latitude,
            self.longitude,
            self.price,
            self.rating,
            self.estimated_time,
        )
    }
}

/// Read places from `reader`, handing each to `insert`.
///
/// The first malformed or invalid row aborts the import, as does any index
/// error other than a duplicate key; rows before it have already been
/// inserted. Duplicate ids are reported, not fatal.
pub fn import_places<R: Read>(
    reader: R,
    options: &CsvOptions,
    mut insert: impl FnMut(Entity) -> Result<(), IndexError>,
) -> Result<ImportReport, ImportError> {
    let mut reader = BufReader::new(reader);
    skip_bom(&mut reader).map_err(|e| ImportError::Csv {
        line: 1,
        source: e.into(),
    })?;

    let mut csv = ::csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let headers = csv
        .headers()
        .map_err(|source| ImportError::Csv { line: 1, source })?
        .clone();
    debug!(?headers, "CSV headers");

    let mut report = ImportReport::default();
    let mut record = ::csv::StringRecord::new();
    loop {
        match csv.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => {
                let line = source.position().map_or(0, |p| p.line());
                return Err(ImportError::Csv { line, source });
            }
        }
        let line = record.position().map_or(0, |p| p.line());

        let row: PlaceRow = record
            .deserialize(Some(&headers))
            .map_err(|source| ImportError::Csv { line, source })?;
        let entity = row
            .into_entity()
            .map_err(|source| ImportError::InvalidRow { line, source })?;

        match insert(entity) {
            Ok(()) => report.inserted += 1,
            Err(IndexError::DuplicateKey(id)) => {
                warn!(%id, line, "duplicate place in CSV, skipped");
                report.duplicates.push(id);
            }
            Err(source) => return Err(ImportError::Index { line, source }),
        }
    }

    info!(
        inserted = report.inserted,
        duplicates = report.duplicates.len(),
        "CSV import complete"
    );
    Ok(report)
}

/// Import places from a file on disk.
pub fn import_file(
    path: impl AsRef<Path>,
    options: &CsvOptions,
    insert: impl FnMut(Entity) -> Result<(), IndexError>,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import_places(file, options, insert)
}

/// Write places, one row each, in the order given.
///
/// Lodging rows leave the estimated time empty.
pub fn export_places<'a, W: Write>(
    mut writer: W,
    places: impl IntoIterator<Item = &'a Entity>,
    options: &CsvOptions,
) -> Result<usize, ExportError> {
    if options.bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv = ::csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let mut rows = 0;
    for entity in places {
        csv.serialize(PlaceRow::from_entity(entity))?;
        rows += 1;
    }
    // An empty export still gets a header row.
    if rows == 0 {
        csv.write_record(HEADERS)?;
    }
    csv.flush()?;

    debug!(rows, "CSV export complete");
    Ok(rows)
}

/// Export places to a file on disk, replacing it.
pub fn export_file<'a>(
    path: impl AsRef<Path>,
    places: impl IntoIterator<Item = &'a Entity>,
    options: &CsvOptions,
) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    export_places(file, places, options)
}

fn skip_bom<R: Read>(reader: &mut BufReader<R>) -> std::io::Result<()> {
    if reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(())
}
