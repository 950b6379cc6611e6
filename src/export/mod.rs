//! JSON, Excel and CSV exporters
//!
//! All formats are written from the same ordered list of sheets, one per
//! media type and category, labelled in the configured language.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use csv::Writer;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::labels;
use crate::models::{Language, MediaCategory, MediaLibrary, MediaRecord, MediaSelection, MediaType, RecordField};

/// Byte order mark so spreadsheet tools detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Categories in export order
const SHEET_ORDER: [MediaCategory; 3] = [
    MediaCategory::Watched,
    MediaCategory::Favorites,
    MediaCategory::ToWatch,
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Requested output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportFormats {
    pub json: bool,
    pub xlsx: bool,
    pub csv: bool,
}

impl ExportFormats {
    pub const ALL: ExportFormats = ExportFormats {
        json: true,
        xlsx: true,
        csv: true,
    };

    /// Parse a comma-separated list of `json`, `xlsx`, `csv` and `all`
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut formats = ExportFormats::default();

        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "json" => formats.json = true,
                "xlsx" => formats.xlsx = true,
                "csv" => formats.csv = true,
                "all" => formats = ExportFormats::ALL,
                other => {
                    return Err(format!(
                        "Unsupported format '{}', expected json, xlsx, csv or all",
                        other
                    ))
                }
            }
        }

        if formats.is_empty() {
            return Err("At least one export format is required".to_string());
        }
        Ok(formats)
    }

    pub fn is_empty(&self) -> bool {
        !self.json && !self.xlsx && !self.csv
    }
}

/// One labelled list of records
#[derive(Debug, Clone, Copy)]
pub struct Sheet<'a> {
    pub label: &'static str,
    pub records: &'a [MediaRecord],
}

/// Sheets for every selected media type, movies first
pub fn sheets(library: &MediaLibrary, selection: MediaSelection, language: Language) -> Vec<Sheet<'_>> {
    MediaType::ALL
        .into_iter()
        .filter(|media_type| selection.includes(*media_type))
        .flat_map(move |media_type| {
            SHEET_ORDER.into_iter().map(move |category| Sheet {
                label: labels::sheet(language, media_type, category),
                records: library.get(media_type).get(category),
            })
        })
        .collect()
}

/// Base name shared by every output of a run, e.g. `filmow_someone_20240131_235959`
pub fn base_filename(username: &str, timestamp: DateTime<Local>) -> String {
    format!("filmow_{}_{}", username, timestamp.format("%Y%m%d_%H%M%S"))
}

pub fn json_path(output_dir: &Path, base: &str) -> PathBuf {
    output_dir.join(format!("{}.json", base))
}

pub fn xlsx_path(output_dir: &Path, base: &str) -> PathBuf {
    output_dir.join(format!("{}.xlsx", base))
}

pub fn csv_dir(output_dir: &Path, base: &str) -> PathBuf {
    output_dir.join(format!("{}_csv", base))
}

/// File name of a sheet inside the CSV directory
pub fn csv_file_name(label: &str) -> String {
    format!("{}.csv", label.replace(" - ", "_").replace(' ', "_").to_lowercase())
}

/// A record keyed by field names in the export language
struct LocalizedRecord<'a> {
    record: &'a MediaRecord,
    language: Language,
}

impl Serialize for LocalizedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.record.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (field, value) in &fields {
            map.serialize_entry(field.label(self.language), value)?;
        }
        map.end()
    }
}

/// Sheets as a JSON object, keys in sheet order
struct SheetDocument<'a> {
    sheets: &'a [Sheet<'a>],
    language: Language,
}

impl Serialize for SheetDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sheets.len()))?;
        for sheet in self.sheets {
            let records: Vec<LocalizedRecord<'_>> = sheet
                .records
                .iter()
                .map(|record| LocalizedRecord {
                    record,
                    language: self.language,
                })
                .collect();
            map.serialize_entry(sheet.label, &records)?;
        }
        map.end()
    }
}

/// Write every sheet, empty ones included, to a pretty printed JSON file
pub fn export_json(path: &Path, sheets: &[Sheet<'_>], language: Language) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    SheetDocument { sheets, language }.serialize(&mut serializer)?;
    writer.flush()?;

    info!("JSON data exported to {}", path.display());
    Ok(())
}

/// Write one CSV file per non-empty sheet into `dir`
///
/// Returns the paths of the files written.
pub fn export_csv(dir: &Path, sheets: &[Sheet<'_>], language: Language) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for sheet in sheets.iter().filter(|sheet| !sheet.records.is_empty()) {
        let path = dir.join(csv_file_name(sheet.label));
        write_csv_sheet(&path, sheet.records, language)?;
        debug!("CSV data exported to {}", path.display());
        written.push(path);
    }

    info!("All CSV files exported to {}", dir.display());
    Ok(written)
}

/// Records of one sheet laid out as columns and sparse rows
///
/// Columns are the fields present in at least one record, in canonical
/// order.
struct SheetTable {
    columns: Vec<RecordField>,
    rows: Vec<Vec<(RecordField, Value)>>,
}

impl SheetTable {
    fn new(records: &[MediaRecord]) -> Self {
        let rows: Vec<Vec<(RecordField, Value)>> = records.iter().map(MediaRecord::fields).collect();
        let columns = RecordField::ALL
            .into_iter()
            .filter(|column| rows.iter().any(|row| row.iter().any(|(field, _)| field == column)))
            .collect();
        Self { columns, rows }
    }

    /// Cells of one row in column order, `None` where the field is absent
    fn cells<'a>(&'a self, row: &'a [(RecordField, Value)]) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.columns.iter().map(move |column| {
            row.iter()
                .find(|(field, _)| field == column)
                .map(|(_, value)| value)
        })
    }
}

fn write_csv_sheet(path: &Path, records: &[MediaRecord], language: Language) -> Result<(), ExportError> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    let mut wtr = Writer::from_writer(file);

    let table = SheetTable::new(records);
    wtr.write_record(table.columns.iter().map(|column| column.label(language)))?;

    for row in &table.rows {
        wtr.write_record(table.cells(row).map(|cell| cell.map(csv_cell).unwrap_or_default()))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write every non-empty sheet as a worksheet of one Excel workbook
pub fn export_xlsx(path: &Path, sheets: &[Sheet<'_>], language: Language) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();

    for sheet in sheets.iter().filter(|sheet| !sheet.records.is_empty()) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.label)?;

        let table = SheetTable::new(sheet.records);
        for (col, column) in (0u16..).zip(&table.columns) {
            worksheet.write_string(0, col, column.label(language))?;
        }

        for (row_idx, row) in (1u32..).zip(&table.rows) {
            for (col, cell) in (0u16..).zip(table.cells(row)) {
                match cell {
                    Some(Value::String(text)) => {
                        worksheet.write_string(row_idx, col, text.as_str())?;
                    }
                    Some(Value::Number(number)) => {
                        if let Some(number) = number.as_f64() {
                            worksheet.write_number(row_idx, col, number)?;
                        }
                    }
                    Some(Value::Bool(flag)) => {
                        worksheet.write_boolean(row_idx, col, *flag)?;
                    }
                    _ => {}
                }
            }
        }
    }

    workbook.save(path)?;
    info!("Excel data exported to {}", path.display());
    Ok(())
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
