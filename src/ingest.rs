//! File loaders that materialize a [`Dataset`].
//!
//! Delimited text (CSV/TSV), JSON (an object or an array of objects), XML
//! (repeated elements under the root) and spreadsheets (first worksheet,
//! first row as header) are supported. Every loader stops after the
//! configured row cap and reports whether rows were dropped. Cells from
//! delimited text and XML stay strings; JSON and spreadsheet cells keep their
//! native number and boolean types.

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use calamine::{DataType, Reader, open_workbook_auto};
use encoding_rs::Encoding;
use itertools::Itertools;
use log::{debug, info, warn};
use roxmltree::{Document, Node};
use thiserror::Error;

use crate::{
    data::{CellValue, Dataset, Record},
    io_utils::{self, SourceFormat},
};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported input format '{0}' (expected csv, tsv, json, xml, xlsx, xls or ods)")]
    UnsupportedFormat(String),
    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),
    #[error("Opening input file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Reading CSV row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to decode text with encoding {0}")]
    Encoding(&'static str),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON input must be an object or an array of objects")]
    NotTabular,
    #[error("Invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Reading spreadsheet {path:?}: {message}")]
    Spreadsheet { path: PathBuf, message: String },
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    /// `None` keeps every row.
    pub row_cap: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: encoding_rs::UTF_8,
            row_cap: Some(crate::config::DEFAULT_ROW_CAP),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    /// File name shown to the user, `stdin` for `-`.
    pub source_label: String,
    pub dataset: Dataset,
    /// Rows beyond the cap were dropped.
    pub truncated: bool,
}

pub fn load_path(path: &Path, options: &LoadOptions) -> Result<LoadedDataset, IngestError> {
    let format = io_utils::detect_format(path)?;
    debug!("Loading {path:?} as {format:?}");
    let (dataset, truncated) = match format {
        SourceFormat::Delimited => {
            let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
            let reader = io_utils::open_input(path)?;
            read_delimited(reader, delimiter, options.encoding, options.row_cap)?
        }
        SourceFormat::Json => read_json_str(&read_text(path)?, options.row_cap)?,
        SourceFormat::Xml => read_xml_str(&read_text(path)?, options.row_cap)?,
        SourceFormat::Spreadsheet => read_spreadsheet(path, options.row_cap)?,
    };
    if truncated {
        info!(
            "Kept the first {} row(s) of {path:?}; remaining rows were dropped",
            dataset.len()
        );
    }
    Ok(LoadedDataset {
        source_label: source_label(path),
        dataset,
        truncated,
    })
}

fn source_label(path: &Path) -> String {
    if io_utils::is_dash(path) {
        return "stdin".to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_text(path: &Path) -> Result<String, IngestError> {
    let mut raw = String::new();
    io_utils::open_input(path)?
        .read_to_string(&mut raw)
        .map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(raw)
}

fn cap_reached(rows: usize, row_cap: Option<usize>) -> bool {
    row_cap.is_some_and(|cap| rows >= cap)
}

/// Reads headered delimited text. Every cell stays a string; fields past the
/// header width are ignored.
pub fn read_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
    row_cap: Option<usize>,
) -> Result<(Dataset, bool), IngestError> {
    let mut reader = io_utils::open_csv_reader(reader, delimiter);
    let header_record = reader
        .byte_headers()
        .map_err(|source| IngestError::Csv { row: 1, source })?
        .clone();
    let headers = io_utils::decode_record(&header_record, encoding)?;

    let mut records = Vec::new();
    let mut truncated = false;
    for (idx, row) in reader.byte_records().enumerate() {
        let row = row.map_err(|source| IngestError::Csv {
            row: idx + 2,
            source,
        })?;
        if cap_reached(records.len(), row_cap) {
            truncated = true;
            break;
        }
        let fields = io_utils::decode_record(&row, encoding)?;
        records.push(
            headers
                .iter()
                .zip(fields)
                .map(|(name, value)| (name.clone(), CellValue::Text(value)))
                .collect::<Record>(),
        );
    }
    Ok((Dataset::new(records), truncated))
}

/// Accepts a single object or an array of objects. Array elements that are
/// not objects are skipped.
pub fn read_json_str(raw: &str, row_cap: Option<usize>) -> Result<(Dataset, bool), IngestError> {
    let parsed: serde_json::Value = serde_json::from_str(raw)?;
    let items = match parsed {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        _ => return Err(IngestError::NotTabular),
    };

    let mut records = Vec::new();
    let mut truncated = false;
    let mut skipped = 0usize;
    for item in items {
        let serde_json::Value::Object(map) = item else {
            skipped += 1;
            continue;
        };
        if cap_reached(records.len(), row_cap) {
            truncated = true;
            break;
        }
        records.push(
            map.into_iter()
                .map(|(key, value)| (key, json_cell(value)))
                .collect::<Record>(),
        );
    }
    if skipped > 0 {
        warn!("Skipped {skipped} JSON element(s) that are not objects");
    }
    Ok((Dataset::new(records), truncated))
}

fn json_cell(value: serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(b),
        serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
        serde_json::Value::String(s) => CellValue::Text(s),
        nested => CellValue::Text(nested.to_string()),
    }
}

/// Picks the row elements of an XML document: the first child name that
/// repeats under the root, or a lone child shaped like a record. Otherwise
/// the root itself is the only row.
///
/// Attributes become `@_name` keys, child elements become keys holding their
/// trimmed text, and a row without child elements keeps its own text under
/// `#text`. When a child name repeats inside one row the last one wins.
pub fn read_xml_str(raw: &str, row_cap: Option<usize>) -> Result<(Dataset, bool), IngestError> {
    let document = Document::parse(raw)?;
    let root = document.root_element();
    let children = root.children().filter(Node::is_element).collect_vec();

    let repeated = children.iter().map(|node| node.tag_name().name()).find(|name| {
        children
            .iter()
            .filter(|node| node.tag_name().name() == *name)
            .count()
            > 1
    });
    let rows = match (repeated, children.as_slice()) {
        (Some(name), _) => children
            .iter()
            .copied()
            .filter(|node| node.tag_name().name() == name)
            .collect_vec(),
        (None, [only]) if is_record_like(*only) => vec![*only],
        _ => vec![root],
    };
    debug!("XML input has {} row element(s)", rows.len());

    let mut records = Vec::new();
    let mut truncated = false;
    for row in rows {
        let record = xml_record(row);
        if record.is_empty() {
            continue;
        }
        if cap_reached(records.len(), row_cap) {
            truncated = true;
            break;
        }
        records.push(record);
    }
    Ok((Dataset::new(records), truncated))
}

fn is_record_like(node: Node<'_, '_>) -> bool {
    node.attributes().next().is_some() || node.children().any(|child| child.is_element())
}

fn xml_record(node: Node<'_, '_>) -> Record {
    let mut record = Record::new();
    for attribute in node.attributes() {
        record.insert(format!("@_{}", attribute.name()), attribute.value());
    }
    let mut has_elements = false;
    for child in node.children().filter(Node::is_element) {
        has_elements = true;
        record.insert(child.tag_name().name(), xml_text(child));
    }
    if !has_elements {
        let text = xml_text(node);
        if !text.is_empty() {
            record.insert("#text", text);
        }
    }
    record
}

fn xml_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|text| text.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Reads the first worksheet. Empty cells are left out of their row, and
/// blank header cells get positional names.
pub fn read_spreadsheet(
    path: &Path,
    row_cap: Option<usize>,
) -> Result<(Dataset, bool), IngestError> {
    let spreadsheet_error = |message: String| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|err| spreadsheet_error(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_error("workbook has no worksheets".to_string()))?
        .map_err(|err| spreadsheet_error(err.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok((Dataset::default(), false));
    };
    let headers = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            DataType::Empty => format!("field_{}", idx + 1),
            other => other.to_string(),
        })
        .collect_vec();

    let mut records = Vec::new();
    let mut truncated = false;
    for row in rows {
        let record = headers
            .iter()
            .zip(row)
            .filter_map(|(name, cell)| spreadsheet_cell(cell).map(|value| (name.clone(), value)))
            .collect::<Record>();
        if record.is_empty() {
            continue;
        }
        if cap_reached(records.len(), row_cap) {
            truncated = true;
            break;
        }
        records.push(record);
    }
    Ok((Dataset::new(records), truncated))
}

fn spreadsheet_cell(cell: &DataType) -> Option<CellValue> {
    match cell {
        DataType::Empty => None,
        DataType::Int(i) => Some(CellValue::Number(*i as f64)),
        DataType::Float(f) => Some(CellValue::Number(*f)),
        DataType::Bool(b) => Some(CellValue::Bool(*b)),
        DataType::String(s) => Some(CellValue::Text(s.clone())),
        other => Some(CellValue::Text(other.to_string())),
    }
}
