use crate::errors::AppError;
use crate::events::{EventSink, PipelineEvent};
use crate::model::{Cell, RawRow, RAW_COLUMNS};
use calamine::{Data, Reader, Xlsx};
use log::{debug, trace};
use std::io::Cursor;
use std::path::PathBuf;

/// Published repeater listing used when no input is given.
pub const DEFAULT_URL: &str =
    "https://www.subtel.gob.cl/wp-content/uploads/2025/05/Informes_RA_13_05_2025_repetidoras.xlsx";

#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// A local file wins over a URL; with neither, the published listing is used.
    pub fn resolve(input_file: Option<PathBuf>, fetch_url: Option<String>) -> Self {
        match (input_file, fetch_url) {
            (Some(p), _) => Source::File(p),
            (None, Some(u)) => Source::Url(u),
            (None, None) => Source::Url(DEFAULT_URL.to_string()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Source::File(p) => p.display().to_string(),
            Source::Url(u) => u.clone(),
        }
    }

    /// Reads the raw workbook bytes.
    pub fn fetch(&self) -> Result<Vec<u8>, AppError> {
        match self {
            Source::File(p) => std::fs::read(p)
                .map_err(|e| AppError::Fetch(format!("read {}: {}", p.display(), e))),
            Source::Url(u) => {
                let client = reqwest::blocking::Client::builder()
                    .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|e| AppError::Fetch(format!("http client: {}", e)))?;
                let resp = client
                    .get(u)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| AppError::Fetch(format!("GET {}: {}", u, e)))?;
                let bytes = resp
                    .bytes()
                    .map_err(|e| AppError::Fetch(format!("reading body of {}: {}", u, e)))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

fn cell_from(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            debug!("cell error {:?} read as empty", e);
            Cell::Empty
        }
    }
}

/// Decodes the first worksheet of an xlsx file, skipping its header row.
pub fn decode_rows(bytes: &[u8]) -> Result<Vec<RawRow>, AppError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::Workbook(format!("open xlsx: {}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Workbook("workbook has no worksheets".into()))?
        .map_err(|e| AppError::Workbook(format!("read first worksheet: {}", e)))?;

    let first_line = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
    let mut rows = Vec::new();
    for (i, cells) in range.rows().enumerate().skip(1) {
        let line = first_line + i;
        if cells.len() > RAW_COLUMNS {
            trace!("row {}: ignoring {} extra cells", line, cells.len() - RAW_COLUMNS);
        }
        let row = RawRow::new(line, cells.iter().map(cell_from).collect());
        if row.is_blank() {
            trace!("row {}: blank, skipped", line);
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Fetches and decodes the source, reporting progress to `sink`.
pub fn load_rows(source: &Source, sink: &mut dyn EventSink) -> Result<Vec<RawRow>, AppError> {
    sink.emit(PipelineEvent::Fetching { source: source.describe() });
    let bytes = source.fetch()?;
    sink.emit(PipelineEvent::Fetched { bytes: bytes.len() });
    let rows = decode_rows(&bytes)?;
    sink.emit(PipelineEvent::RowsDecoded { rows: rows.len() });
    Ok(rows)
}
