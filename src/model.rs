use chrono::NaiveDateTime;
use serde::Serialize;

/// Number of positional columns in a repeater sheet row.
pub const RAW_COLUMNS: usize = 16;

pub const COL_OPERATOR: usize = 0;
pub const COL_RUT: usize = 1;
pub const COL_BAND: usize = 2;
pub const COL_IDENTIFIER: usize = 3;
pub const COL_TX: usize = 4;
pub const COL_RX: usize = 5;
pub const COL_TONE: usize = 6;
pub const COL_POWER: usize = 7;
pub const COL_GAIN: usize = 8;
pub const COL_REGION: usize = 9;
pub const COL_COMUNA: usize = 10;
pub const COL_AWARDED: usize = 11;
pub const COL_EXPIRES: usize = 12;
pub const COL_LATITUDE: usize = 13;
pub const COL_LONGITUDE: usize = 14;
pub const COL_LOCATION: usize = 15;

/// One untyped spreadsheet cell, already decoded from the workbook.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text view of the cell; numbers render without a trailing `.0`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Numeric view; text is accepted with either `.` or `,` as decimal mark.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// A data row of the source sheet, header excluded.
#[derive(Clone, Debug)]
pub struct RawRow {
    /// 1-based row number in the worksheet, for error reporting.
    pub line: usize,
    cells: [Cell; RAW_COLUMNS],
}

impl RawRow {
    /// Builds a row from decoded cells, padding short rows with `Cell::Empty`.
    /// Cells past the last known column are dropped.
    pub fn new(line: usize, cells: Vec<Cell>) -> Self {
        let mut it = cells.into_iter();
        let cells = std::array::from_fn(|_| it.next().unwrap_or_default());
        RawRow { line, cells }
    }

    pub fn cell(&self, col: usize) -> &Cell {
        &self.cells[col]
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

// Registry fields (rut, gain, dates, ...) are carried through but not exported.
#[allow(dead_code)]
#[derive(Clone, Debug, PartialEq)]
pub struct Repeater {
    pub operator: String,
    pub rut: String,
    /// Band as declared by the source; not used for classification.
    pub band: String,
    pub identifier: String,
    pub tx: f64,
    pub rx: f64,
    pub tone: Option<f64>,
    pub power: String,
    pub gain: String,
    /// Two-letter region code, or `AA` when unknown.
    pub region: String,
    pub comuna: String,
    pub awarded: Cell,
    pub expires: Cell,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
}

/// One memory channel, in output column order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChannelRow {
    pub location: usize,
    pub name: String,
    pub frequency: f64,
    pub duplex: &'static str,
    pub offset: f64,
    pub tone: &'static str,
    pub r_tone_freq: f64,
    pub c_tone_freq: f64,
    pub dtcs_code: &'static str,
    pub dtcs_polarity: &'static str,
    pub rx_dtcs_code: &'static str,
    pub cross_mode: &'static str,
    pub mode: &'static str,
    pub t_step: &'static str,
    pub skip: &'static str,
    pub power: &'static str,
    pub comment: String,
    pub urcall: &'static str,
    pub rpt1call: &'static str,
    pub rpt2call: &'static str,
    pub dvcode: &'static str,
}
