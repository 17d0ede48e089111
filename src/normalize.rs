use crate::catalog::{Catalog, UNKNOWN_REGION};
use crate::errors::AppError;
use crate::events::{EventSink, PipelineEvent};
use crate::model::*;

/// Collapses the separator variants used in station names into `-` and drops spaces.
/// Plain substring replacement, applied in a fixed order.
pub fn clean_identifier(identifier: &str) -> String {
    identifier
        .replace(" RPR-", "-")
        .replace("/RPT-", "-")
        .replace(" RPT-", "-")
        .replace(' ', "")
}

// The minutes glyph is U+2019, not the ASCII apostrophe.
fn parse_component(token: &str, whole: &str) -> Result<f64, AppError> {
    let cleaned = token
        .trim_end_matches('°')
        .trim_end_matches('’')
        .trim_end_matches('"')
        .trim()
        .replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(AppError::MalformedCoordinate {
            value: whole.to_string(),
            reason: format!("'{}' is not a finite number", token),
        }),
        Err(e) => Err(AppError::MalformedCoordinate {
            value: whole.to_string(),
            reason: format!("'{}': {}", token, e),
        }),
    }
}

/// Converts `D° M’ S"` into decimal degrees.
///
/// The sheet stores unsigned magnitudes for a southern/western position, so the
/// result is always negative whatever sign the text carries.
pub fn parse_coords(coords: &str) -> Result<f64, AppError> {
    let parts: Vec<&str> = coords.split(' ').collect();
    if parts.len() != 3 {
        return Err(AppError::MalformedCoordinate {
            value: coords.to_string(),
            reason: format!("expected 3 space separated parts, got {}", parts.len()),
        });
    }
    let degrees = parse_component(parts[0], coords)?;
    let minutes = parse_component(parts[1], coords)?;
    let seconds = parse_component(parts[2], coords)?;

    let dd = degrees + minutes / 60.0 + seconds / 3600.0;
    Ok(-dd.abs())
}

fn text_or_empty(row: &RawRow, col: usize) -> String {
    row.cell(col).as_text().unwrap_or_default()
}

fn required_mhz(row: &RawRow, col: usize, column: &'static str) -> Result<f64, AppError> {
    row.cell(col).as_number().ok_or_else(|| AppError::MalformedCell {
        row: row.line,
        column,
        reason: format!("expected a frequency, got {:?}", row.cell(col)),
    })
}

fn coordinate(row: &RawRow, col: usize, column: &'static str) -> Result<f64, AppError> {
    match row.cell(col) {
        Cell::Text(s) => parse_coords(s),
        other => Err(AppError::MalformedCell {
            row: row.line,
            column,
            reason: format!("expected a D° M’ S\" string, got {:?}", other),
        }),
    }
}

/// Empty, blank or `0` means no tone; anything else must be a number.
fn tone(row: &RawRow) -> Result<Option<f64>, AppError> {
    let cell = row.cell(COL_TONE);
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.as_number() {
        Some(t) if t == 0.0 => Ok(None),
        Some(t) => Ok(Some(t)),
        None => Err(AppError::MalformedCell {
            row: row.line,
            column: "tone",
            reason: format!("expected a tone frequency, got {:?}", cell),
        }),
    }
}

/// Builds one `Repeater` from one sheet row.
///
/// An unknown or missing region is not an error: the record gets the `AA` code
/// and a `RegionUnmapped` event is emitted.
pub fn normalize(
    row: &RawRow,
    catalog: &Catalog,
    sink: &mut dyn EventSink,
) -> Result<Repeater, AppError> {
    let identifier = clean_identifier(&text_or_empty(row, COL_IDENTIFIER));
    if identifier.is_empty() {
        return Err(AppError::MalformedCell {
            row: row.line,
            column: "identifier",
            reason: "missing station identifier".into(),
        });
    }

    let region_name = match row.cell(COL_REGION) {
        Cell::Text(s) => Some(s.as_str()),
        _ => None,
    };
    let region = catalog.map_region(region_name);
    if region == UNKNOWN_REGION {
        sink.emit(PipelineEvent::RegionUnmapped {
            identifier: identifier.clone(),
            region: region_name.map(str::to_string),
        });
    }

    Ok(Repeater {
        operator: text_or_empty(row, COL_OPERATOR),
        rut: text_or_empty(row, COL_RUT),
        band: text_or_empty(row, COL_BAND),
        tx: required_mhz(row, COL_TX, "tx")?,
        rx: required_mhz(row, COL_RX, "rx")?,
        tone: tone(row)?,
        power: text_or_empty(row, COL_POWER),
        gain: text_or_empty(row, COL_GAIN),
        region: region.to_string(),
        comuna: text_or_empty(row, COL_COMUNA),
        awarded: row.cell(COL_AWARDED).clone(),
        expires: row.cell(COL_EXPIRES).clone(),
        latitude: coordinate(row, COL_LATITUDE, "latitude")?,
        longitude: coordinate(row, COL_LONGITUDE, "longitude")?,
        location: text_or_empty(row, COL_LOCATION),
        identifier,
    })
}

/// Normalizes every row, stopping at the first malformed one.
pub fn normalize_all(
    rows: &[RawRow],
    catalog: &Catalog,
    sink: &mut dyn EventSink,
) -> Result<Vec<Repeater>, AppError> {
    let repeaters = rows
        .iter()
        .map(|r| normalize(r, catalog, sink))
        .collect::<Result<Vec<_>, _>>()?;
    sink.emit(PipelineEvent::RepeatersFound { count: repeaters.len() });
    Ok(repeaters)
}
