use crate::errors::AppError;
use crate::model::ChannelRow;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const HEADER: [&str; 21] = [
    "Location", "Name", "Frequency", "Duplex", "Offset", "Tone", "rToneFreq", "cToneFreq",
    "DtcsCode", "DtcsPolarity", "RxDtcsCode", "CrossMode", "Mode", "TStep", "Skip", "Power",
    "Comment", "URCALL", "RPT1CALL", "RPT2CALL", "DVCODE",
];

/// Fields are written unquoted; a delimiter or line break in one would shift
/// the row's columns.
fn check_fields(r: &ChannelRow) -> Result<(), AppError> {
    let text_fields = [
        ("Name", r.name.as_str()),
        ("Duplex", r.duplex),
        ("Tone", r.tone),
        ("DtcsCode", r.dtcs_code),
        ("DtcsPolarity", r.dtcs_polarity),
        ("RxDtcsCode", r.rx_dtcs_code),
        ("CrossMode", r.cross_mode),
        ("Mode", r.mode),
        ("TStep", r.t_step),
        ("Skip", r.skip),
        ("Power", r.power),
        ("Comment", r.comment.as_str()),
        ("URCALL", r.urcall),
        ("RPT1CALL", r.rpt1call),
        ("RPT2CALL", r.rpt2call),
        ("DVCODE", r.dvcode),
    ];
    for (column, value) in text_fields {
        if value.contains([',', '\n', '\r']) {
            return Err(AppError::Csv(format!(
                "channel {} ({}): {} {:?} contains a comma or line break",
                r.location, r.name, column, value
            )));
        }
    }
    Ok(())
}

/// Renders the channel table. Fails if any value would need quoting.
pub fn render_csv(rows: &[ChannelRow]) -> Result<Vec<u8>, AppError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // Header (written even when there are no rows)
    wtr.write_record(HEADER)
        .map_err(|e| AppError::Csv(format!("csv write header: {}", e)))?;

    for r in rows {
        check_fields(r)?;
        wtr.serialize(r)
            .map_err(|e| AppError::Csv(format!("csv write row {}: {}", r.location, e)))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Csv(format!("csv flush: {}", e)))
}

/// Replaces `out_path` with `bytes` in one step; on failure the old file (if any)
/// is left untouched.
pub fn write_atomic(bytes: &[u8], out_path: &Path) -> Result<(), AppError> {
    let dir = match out_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::IO(format!("temp file in '{}': {}", dir.display(), e)))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(out_path)
        .map_err(|e| AppError::IO(format!("write '{}': {}", out_path.display(), e.error)))?;
    Ok(())
}

pub fn write_csv(rows: &[ChannelRow], out_path: &Path) -> Result<(), AppError> {
    let bytes = render_csv(rows)?;
    write_atomic(&bytes, out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize) -> ChannelRow {
        ChannelRow {
            location: index,
            name: "CE3PA-1".into(),
            frequency: 445.0,
            duplex: "+",
            offset: 5.0,
            tone: "",
            r_tone_freq: 88.5,
            c_tone_freq: 88.5,
            dtcs_code: "023",
            dtcs_polarity: "NN",
            rx_dtcs_code: "023",
            cross_mode: "Tone->Tone",
            mode: "FM",
            t_step: "1",
            skip: "",
            power: "50W",
            comment: "Radio Club @ Cerro".into(),
            urcall: "",
            rpt1call: "",
            rpt2call: "",
            dvcode: "",
        }
    }

    const HEADER_LINE: &str = "Location,Name,Frequency,Duplex,Offset,Tone,rToneFreq,cToneFreq,DtcsCode,DtcsPolarity,RxDtcsCode,CrossMode,Mode,TStep,Skip,Power,Comment,URCALL,RPT1CALL,RPT2CALL,DVCODE\n";

    #[test]
    fn empty_table_is_header_only() {
        let out = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(out, HEADER_LINE);
    }

    #[test]
    fn rows_in_column_order() {
        let out = String::from_utf8(render_csv(&[row(0), row(1)]).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "0,CE3PA-1,445.0,+,5.0,,88.5,88.5,023,NN,023,Tone->Tone,FM,1,,50W,Radio Club @ Cerro,,,,"
        );
        assert!(lines[2].starts_with("1,CE3PA-1,"));
        assert!(!out.contains('\r'));
    }

    #[test]
    fn comma_in_a_value_is_rejected() {
        let mut bad = row(1);
        bad.comment = "Club, Inc @ Cerro".into();
        let err = render_csv(&[row(0), bad]).unwrap_err();
        assert!(matches!(err, AppError::Csv(ref m) if m.contains("channel 1") && m.contains("Comment")));
    }

    #[test]
    fn line_break_in_a_value_is_rejected() {
        let mut bad = row(0);
        bad.name = "CE3\nPA".into();
        assert!(matches!(render_csv(&[bad.clone()]), Err(AppError::Csv(_))));
        bad.name = "CE3PA".into();
        bad.comment = "Club @ Cerro\r".into();
        assert!(matches!(render_csv(&[bad]), Err(AppError::Csv(_))));
    }

    #[test]
    fn atomic_write_replaces_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("channels.csv");
        std::fs::write(&path, "old").unwrap();
        write_csv(&[row(0)], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Location,Name,"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_into_missing_dir_fails_cleanly() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope").join("channels.csv");
        assert!(matches!(write_csv(&[], &path), Err(AppError::IO(_))));
        assert!(!path.exists());
    }
}
