use crate::catalog::Catalog;
use crate::csv_out;
use crate::errors::AppError;
use crate::events::{EventSink, PipelineEvent};
use crate::export;
use crate::filter::{self, FilterConfig};
use crate::model::{ChannelRow, RawRow};
use crate::normalize;
use crate::source::{self, Source};
use std::path::Path;

/// raw rows -> repeaters -> retained repeaters -> channels.
pub fn convert_rows(
    rows: &[RawRow],
    cfg: &FilterConfig,
    catalog: &Catalog,
    sink: &mut dyn EventSink,
) -> Result<Vec<ChannelRow>, AppError> {
    let repeaters = normalize::normalize_all(rows, catalog, sink)?;
    let kept = filter::filter_repeaters(repeaters, cfg, catalog, sink);
    let channels = export::export(&kept, catalog);
    for ch in &channels {
        sink.emit(PipelineEvent::ChannelWritten {
            index: ch.location,
            identifier: ch.name.clone(),
            mode: ch.mode,
        });
    }
    Ok(channels)
}

/// Full run: nothing is written unless every row converted.
/// Returns the number of channels written.
pub fn run(
    source: &Source,
    cfg: &FilterConfig,
    catalog: &Catalog,
    out_path: &Path,
    sink: &mut dyn EventSink,
) -> Result<usize, AppError> {
    let rows = source::load_rows(source, sink)?;
    let channels = convert_rows(&rows, cfg, catalog, sink)?;
    csv_out::write_csv(&channels, out_path)?;
    sink.emit(PipelineEvent::OutputWritten {
        rows: channels.len(),
        path: out_path.to_path_buf(),
    });
    Ok(channels.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingSink;
    use crate::source::tests::workbook_bytes;

    const RM: &str = "REGIÓN METROPOLITANA DE SANTIAGO";

    fn data_row<'a>(
        id: &'a str,
        tx: &'a str,
        rx: &'a str,
        region: Option<&'a str>,
        location: &'a str,
    ) -> Vec<Option<&'a str>> {
        vec![
            Some("Radio Club de Chile"),
            Some("70.000.000-1"),
            Some("70cm"),
            Some(id),
            Some(tx),
            Some(rx),
            None,
            Some("50 W"),
            Some("6 dBi"),
            region,
            Some("LO BARNECHEA"),
            Some("01-01-2020"),
            Some("01-01-2030"),
            Some("33° 30’ 0\""),
            Some("70° 40’ 0\""),
            Some(location),
        ]
    }

    fn run_to_string(data: &[Vec<Option<&str>>], cfg: &FilterConfig) -> (String, CollectingSink) {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.xlsx");
        let out = dir.path().join("out.csv");
        std::fs::write(&input, workbook_bytes(data)).unwrap();
        let mut sink = CollectingSink::default();
        run(&Source::File(input), cfg, &Catalog::builtin(), &out, &mut sink).unwrap();
        (std::fs::read_to_string(&out).unwrap(), sink)
    }

    #[test]
    fn single_repeater_end_to_end() {
        let data = vec![data_row("CE3PA RPT-1", "440.000", "445.000", Some(RM), "Cerro El Plomo, RM")];
        let (csv, sink) = run_to_string(&data, &FilterConfig::default());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "0,CE3PA-1,445.0,+,5.0,,88.5,88.5,023,NN,023,Tone->Tone,FM,1,,50W,\
             Radio Club de Chile @ Cerro El Plomo RM,,,,"
        );
        assert!(sink.events.contains(&PipelineEvent::RepeatersFound { count: 1 }));
        assert!(sink.events.iter().any(|e| matches!(e, PipelineEvent::OutputWritten { rows: 1, .. })));
    }

    #[test]
    fn filtered_rows_get_dense_indices() {
        let data = vec![
            data_row("CE3A", "440.0", "445.0", Some(RM), "A"),
            data_row("CE3B", "146.88", "146.28", Some(RM), "B"),
            data_row("CE5C", "440.0", "445.0", Some("REGIÓN DE VALPARAÍSO"), "C"),
            data_row("CE3D", "439.0", "434.0", Some(RM), "D"),
        ];
        let cat = Catalog::builtin();
        let cfg = FilterConfig::new(&["RM".to_string()], &["70cm".to_string()], &cat).unwrap();
        let (csv, sink) = run_to_string(&data, &cfg);
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("0,CE3A,445.0,+,5.0,"));
        assert!(rows[1].starts_with("1,CE3D,434.0,-,5.0,"));
        let skipped = sink
            .events
            .iter()
            .filter(|e| matches!(e, PipelineEvent::Skipped { .. }))
            .count();
        assert_eq!(skipped, 2);
    }

    #[test]
    fn unmapped_region_still_exported() {
        let data = vec![data_row("CE0X", "146.88", "146.28", None, "Somewhere")];
        let (csv, sink) = run_to_string(&data, &FilterConfig::default());
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("0,CE0X,146.28,-,0.6,"));
        assert!(sink.events.contains(&PipelineEvent::RegionUnmapped {
            identifier: "CE0X".into(),
            region: None,
        }));
    }

    #[test]
    fn everything_filtered_leaves_header_only() {
        let data = vec![data_row("CE3A", "440.0", "445.0", Some(RM), "A")];
        let cat = Catalog::builtin();
        let cfg = FilterConfig::new(&["VA".to_string()], &[], &cat).unwrap();
        let (csv, _) = run_to_string(&data, &cfg);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("Location,Name,Frequency,"));
    }

    #[test]
    fn comma_in_operator_aborts_without_output() {
        let mut row = data_row("CE1X", "146.88", "146.28", Some(RM), "loc");
        row[0] = Some("Club, Inc");
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.xlsx");
        let out = dir.path().join("out.csv");
        std::fs::write(&input, workbook_bytes(&[row])).unwrap();
        let mut sink = CollectingSink::default();
        let res = run(
            &Source::File(input),
            &FilterConfig::default(),
            &Catalog::builtin(),
            &out,
            &mut sink,
        );
        assert!(matches!(res, Err(AppError::Csv(ref m)) if m.contains("CE1X")));
        assert!(!out.exists());
    }

    #[test]
    fn malformed_coordinate_writes_nothing() {
        let mut bad = data_row("CE3A", "440.0", "445.0", Some(RM), "A");
        bad[13] = Some("33 30");
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.xlsx");
        let out = dir.path().join("out.csv");
        std::fs::write(&input, workbook_bytes(&[bad])).unwrap();
        let mut sink = CollectingSink::default();
        let res = run(
            &Source::File(input),
            &FilterConfig::default(),
            &Catalog::builtin(),
            &out,
            &mut sink,
        );
        assert!(matches!(res, Err(AppError::MalformedCoordinate { .. })));
        assert!(!out.exists());
    }
}
