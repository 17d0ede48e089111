use crate::catalog::Catalog;
use crate::model::{ChannelRow, Repeater};

/// Standby tone recorded when a repeater has no access tone.
pub const DEFAULT_TONE: f64 = 88.5;

/// `rx - tx` rounded to one decimal place. Rounding works on the exact binary
/// value with ties to even, so `0.25` gives `0.2` and `0.75` gives `0.8`.
pub fn offset(r: &Repeater) -> f64 {
    let diff = r.rx - r.tx;
    format!("{:.1}", diff).parse().unwrap_or(diff)
}

pub fn duplex(offset: f64) -> &'static str {
    if offset < 0.0 { "-" } else { "+" }
}

/// Operator and location, with commas removed from the location since the
/// output is unquoted.
pub fn comment(r: &Repeater) -> String {
    format!("{} @ {}", r.operator, r.location.replace(',', ""))
}

/// Derives the channel programmed at memory slot `index`.
pub fn channel_for(r: &Repeater, index: usize, catalog: &Catalog) -> ChannelRow {
    let offset = offset(r);
    let mode = if catalog.is_narrow(&r.identifier) { "NFM" } else { "FM" };

    ChannelRow {
        location: index,
        name: r.identifier.clone(),
        frequency: r.rx,
        duplex: duplex(offset),
        offset: offset.abs(),
        tone: if r.tone.is_some() { "Tone" } else { "" },
        r_tone_freq: r.tone.unwrap_or(DEFAULT_TONE),
        c_tone_freq: DEFAULT_TONE,
        dtcs_code: "023",
        dtcs_polarity: "NN",
        rx_dtcs_code: "023",
        cross_mode: "Tone->Tone",
        mode,
        t_step: "1",
        skip: "",
        power: "50W",
        comment: comment(r),
        urcall: "",
        rpt1call: "",
        rpt2call: "",
        dvcode: "",
    }
}

/// Builds the channel table. The row being built is also the index counter,
/// so indices are dense over the records handed in.
pub fn export(records: &[Repeater], catalog: &Catalog) -> Vec<ChannelRow> {
    records
        .iter()
        .fold(Vec::with_capacity(records.len()), |mut rows, r| {
            let index = rows.len();
            rows.push(channel_for(r, index, catalog));
            rows
        })
}
