use std::collections::{HashMap, HashSet};

/// Region code used when the sheet has no region or an unknown one.
pub const UNKNOWN_REGION: &str = "AA";

const REGIONS: [(&str, &str); 16] = [
    ("REGIÓN DE AYSÉN DEL GENERAL CARLOS IBÁÑEZ DEL CAMPO", "AI"),
    ("REGIÓN DE ANTOFAGASTA", "AN"),
    ("REGIÓN DE ARICA Y PARINACOTA", "AP"),
    ("REGIÓN DE LA ARAUCANÍA", "AR"),
    ("REGIÓN DE ATACAMA", "AT"),
    ("REGIÓN DEL BIOBÍO", "BI"),
    ("REGIÓN DE COQUIMBO", "CO"),
    ("REGIÓN DEL LIBERTADOR GENERAL BERNARDO O'HIGGINS", "OH"),
    ("REGIÓN DE LOS LAGOS", "LL"),
    ("REGIÓN DE LOS RÍOS", "LR"),
    ("REGIÓN DE MAGALLANES Y DE LA ANTÁRTICA CHILENA", "MG"),
    ("REGIÓN DEL MAULE", "MA"),
    // The published sheet spells it without the tilde.
    ("REGIÓN DE NUBLE", "NB"),
    ("REGIÓN METROPOLITANA DE SANTIAGO", "RM"),
    ("REGIÓN DE TARAPACÁ", "TA"),
    ("REGIÓN DE VALPARAÍSO", "VA"),
];

const BANDS: [BandPlan; 3] = [
    BandPlan { label: "2m", low: 144.0, high: 148.0 },
    BandPlan { label: "1.25m", low: 220.0, high: 225.0 },
    BandPlan { label: "70cm", low: 420.0, high: 450.0 },
];

/// Stations that must be programmed as narrow FM.
const NARROW: [&str; 3] = ["CE3PA-A", "CE3PA-B", "CE3PA-D"];

/// Inclusive frequency range in MHz.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandPlan {
    pub label: &'static str,
    pub low: f64,
    pub high: f64,
}

impl BandPlan {
    pub fn contains(&self, mhz: f64) -> bool {
        self.low <= mhz && mhz <= self.high
    }
}

/// Lookup tables shared by every stage. Built once and only read afterwards.
#[derive(Clone, Debug)]
pub struct Catalog {
    regions: HashMap<&'static str, &'static str>,
    bands: Vec<BandPlan>,
    narrow: HashSet<&'static str>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Catalog {
            regions: REGIONS.iter().copied().collect(),
            bands: BANDS.to_vec(),
            narrow: NARROW.iter().copied().collect(),
        }
    }

    /// Maps a full region name to its code. Matching is exact (case and accents).
    pub fn map_region(&self, name: Option<&str>) -> &'static str {
        name.and_then(|n| self.regions.get(n).copied())
            .unwrap_or(UNKNOWN_REGION)
    }

    /// First band, in table order, whose range holds `mhz`.
    pub fn classify_band(&self, mhz: f64) -> Option<&'static str> {
        self.bands.iter().find(|b| b.contains(mhz)).map(|b| b.label)
    }

    pub fn is_narrow(&self, identifier: &str) -> bool {
        self.narrow.contains(identifier)
    }

    /// Region codes in table order, sentinel excluded.
    pub fn region_codes(&self) -> Vec<&'static str> {
        REGIONS.iter().map(|(_, code)| *code).collect()
    }

    pub fn band_labels(&self) -> Vec<&'static str> {
        self.bands.iter().map(|b| b.label).collect()
    }

    pub fn is_region_code(&self, code: &str) -> bool {
        self.regions.values().any(|c| *c == code)
    }

    pub fn is_band_label(&self, label: &str) -> bool {
        self.bands.iter().any(|b| b.label == label)
    }
}
