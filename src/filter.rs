use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::events::{EventSink, PipelineEvent, SkipReason};
use crate::model::Repeater;
use std::collections::BTreeSet;

/// Region and band selection. `None` means "keep everything" for that criterion.
#[derive(Clone, Debug, Default)]
pub struct FilterConfig {
    pub regions: Option<BTreeSet<String>>,
    pub bands: Option<BTreeSet<String>>,
}

impl FilterConfig {
    /// Validates requested values against the catalog. Empty lists mean no filter.
    pub fn new(regions: &[String], bands: &[String], catalog: &Catalog) -> Result<Self, AppError> {
        if let Some(bad) = regions.iter().find(|r| !catalog.is_region_code(r)) {
            return Err(AppError::InvalidFilter(format!(
                "unknown region '{}'; expected any of {}",
                bad,
                catalog.region_codes().join(", ")
            )));
        }
        if let Some(bad) = bands.iter().find(|b| !catalog.is_band_label(b)) {
            return Err(AppError::InvalidFilter(format!(
                "unknown band '{}'; expected any of {}",
                bad,
                catalog.band_labels().join(", ")
            )));
        }
        let as_set = |v: &[String]| -> Option<BTreeSet<String>> {
            if v.is_empty() { None } else { Some(v.iter().cloned().collect()) }
        };
        Ok(FilterConfig { regions: as_set(regions), bands: as_set(bands) })
    }

    /// Region is checked before band; the first failing criterion is reported.
    /// Band membership uses the band computed from `rx`, not the declared one.
    pub fn accept(&self, r: &Repeater, catalog: &Catalog) -> Result<(), SkipReason> {
        if let Some(regions) = &self.regions {
            if !regions.contains(&r.region) {
                return Err(SkipReason::Region { region: r.region.clone() });
            }
        }
        if let Some(bands) = &self.bands {
            let band = catalog.classify_band(r.rx);
            match band {
                Some(b) if bands.contains(b) => {}
                _ => return Err(SkipReason::Band { band }),
            }
        }
        Ok(())
    }
}

/// Keeps accepted repeaters in their original order, reporting each skip.
pub fn filter_repeaters(
    records: Vec<Repeater>,
    cfg: &FilterConfig,
    catalog: &Catalog,
    sink: &mut dyn EventSink,
) -> Vec<Repeater> {
    records
        .into_iter()
        .filter(|r| match cfg.accept(r, catalog) {
            Ok(()) => true,
            Err(reason) => {
                sink.emit(PipelineEvent::Skipped { identifier: r.identifier.clone(), reason });
                false
            }
        })
        .collect()
}
