use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    Region { region: String },
    Band { band: Option<&'static str> },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Region { region } => {
                write!(f, "region {} is not in the requested regions", region)
            }
            SkipReason::Band { band: Some(b) } => {
                write!(f, "band {} is not in the requested bands", b)
            }
            SkipReason::Band { band: None } => write!(f, "frequency is outside every known band"),
        }
    }
}

/// Things worth telling the user about while a conversion runs.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    Fetching { source: String },
    Fetched { bytes: usize },
    RowsDecoded { rows: usize },
    RegionUnmapped { identifier: String, region: Option<String> },
    RepeatersFound { count: usize },
    Skipped { identifier: String, reason: SkipReason },
    ChannelWritten { index: usize, identifier: String, mode: &'static str },
    OutputWritten { rows: usize, path: PathBuf },
}

pub trait EventSink {
    fn emit(&mut self, event: PipelineEvent);
}

/// Renders events through the `log` facade.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Fetching { source } => info!("Reading workbook from {}", source),
            PipelineEvent::Fetched { bytes } => info!("Got {} bytes of workbook", bytes),
            PipelineEvent::RowsDecoded { rows } => debug!("Decoded {} data rows", rows),
            PipelineEvent::RegionUnmapped { identifier, region } => match region {
                Some(r) => warn!("Repeater {} has unknown region '{}'", identifier, r),
                None => warn!("Repeater {} has no region", identifier),
            },
            PipelineEvent::RepeatersFound { count } => info!("Found {} repeaters", count),
            PipelineEvent::Skipped { identifier, reason } => {
                info!("Skipping {}: {}", identifier, reason)
            }
            PipelineEvent::ChannelWritten { index, identifier, mode } => {
                debug!("Channel {}: {} ({})", index, identifier, mode)
            }
            PipelineEvent::OutputWritten { rows, path } => {
                info!("Wrote {} channels to {}", rows, path.display())
            }
        }
    }
}

/// Keeps every event in memory.
#[cfg(test)]
#[derive(Default)]
pub struct CollectingSink {
    pub events: Vec<PipelineEvent>,
}

#[cfg(test)]
impl EventSink for CollectingSink {
    fn emit(&mut self, event: PipelineEvent) {
        self.events.push(event);
    }
}
