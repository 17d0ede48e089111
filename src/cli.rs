use argparse::{ArgumentParser, Collect, Store, StoreOption};
use std::path::PathBuf;

pub struct CliArgs {
    pub input_file: Option<PathBuf>,
    pub fetch_url: Option<String>,
    pub regions: Vec<String>,
    pub bands: Vec<String>,
    pub log_level: String,
    pub out: PathBuf,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input_file: None,
            fetch_url: None,
            regions: vec![],
            bands: vec![],
            log_level: "essential".into(),
            out: PathBuf::from("cl_repeaters.csv"),
        }
    }
}

pub fn parse_cli() -> CliArgs {
    let mut args = CliArgs::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("SUBTEL repeater listing (XLSX) -> CHIRP CSV converter");
        ap.refer(&mut args.input_file)
            .add_option(&["--input-file"], StoreOption, "Local XLSX file to parse");
        ap.refer(&mut args.fetch_url)
            .add_option(&["--fetch-url"], StoreOption, "URL of XLSX to request and parse");
        ap.refer(&mut args.regions)
            .add_option(&["-r", "--region"], Collect, "Region code to keep (repeatable)");
        ap.refer(&mut args.bands)
            .add_option(&["-b", "--band"], Collect, "Band to keep: 2m|1.25m|70cm (repeatable)");
        ap.refer(&mut args.log_level)
            .add_option(&["--log"], Store, "Log level (essential|debug|trace|warn|error)");
        ap.refer(&mut args.out)
            .add_option(&["--out"], Store, "Output CSV path");
        ap.parse_args_or_exit();
    }
    args
}
