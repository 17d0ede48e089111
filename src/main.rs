mod catalog;
mod cli;
mod csv_out;
mod errors;
mod events;
mod export;
mod filter;
mod model;
mod normalize;
mod pipeline;
mod source;

use anyhow::Context;
use env_logger::Env;
use log::info;

fn setup_logging(level: &str) {
    let env = Env::default().filter_or("RUST_LOG", match level {
        "essential" => "info",
        "debug" => "debug",
        "trace" => "trace",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    });
    env_logger::Builder::from_env(env).init();
}

fn main() -> anyhow::Result<()> {
    let args = cli::parse_cli();
    setup_logging(&args.log_level);

    let catalog = catalog::Catalog::builtin();
    let cfg = filter::FilterConfig::new(&args.regions, &args.bands, &catalog)
        .context("bad filter arguments")?;
    let source = source::Source::resolve(args.input_file, args.fetch_url);

    let mut sink = events::LogSink;
    let written = pipeline::run(&source, &cfg, &catalog, &args.out, &mut sink)
        .with_context(|| format!("converting {}", source.describe()))?;

    info!("Done: {} channels.", written);
    Ok(())
}
