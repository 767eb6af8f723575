use clap::Parser;
use hugo_gallery::args::Args;
use hugo_gallery::{ExifToolReader, ImportError, Importer};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<ImportError>()
            .map(ImportError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.import_config()?;
    let request = config.request(&args.source_path, &args.section, &args.title);

    let reader = ExifToolReader::new()?;
    let mut importer = Importer::new(config, reader);

    let summary = importer.import(&request)?;
    summary.log();

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
