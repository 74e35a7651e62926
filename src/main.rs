use clap::{App, Arg};
use docr::build::build_site;
use docr::config::Settings;
use std::path::Path;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let matches = App::new("docr")
        .version(clap::crate_version!())
        .about("A static site generator for directories of dated markdown notes")
        .arg(
            Arg::with_name("settings")
                .short("s")
                .long("settings")
                .value_name("FILE")
                .help("Path to the settings file")
                .takes_value(true),
        )
        .get_matches();

    let settings_path = Path::new(matches.value_of("settings").unwrap_or("docr.yaml"));
    let settings = match Settings::from_file(settings_path) {
        Ok(settings) => settings,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    if let Err(err) = build_site(&settings) {
        error!("{}", err);
        process::exit(1);
    }

    info!("Static pages and RSS feed generated successfully.");
}
