#[macro_use]
extern crate log;

#[macro_use]
extern crate derive_builder;

#[macro_use]
extern crate lazy_static;

mod app;
mod configuration;
mod connection;
mod reporter;
mod store;
mod time;

use log::LevelFilter;
use signal_hook::{iterator::Signals, SIGINT};
use std::{path::PathBuf, process::exit, thread};
use structopt::StructOpt;

use self::app::App;
use self::{
    configuration::command_line::{LogLevel, Opt},
    configuration::manifest::Manifest,
};

fn main() {
    let options = Opt::from_args();

    if let Err(e) = init_logging(
        options.logging.unwrap_or(LogLevel::Info).filter(),
        &options.log_output_file,
    ) {
        eprintln!("Failed to initialize logging: {}", e);
        exit(1);
    }

    match Signals::new(&[SIGINT]) {
        Ok(signals) => {
            thread::spawn(move || {
                for sig in signals.forever() {
                    warn!("Received signal {:?}, abandoning the remote run", sig);
                    exit(130);
                }
            });
        }
        Err(e) => warn!("Cannot register signal handler: {}", e),
    }

    let mut manifest = match Manifest::from(options.file) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("Failed to load manifest file configuration {}", e);
            exit(1);
        }
    };
    if let Some(endpoint) = options.endpoint {
        manifest.test_object.endpoint = endpoint;
    }
    if let Some(output) = options.output {
        manifest.output = Some(output);
    }
    debug!("Initiated configuration {:#?}", manifest);

    let result = App::new(manifest).and_then(|app| app.run());
    if let Err(e) = result {
        error!("{}", e);
        exit(1);
    }
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        // stdout may carry the task result
        .chain(std::io::stderr());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher.apply()?;
    info!("Logging level {} enabled", level);
    Ok(())
}
