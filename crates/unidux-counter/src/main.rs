use tokio::io::{AsyncBufReadExt, BufReader};
use unidux_config::AppConfig;

mod actions;
mod commands;
mod logger;
mod middleware;
mod modes;
mod quote_service;
mod reducer;
mod reducers;
mod state;
mod store;
mod view;

use actions::CounterAction;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The logger needs the configured level, so config errors are reported once it is up
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let log_file = logger::init(&config.log_level)?;

    log::info!("Starting unidux-counter");
    if let Some(e) = config_error {
        log::warn!("{:#}, using defaults", e);
        eprintln!("warning: {:#}, using defaults", e);
    }
    log::debug!("Config: {:?}", config);

    let store = store::build_store(&config);

    // Render every state change
    let _subscription = store.subscribe(|state| println!("{}", view::render(state)));

    println!("{}", commands::HELP);
    println!("{}", view::render(&store.get_state()));
    println!("(logging to {})", log_file.display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while store.get_state().running {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if let Err(e) = store.dispatch(CounterAction::CommandEntered(line)) {
                    log::warn!("Dispatch failed: {}", e);
                    eprintln!("error: {}", e);
                }
            }
            Some(result) = store.process_next() => {
                if let Err(e) = result {
                    log::warn!("Follow-up dispatch failed: {}", e);
                }
            }
        }
    }

    log::info!("Exiting unidux-counter");
    Ok(())
}
