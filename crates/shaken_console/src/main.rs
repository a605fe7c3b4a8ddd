mod config;
use config::Config;

mod console;
use console::Console;

mod directory;
mod template;

use std::io::BufRead as _;

fn init_logger() -> anyhow::Result<()> {
    alto_logger::init_alt_term_logger()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from(&[".env", ".env.dev"]);
    init_logger()?;

    let path = std::env::var("SHAKEN_CONFIG").unwrap_or_else(|_| String::from("shaken.toml"));
    let config = Config::load(&path);
    let console = Console::new(config)?;
    log::info!("loaded '{}', reading commands from stdin", path);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match futures_lite::future::block_on(console.handle(&line)) {
            Ok(Some(reply)) => println!("{}", reply),
            Ok(None) => {}
            Err(err) => log::error!("cannot handle '{}': {:#}", line, err),
        }
    }

    Ok(())
}
