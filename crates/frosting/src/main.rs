mod app;
mod cli;
mod logging;
mod record;
mod render;

use std::io;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use frosting_config::Config;

use crate::app::App;
use crate::cli::{Cli, Command};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.log_level)?;

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, frame_rate = config.frame_rate, "config resolved");

    if let Some(Command::Record(args)) = &cli.command {
        return record::run(&config, args, seed, io::stdout().lock());
    }

    let terminal = ratatui::init();
    let result = crossterm::execute!(io::stdout(), EnableMouseCapture)
        .map_err(Into::into)
        .and_then(|()| App::new(config, seed, cli.config).run(terminal));
    let released = crossterm::execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result?;
    released?;
    Ok(())
}
