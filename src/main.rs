mod canvas;
mod config;
mod game;
mod term;
mod snake;

use std::{env, fs::File, str::FromStr};

use anyhow::{Context, Result};
use simplelog::{LevelFilter, WriteLogger};

use crate::config::{Config, LOG_FILE, LOG_LEVEL_VAR};
use crate::term::TermManager;

pub type TermInt = u16;
pub type Coords = (u16, u16);
pub type GridInt = i32;

fn main() -> Result<()> {
    // The terminal is in raw mode while playing, so logs go to a file
    WriteLogger::init(log_level(), simplelog::Config::default(), File::create(LOG_FILE)?)
        .context("failed to initialize logger")?;

    log::info!("starting bounce-snake");

    let mut game = game::SnakeGame::new(Config::default())?;
    let mut term = TermManager::new().context("no terminal available")?;
    game.run(&mut term)
}

fn log_level() -> LevelFilter {
    env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info)
}
