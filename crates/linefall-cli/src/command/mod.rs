use clap::{Parser, Subcommand};

use self::{play::PlayArg, simulate::SimulateArg, train::TrainArg};

mod play;
mod simulate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one game over the line-oriented judge protocol
    Play(#[clap(flatten)] PlayArg),
    /// Run batches of self-play games and report score statistics
    Simulate(#[clap(flatten)] SimulateArg),
    /// Train evaluator weights with the cross-entropy method
    Train(#[clap(flatten)] TrainArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
    }
    Ok(())
}
