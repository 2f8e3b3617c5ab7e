mod device;
mod read;
mod sensors;
mod watch;

use clap::{Parser, Subcommand};

use crate::{
    cli::{read::ReadArgs, sensors::SensorsArgs, watch::WatchArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll the device and print the sensor states on every refresh.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Refresh once and print the device and its sensor states.
    #[clap(name = "read")]
    Read(Box<ReadArgs>),

    /// List the supported sensor types.
    #[clap(name = "sensors")]
    Sensors(SensorsArgs),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Watch(args) => args.run().await,
            Self::Read(args) => args.run().await,
            Self::Sensors(args) => {
                args.run();
                Ok(())
            }
        }
    }
}
