use clap::Parser;

use crate::{
    cli::device::{DeviceArgs, read_states},
    prelude::*,
    tables::{build_device_table, build_states_table},
};

#[derive(Parser)]
pub struct ReadArgs {
    #[clap(flatten)]
    device: DeviceArgs,
}

impl ReadArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let mut coordinator = self.device.connect()?;
        let snapshot = coordinator.refresh().await?;
        let mut entities = self.device.build_entities(snapshot)?;
        if let Some(entity) = entities.first() {
            println!("{}", build_device_table(&entity.device_info()));
        }
        println!("{}", build_states_table(&read_states(&mut entities, snapshot)));
        Ok(())
    }
}
