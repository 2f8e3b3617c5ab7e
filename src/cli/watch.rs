use clap::Parser;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    cli::device::{DeviceArgs, read_states},
    prelude::*,
    tables::build_states_table,
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(long, env = "POLLING_INTERVAL", default_value = "10s")]
    polling_interval: humantime::Duration,

    #[clap(flatten)]
    device: DeviceArgs,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        let mut coordinator = self.device.connect()?;
        coordinator.set_interval(self.polling_interval.into());

        let mut interval = interval(coordinator.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The entities need the device identity, keep polling until it arrives.
        let mut entities = None;
        loop {
            interval.tick().await;
            let snapshot = match coordinator.refresh().await {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    error!("{error:#}, the sensors are unavailable");
                    continue;
                }
            };
            if entities.is_none() {
                entities = self.device.try_build_entities(snapshot)?;
            }
            match entities.as_mut() {
                Some(entities) => {
                    println!("{}", build_states_table(&read_states(entities, snapshot)));
                }
                None => {
                    warn!("the device info is not available yet, retrying…");
                }
            }
        }
    }
}
