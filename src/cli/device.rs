//! Device connection and entity selection arguments.

use clap::Parser;
use enumset::EnumSet;
use reqwest::Url;

use crate::{
    api::{self, vendor::CURRENT_VERSION_URL},
    coordinator::{Coordinator, Snapshot},
    prelude::*,
    sensor::{DeviceIdentity, Language, SensorEntity, SensorType, State},
};

#[derive(Parser)]
pub struct DeviceArgs {
    /// Device host name or IP address, optionally with a port.
    #[clap(long, env = "MYPV_HOST")]
    host: String,

    /// Device name shown in the device info.
    #[clap(long, env = "MYPV_NAME", default_value = "my-PV")]
    name: String,

    #[clap(long, env = "MYPV_LANGUAGE", value_enum, default_value = "german")]
    language: Language,

    #[clap(long, env = "MYPV_FIRMWARE_URL", default_value = CURRENT_VERSION_URL)]
    firmware_url: Url,

    #[clap(flatten)]
    sensors: SensorSelection,
}

impl DeviceArgs {
    pub fn connect(&self) -> Result<Coordinator<api::Client>> {
        let client = api::Client::new(&self.host, self.firmware_url.clone())?;
        Ok(Coordinator::builder().source(client).build())
    }

    /// Build the selected entities, identifying the device from its info.
    pub fn build_entities(&self, snapshot: &Snapshot) -> Result<Vec<SensorEntity>> {
        self.try_build_entities(snapshot)?.context("the device info is unavailable")
    }

    /// Same as [`Self::build_entities`], but `None` while the device info has not arrived yet.
    #[instrument(skip_all)]
    pub fn try_build_entities(&self, snapshot: &Snapshot) -> Result<Option<Vec<SensorEntity>>> {
        let sensor_types = self.sensors.sensor_types();
        ensure!(!sensor_types.is_empty(), "no sensors selected");
        let Some(info) = snapshot.info.as_ref() else {
            return Ok(None);
        };
        let identity = DeviceIdentity::try_from(info)?;
        info!(
            serial_number = %identity.serial_number,
            model = %identity.model,
            firmware_version = %identity.firmware_version,
            "identified the device",
        );
        let entities = sensor_types
            .iter()
            .map(|sensor_type| {
                SensorEntity::new(sensor_type, &self.name, identity.clone(), self.language)
            })
            .collect();
        Ok(Some(entities))
    }
}

#[derive(Parser)]
pub struct SensorSelection {
    /// Expose every supported sensor, ignoring `--sensors`.
    #[clap(long = "all-sensors", env = "USE_ALL_SENSORS")]
    all: bool,

    /// Sensors to expose, see `sensors` for the list.
    #[clap(
        long = "sensors",
        env = "MONITORED_CONDITIONS",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "power_act,temp1,status",
    )]
    sensors: Vec<SensorType>,
}

impl SensorSelection {
    #[must_use]
    pub fn sensor_types(&self) -> EnumSet<SensorType> {
        if self.all { EnumSet::all() } else { self.sensors.iter().copied().collect() }
    }
}

/// Read every entity's state from the snapshot.
pub fn read_states<'a>(
    entities: &'a mut [SensorEntity],
    snapshot: &Snapshot,
) -> Vec<(&'a SensorEntity, Option<State>)> {
    entities
        .iter_mut()
        .map(|entity| {
            let state = entity.value_for(snapshot);
            (&*entity, state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct TestArgs {
        #[clap(flatten)]
        device: DeviceArgs,
    }

    #[test]
    fn default_selection() -> Result {
        let args = TestArgs::try_parse_from(["mypv", "--host", "192.168.1.10"])?;
        assert_eq!(
            args.device.sensors.sensor_types(),
            SensorType::PowerAct | SensorType::Temp1 | SensorType::Status
        );
        assert_eq!(args.device.language, Language::German);
        assert_eq!(args.device.firmware_url.as_str(), CURRENT_VERSION_URL);
        Ok(())
    }

    #[test]
    fn entities_wait_for_device_info() -> Result {
        let args = TestArgs::try_parse_from(["mypv", "--host", "boiler", "--sensors", "temp1,freq"])?;
        assert!(args.device.try_build_entities(&Snapshot::default())?.is_none());
        assert!(args.device.build_entities(&Snapshot::default()).is_err());

        let serde_json::Value::Object(info) =
            serde_json::json!({"sn": "2001002003004005", "fwversion": "a0021200", "device": "AC•THOR"})
        else {
            unreachable!()
        };
        let snapshot = Snapshot { info: Some(info), ..Snapshot::default() };
        let entities = args.device.try_build_entities(&snapshot)?.context("no entities")?;
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].unique_id(), "mypv 2001002003004005 temp1");
        Ok(())
    }

    #[test]
    fn all_sensors() -> Result {
        let args = TestArgs::try_parse_from(["mypv", "--host", "boiler", "--all-sensors"])?;
        assert_eq!(args.device.sensors.sensor_types().len(), SensorType::ALL.len());
        Ok(())
    }

    #[test]
    fn monitored_conditions() -> Result {
        let args = TestArgs::try_parse_from(["mypv", "--host", "boiler", "--sensors", "freq,m1devstate"])?;
        assert_eq!(
            args.device.sensors.sensor_types(),
            SensorType::Frequency | SensorType::Meter1State
        );
        Ok(())
    }

    #[test]
    fn unknown_sensor_is_rejected() {
        assert!(TestArgs::try_parse_from(["mypv", "--host", "boiler", "--sensors", "bogus"]).is_err());
    }
}
