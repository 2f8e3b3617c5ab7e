mod client;
pub mod device;
pub mod vendor;

use async_trait::async_trait;
use reqwest::Url;

use crate::{
    coordinator::{Fields, Section, Source},
    prelude::*,
};

/// Fetches the sections from the device and the vendor website.
pub struct Client {
    device: device::Api,
    vendor: vendor::Api,
}

impl Client {
    pub fn new(host: &str, firmware_url: Url) -> Result<Self> {
        let client = client::try_new()?;
        Ok(Self {
            device: device::Api::new(client.clone(), host)?,
            vendor: vendor::Api::new(client, firmware_url),
        })
    }
}

#[async_trait]
impl Source for Client {
    async fn fetch(&self, section: Section) -> Result<Fields> {
        match section {
            Section::Data => self.device.get_data().await,
            Section::Info => self.device.get_info().await,
            Section::Setup => self.device.get_setup().await,
            Section::Firmware => self.vendor.get_current_version().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::{
        coordinator::Coordinator,
        sensor::{DeviceIdentity, Language, SensorEntity, SensorType, State, value::Value},
    };

    #[tokio::test]
    async fn refresh_from_server_ok() -> Result {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for (path, query, body) in [
            ("/data.jsn", Matcher::Missing, r#"{"power_act": 150, "rel1_out": 1, "load_nom": 2000, "status": 9}"#),
            (
                "/mypv_dev.jsn",
                Matcher::Missing,
                r#"{"sn": "2001002003004005", "fwversion": "a0021200", "device": "AC•THOR"}"#,
            ),
            ("/setup.jsn", Matcher::Missing, r#"{"devmode": 1, "maxpwr": 3000}"#),
            (
                "/currentversion.php",
                Matcher::UrlEncoded("sn".into(), String::new()),
                r#"{"ac_thor": "a0021300"}"#,
            ),
        ] {
            let mock = server.mock("GET", path).match_query(query).with_body(body).expect(1);
            mocks.push(mock.create_async().await);
        }
        let firmware_url = Url::parse(&format!("{}/currentversion.php?sn=", server.url()))?;
        let client = Client::new(&server.host_with_port(), firmware_url)?;

        let mut coordinator = Coordinator::builder().source(client).build();
        let snapshot = coordinator.refresh().await?;
        for mock in mocks {
            mock.assert_async().await;
        }

        let identity = DeviceIdentity::try_from(snapshot.info.as_ref().context("no device info")?)?;
        let mut power = SensorEntity::new(SensorType::PowerAct, "Boiler", identity.clone(), Language::German);
        assert_eq!(power.value_for(snapshot), Some(State::Value(Value::Integer(2150))));
        let mut firmware = SensorEntity::new(SensorType::LatestAcThorFirmware, "Boiler", identity, Language::German);
        assert_eq!(firmware.value_for(snapshot).map(|state| state.to_string()).as_deref(), Some("a0021300"));
        Ok(())
    }
}
