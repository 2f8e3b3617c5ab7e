//! Local JSON endpoints of the device.

use reqwest::{Client, Url};

use crate::{coordinator::Fields, prelude::*};

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn new(client: Client, host: &str) -> Result<Self> {
        let base_url = Url::parse(&format!("http://{host}/"))
            .with_context(|| format!("invalid device host `{host}`"))?;
        Ok(Self { client, base_url })
    }

    /// Live measurements.
    pub async fn get_data(&self) -> Result<Fields> {
        self.get("data.jsn").await
    }

    /// Serial number, firmware version and model.
    pub async fn get_info(&self) -> Result<Fields> {
        self.get("mypv_dev.jsn").await
    }

    pub async fn get_setup(&self) -> Result<Fields> {
        self.get("setup.jsn").await
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = path))]
    async fn get(&self, path: &str) -> Result<Fields> {
        let url = self.base_url.join(path)?;
        let fields: Fields = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to request `{url}`"))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("failed to deserialize the response from `{url}`"))?;
        trace!(?fields);
        Ok(fields)
    }
}
