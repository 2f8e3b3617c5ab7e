//! Firmware versions published by my-PV.

use reqwest::{Client, Url};

use crate::{coordinator::Fields, prelude::*};

pub const CURRENT_VERSION_URL: &str = "https://www.my-pv.com/download/currentversion.php?sn=";

pub struct Api {
    client: Client,
    url: Url,
}

impl Api {
    pub const fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    #[instrument(skip_all, fields(url = %self.url))]
    pub async fn get_current_version(&self) -> Result<Fields> {
        info!("checking for the latest firmware…");
        let fields: Fields = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("failed to request the current firmware version")?
            .error_for_status()?
            .json()
            .await
            .context("failed to deserialize the current firmware version")?;
        debug!(?fields);
        Ok(fields)
    }
}
