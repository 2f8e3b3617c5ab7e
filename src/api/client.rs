use std::time::Duration;

use reqwest::Client;

use crate::prelude::*;

/// Per-request timeout, independent of the refresh budget.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Build a default client.
pub fn try_new() -> Result<Client> {
    Ok(Client::builder().user_agent("mypv").timeout(TIMEOUT).build()?)
}
