use std::time::Duration;

use serde_json::{Map, Value};

/// Decoded JSON object of one endpoint response.
pub type Fields = Map<String, Value>;

/// Part of the snapshot, named after the endpoint it comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Section {
    /// Live measurements, `data.jsn`.
    #[display("data")]
    Data,

    /// Device identity, `mypv_dev.jsn`.
    #[display("info")]
    Info,

    /// Device settings, `setup.jsn`.
    #[display("setup")]
    Setup,

    /// Latest firmware versions published by the vendor.
    #[display("firmware")]
    Firmware,
}

/// How long a fetched section stays valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Refresh {
    EveryCycle,
    Once,
    Every(Duration),
}

impl Section {
    pub const SETUP_REFRESH_PERIOD: Duration = Duration::from_secs(120);
    pub const FIRMWARE_REFRESH_PERIOD: Duration = Duration::from_secs(7 * 86400);

    pub const fn refresh(self) -> Refresh {
        match self {
            Self::Data => Refresh::EveryCycle,
            Self::Info => Refresh::Once,
            Self::Setup => Refresh::Every(Self::SETUP_REFRESH_PERIOD),
            Self::Firmware => Refresh::Every(Self::FIRMWARE_REFRESH_PERIOD),
        }
    }
}

/// Merged result of one poll cycle.
///
/// A section is `None` when it has never been fetched successfully, or, for
/// [`Section::Data`], when this cycle's fetch failed.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub data: Option<Fields>,
    pub info: Option<Fields>,
    pub setup: Option<Fields>,
    pub firmware: Option<Fields>,
}

impl Snapshot {
    pub const fn get(&self, section: Section) -> Option<&Fields> {
        match section {
            Section::Data => self.data.as_ref(),
            Section::Info => self.info.as_ref(),
            Section::Setup => self.setup.as_ref(),
            Section::Firmware => self.firmware.as_ref(),
        }
    }
}
