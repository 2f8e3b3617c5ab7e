//! Sensor entities and the mapping from raw snapshot values to their states.

mod descriptor;
mod entity;
mod label;
pub mod value;

pub use self::{
    descriptor::{Descriptor, SensorType, Unit},
    entity::{DeviceIdentity, DeviceInfo, SensorEntity},
    label::Language,
    value::State,
};
