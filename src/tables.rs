use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::sensor::{DeviceInfo, SensorEntity, SensorType, State};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_states_table(states: &[(&SensorEntity, Option<State>)]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Sensor", "State", "Unit", "Class", "Unique ID"]);
    for (entity, state) in states {
        let state_cell = match state {
            Some(state @ State::Labelled { .. }) => Cell::new(state).fg(Color::Cyan),
            Some(state @ State::Value(_)) => Cell::new(state),
            None => Cell::new("unknown").add_attribute(Attribute::Dim),
        };
        let class = match (entity.device_class(), entity.state_class()) {
            (Some(device_class), Some(state_class)) => format!("{device_class:?}, {state_class:?}"),
            (Some(device_class), None) => format!("{device_class:?}"),
            (None, Some(state_class)) => format!("{state_class:?}"),
            (None, None) => String::new(),
        };
        table.add_row(vec![
            Cell::new(entity.name()),
            state_cell.set_alignment(CellAlignment::Right),
            Cell::new(entity.unit().map(|unit| unit.to_string()).unwrap_or_default()),
            Cell::new(class).add_attribute(Attribute::Dim),
            Cell::new(entity.unique_id()).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_device_table(device_info: &DeviceInfo<'_>) -> Table {
    let (domain, serial_number) = device_info.identifier;
    let mut table = new_table();
    table.set_header(vec!["Name", "Manufacturer", "Model", "Serial number", "Firmware"]);
    table.add_row(vec![
        Cell::new(device_info.name),
        Cell::new(device_info.manufacturer),
        Cell::new(device_info.model),
        Cell::new(format!("{domain}:{serial_number}")),
        Cell::new(device_info.sw_version),
    ]);
    table
}

pub fn build_sensor_types_table() -> Table {
    let mut table = new_table();
    table.set_header(vec!["Key", "Name", "Unit", "Icon", "Source"]);
    for sensor_type in SensorType::ALL {
        let descriptor = sensor_type.descriptor();
        table.add_row(vec![
            Cell::new(descriptor.key).add_attribute(Attribute::Bold),
            Cell::new(descriptor.name),
            Cell::new(descriptor.unit.map(|unit| unit.to_string()).unwrap_or_default()),
            Cell::new(descriptor.icon).add_attribute(Attribute::Dim),
            Cell::new(descriptor.section),
        ]);
    }
    table
}
