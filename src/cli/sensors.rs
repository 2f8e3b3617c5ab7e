use clap::Parser;

use crate::tables::build_sensor_types_table;

#[derive(Parser)]
pub struct SensorsArgs {}

impl SensorsArgs {
    pub fn run(self) {
        println!("{}", build_sensor_types_table());
    }
}
