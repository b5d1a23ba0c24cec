//! Capacitive sensor response to a humidity ramp
//!
//! Feeds a rising then falling humidity ramp through the sensor model and
//! prints the reported RH next to the true value, showing noise and
//! hysteresis.
//!
//! Run with: cargo run --example 02_sensor_response

use humitwin_core::{AmbientSample, CapacitiveSensor, RngNoise};

fn main() {
    let mut sensor = CapacitiveSensor::new(RngNoise::seeded(2024));
    let temp_c = 21.0;

    let ramp = (0..=10).chain((0..10).rev()).map(|i| 20.0 + 6.0 * i as f64);

    println!("{:>8} {:>10} {:>12} {:>10}", "true %", "sensor %", "C (pF)", "Td (°C)");
    for rh in ramp {
        let sample = AmbientSample::new(temp_c, rh);
        match sensor.simulate(sample.absolute_humidity(), temp_c) {
            Ok(reading) => println!(
                "{:>8.1} {:>10.2} {:>12.3} {:>10.2}",
                rh,
                reading.rh_pct,
                reading.capacitance_f * 1e12,
                reading.dew_point_c
            ),
            Err(e) => println!("{:>8.1} {}", rh, e),
        }
    }
}
