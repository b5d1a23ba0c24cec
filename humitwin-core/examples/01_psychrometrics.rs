//! Psychrometric conversions for a few weather situations
//!
//! Run with: cargo run --example 01_psychrometrics

use humitwin_core::{psychrometrics, AmbientSample};

fn main() {
    let samples = [
        ("Spring afternoon", AmbientSample::new(20.0, 50.0)),
        ("Humid summer", AmbientSample::new(25.0, 60.0)),
        ("Winter morning", AmbientSample::new(-15.0, 85.0)),
        ("Bone dry", AmbientSample::new(20.0, 0.0)),
    ];

    for (name, sample) in samples {
        let rho = sample.absolute_humidity();
        let enthalpy = psychrometrics::specific_enthalpy(sample.temperature_c, rho);

        println!(
            "{}: {:.1} °C, {:.0} %RH",
            name, sample.temperature_c, sample.relative_humidity_pct
        );
        println!("  absolute humidity: {:.2} g/m³", rho);
        println!("  enthalpy:          {:.1} kJ/kg", enthalpy);
        match psychrometrics::dew_point(sample.temperature_c, sample.relative_humidity_pct) {
            Ok(td) => println!("  dew point:         {:.1} °C", td),
            Err(e) => println!("  dew point:         unavailable ({})", e),
        }
    }
}
