//! Seawater equation of state
//!
//! UNESCO EOS-80 one-atmosphere density with potential temperature from the
//! Bryden (1973) adiabatic lapse rate, integrated with the Fofonoff (1977)
//! Runge-Kutta scheme. Inputs are ITS-90 temperature (°C), practical
//! salinity and sea pressure (dbar); the EOS-80 polynomials are evaluated on
//! the IPTS-68 scale.

/// ITS-90 to IPTS-68 temperature conversion factor
const T68_FACTOR: f64 = 1.00024;

/// Adiabatic lapse rate in °C/dbar (IPTS-68 temperature)
pub fn adiabatic_lapse_rate(salinity: f64, t68: f64, pressure: f64) -> f64 {
    let ds = salinity - 35.0;
    (((-2.1687e-16 * t68 + 1.8676e-14) * t68 - 4.6206e-13) * pressure
        + ((2.7759e-12 * t68 - 1.1351e-10) * ds
            + ((-5.4481e-14 * t68 + 8.733e-12) * t68 - 6.7795e-10) * t68
            + 1.8741e-8))
        * pressure
        + (-4.2393e-8 * t68 + 1.8932e-6) * ds
        + ((6.6228e-10 * t68 - 6.836e-8) * t68 + 8.5258e-6) * t68
        + 3.5803e-5
}

/// Potential temperature (ITS-90) referenced to `reference_pressure`
pub fn potential_temperature(
    salinity: f64,
    temperature: f64,
    pressure: f64,
    reference_pressure: f64,
) -> f64 {
    let mut p = pressure;
    let mut t = temperature * T68_FACTOR;
    let h = reference_pressure - pressure;

    let mut xk = h * adiabatic_lapse_rate(salinity, t, p);
    t += 0.5 * xk;
    let mut q = xk;

    p += 0.5 * h;
    xk = h * adiabatic_lapse_rate(salinity, t, p);
    t += 0.292_893_218_813_452 * (xk - q);
    q = 0.585_786_437_626_905 * xk + 0.121_320_343_559_643 * q;

    xk = h * adiabatic_lapse_rate(salinity, t, p);
    t += 1.707_106_781_186_548 * (xk - q);
    q = 3.414_213_562_373_095 * xk - 4.121_320_343_559_643 * q;

    p += 0.5 * h;
    xk = h * adiabatic_lapse_rate(salinity, t, p);
    let theta68 = t + (xk - 2.0 * q) / 6.0;

    theta68 / T68_FACTOR
}

/// Density of pure water (kg/m³) at IPTS-68 temperature
fn pure_water_density(t68: f64) -> f64 {
    999.842594
        + (6.793952e-2 + (-9.095290e-3 + (1.001685e-4 + (-1.120083e-6 + 6.536332e-9 * t68) * t68) * t68) * t68)
            * t68
}

/// One-atmosphere seawater density (kg/m³), ITS-90 temperature
pub fn density_at_surface(salinity: f64, temperature: f64) -> f64 {
    let t68 = temperature * T68_FACTOR;
    let s = salinity.max(0.0);

    let b = 0.824493 + (-4.0899e-3 + (7.6438e-5 + (-8.2467e-7 + 5.3875e-9 * t68) * t68) * t68) * t68;
    let c = -5.72466e-3 + (1.0227e-4 - 1.6546e-6 * t68) * t68;
    let d = 4.8314e-4;

    pure_water_density(t68) + b * s + c * s * s.sqrt() + d * s * s
}

/// Potential density anomaly sigma-theta (kg/m³ minus 1000) referenced to
/// the sea surface
pub fn potential_density_anomaly(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let theta = potential_temperature(salinity, temperature, pressure, 0.0);
    density_at_surface(salinity, theta) - 1000.0
}
