//! Microbenchmarks over the literal shapes the parser is tuned for, from
//! bare zero up to 19-digit significands and hex literals.

use divan::black_box;

fn main() {
    divan::main();
}

#[divan::bench]
fn zero() -> f64 {
    faf::parse_f64(black_box("0")).unwrap()
}

#[divan::bench]
fn one_point_zero() -> f64 {
    faf::parse_f64(black_box("1.0")).unwrap()
}

#[divan::bench]
fn three_digits() -> f64 {
    faf::parse_f64(black_box("365")).unwrap()
}

#[divan::bench]
fn three_digits_with_point() -> f64 {
    faf::parse_f64(black_box("3.65")).unwrap()
}

#[divan::bench]
fn canada_coordinate() -> f64 {
    faf::parse_f64(black_box("-65.613616999999977")).unwrap()
}

#[divan::bench]
fn seventeen_digits_with_exp() -> f64 {
    faf::parse_f64(black_box("1234567.8901234567e89")).unwrap()
}

#[divan::bench]
fn nineteen_digits_without_exp() -> f64 {
    faf::parse_f64(black_box("1234567890123456789")).unwrap()
}

#[divan::bench]
fn nineteen_digits_with_exp() -> f64 {
    faf::parse_f64(black_box("1.234567890123456789e123")).unwrap()
}

#[divan::bench]
fn fourteen_hex_digits_with_exp() -> f64 {
    faf::parse_f64(black_box("0x123456789abcdep-45")).unwrap()
}

// Baseline: the host converter on the same hot-path input.
#[divan::bench]
fn reference_canada_coordinate() -> f64 {
    black_box("-65.613616999999977").parse().unwrap()
}
