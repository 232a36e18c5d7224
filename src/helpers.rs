// Module for small helper functions

// Converts milliseconds to clock cycles
pub fn ms_to_cycles(millis: u64, clock_mhz: u64) -> u64 {
    millis * clock_mhz * 1000
}

// Splits a time of day into the six tube digits, hours on NX1 and NX2
// Each field is reduced modulo 100 so the result always fits two tubes
// E.g. time_digits(9, 5, 42) -> [0, 9, 0, 5, 4, 2]
pub fn time_digits(hour: u32, minute: u32, second: u32) -> [u8; 6] {
    let (h1, h2) = split_two(hour);
    let (m1, m2) = split_two(minute);
    let (s1, s2) = split_two(second);
    [h1, h2, m1, m2, s1, s2]
}

fn split_two(value: u32) -> (u8, u8) {
    let value = value % 100;
    ((value / 10) as u8, (value % 10) as u8)
}
