/// Round to two decimal places, the precision every figure is shown with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-minute rate of `count` over `elapsed_minutes`, zero when no time has passed.
pub fn per_minute(count: usize, elapsed_minutes: f64) -> f64 {
    match elapsed_minutes {
        positive if positive > 0.0 => round2(count as f64 / positive),
        _ => 0.0,
    }
}
