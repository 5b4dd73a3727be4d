/// Format a value in compact form (e.g., 2.1M, 450K, 12.3, 0.0042)
pub fn format_compact(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000_000.0 {
        format!("{}{:.1}B", sign, abs_value / 1_000_000_000.0)
    } else if abs_value >= 1_000_000.0 {
        format!("{}{:.1}M", sign, abs_value / 1_000_000.0)
    } else if abs_value >= 10_000.0 {
        format!("{}{:.0}K", sign, abs_value / 1_000.0)
    } else if abs_value >= 1.0 || abs_value == 0.0 {
        format!("{}{:.2}", sign, abs_value)
    } else {
        // Keep three significant figures for small magnitudes
        let decimals = (2.0 - abs_value.log10().floor()) as usize;
        format!("{}{:.*}", sign, decimals, abs_value)
    }
}

/// Format a share already expressed in percent
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a fraction in `[0, 1]` as a percentage
pub fn format_fraction(value: f64) -> String {
    format_percent(value * 100.0)
}

/// Format an optional value, using "n/a" for a missing one
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_compact)
}
