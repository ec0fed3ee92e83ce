/// Group the integer part with commas: `10950.5` → `"10,950.5"`.
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Whole count with separators, rounding to the nearest integer.
pub fn count(value: f64) -> String {
    thousands(value.round(), 0)
}

/// Count rendered as millions: `1_234_567` → `"1.23M"`.
pub fn millions(value: f64, decimals: usize) -> String {
    format!("{:.*}M", decimals, value / 1_000_000.0)
}

/// Expenditure (already in millions) as `AU$203,200M`.
pub fn aud_millions(value: f64) -> String {
    format!("AU${}M", thousands(value, decimals_of(value)))
}

/// Axis tick currency label: `$200,000M`.
pub fn tick_currency(value: f64) -> String {
    format!("${}M", thousands(value, decimals_of(value)))
}

/// Tick label with the precision implied by the tick step.
pub fn tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    thousands(value, decimals)
}

/// Shortest decimal count (max 3) that represents `value` without loss.
fn decimals_of(value: f64) -> usize {
    (0..3)
        .find(|&d| {
            let scale = 10f64.powi(d as i32);
            ((value * scale).round() - value * scale).abs() < 1e-9
        })
        .unwrap_or(3)
}
