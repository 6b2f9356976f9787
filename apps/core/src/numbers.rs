pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    (end - start).mul_add(t, start)
}

/// Maps `value` from `[in_min, in_max]` onto `[out_min, out_max]` without clamping.
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Scales a unit sample in `[0, 1)` onto `[min, max)`.
pub fn random_between(unit: f64, min: f64, max: f64) -> f64 {
    unit.mul_add(max - min, min)
}

/// Inserts thousands separators into the integer part; the fraction is kept as is.
pub fn format_number(value: f64) -> String {
    let text = value.to_string();
    let (sign, unsigned) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (integer, fraction) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(integer, fraction)| (integer, Some(fraction)));

    if !integer.bytes().all(|b| b.is_ascii_digit()) {
        return text;
    }

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn lerp_hits_both_ends_and_midpoint() {
        assert_close(lerp(10.0, 20.0, 0.0), 10.0);
        assert_close(lerp(10.0, 20.0, 1.0), 20.0);
        assert_close(lerp(10.0, 20.0, 0.5), 15.0);
    }

    #[test]
    fn map_range_rescales_linearly() {
        assert_close(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_close(map_range(0.0, -1.0, 1.0, 0.0, 1.0), 0.5);
        assert_close(map_range(20.0, 0.0, 10.0, 0.0, 1.0), 2.0);
    }

    #[test]
    fn clamp_bounds_the_value() {
        assert_close(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_close(clamp(130.0, 0.0, 100.0), 100.0);
        assert_close(clamp(42.0, 0.0, 100.0), 42.0);
    }

    #[test]
    fn random_between_scales_unit_samples() {
        assert_close(random_between(0.0, 5.0, 15.0), 5.0);
        assert_close(random_between(0.5, 5.0, 15.0), 10.0);
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
        assert_eq!(format_number(-98_765.0), "-98,765");
        assert_eq!(format_number(12_345.678), "12,345.678");
    }
}
