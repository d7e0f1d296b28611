//! Number formatting helpers for tables and chart labels.

/// Format a number with a thin thousands separator (space) and the
/// given number of decimal places.
pub fn format_number_with_decimals(value: f64, decimals: u8) -> String {
    let formatted = match decimals {
        0 => format!("{:.0}", value),
        1 => format!("{:.1}", value),
        2 => format!("{:.2}", value),
        3 => format!("{:.3}", value),
        _ => format!("{:.2}", value),
    };

    let parts: Vec<&str> = formatted.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1);

    // Insert a space every 3 digits from the end of the integer part
    let mut result = String::new();
    let chars: Vec<char> = integer_part.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 && *c != '-' {
            result.push(' ');
        }
        result.push(*c);
    }
    let formatted_integer = result.chars().rev().collect::<String>();

    match decimal_part {
        Some(d) => format!("{}.{}", formatted_integer, d),
        None => formatted_integer,
    }
}

/// Two decimals, thousands-separated: the default for sales amounts.
pub fn format_amount(value: f64) -> String {
    format_number_with_decimals(value, 2)
}

/// Integers keep no decimals; everything else gets two.
pub fn format_cell_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format_number_with_decimals(value, 0)
    } else {
        format_number_with_decimals(value, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_decimals() {
        assert_eq!(format_number_with_decimals(1234.567, 2), "1 234.57");
        assert_eq!(format_number_with_decimals(1234567.0, 0), "1 234 567");
        assert_eq!(format_number_with_decimals(-9876.5, 1), "-9 876.5");
        assert_eq!(format_number_with_decimals(999.0, 0), "999");
    }

    #[test]
    fn test_format_cell_number() {
        assert_eq!(format_cell_number(2020.0), "2 020");
        assert_eq!(format_cell_number(12.5), "12.50");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234567.89), "1 234 567.89");
    }
}
