//! Format - Display Formatting for KPIs and Timestamps
//!
//! German number conventions: `.` groups thousands, `,` separates decimals.

use chrono::{DateTime, Local};

use crate::domain::calculation::KeyFigure;

/// Format a local datetime for display
pub fn format_datetime(dt: &DateTime<Local>) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

/// Format a number with thousand separators and fixed decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let len = int_part.len();
    let mut result = String::with_capacity(len + len / 3 + decimals + 2);
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        result.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push('.');
        }
        result.push(c);
    }
    if let Some(frac) = frac_part {
        result.push(',');
        result.push_str(frac);
    }

    result
}

/// Format an amount in euros
pub fn format_currency(value: f64) -> String {
    format!("{} €", format_number(value, 2))
}

/// Render a key figure's value with its unit
pub fn format_key_figure(figure: &KeyFigure) -> String {
    let decimals = match figure.unit.as_str() {
        "€" => 2,
        "kWh" | "kg/Jahr" => 0,
        _ => 1,
    };
    format!("{} {}", format_number(figure.value, decimals), figure.unit)
}

/// Format bytes as human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_use_german_separators() {
        assert_eq!(format_number(12345.678, 2), "12.345,68");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1_000_000.0, 0), "1.000.000");
        assert_eq!(format_number(-1234.5, 1), "-1.234,5");
        assert_eq!(format_number(-0.001, 1), "0,0");
    }

    #[test]
    fn currency_and_key_figures() {
        assert_eq!(format_currency(18500.0), "18.500,00 €");

        let figure = KeyFigure {
            title: "Jahresproduktion".into(),
            value: 9310.4,
            unit: "kWh".into(),
            icon: "mdi-lightning-bolt",
            color: "warning",
        };
        assert_eq!(format_key_figure(&figure), "9.310 kWh");
    }

    #[test]
    fn bytes_scale() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }
}
