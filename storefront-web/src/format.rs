/// Render cents as a decimal amount, e.g. `1234` as `12.34`.
#[must_use]
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::format_price;

    #[test]
    fn formats_whole_and_fractional_parts() {
        assert_eq!(format_price(0), "0.00");
        assert_eq!(format_price(890), "8.90");
        assert_eq!(format_price(12_345), "123.45");
        assert_eq!(format_price(-150), "-1.50");
    }
}
