use chrono::Utc;

// Minimum length of a non-0x address worth a price lookup
const MIN_PLAIN_ADDRESS_LEN: usize = 30;

// Check whether an address looks like a real contract address
pub fn is_plausible_address(address: &str) -> bool {
    address.starts_with("0x") || address.len() > MIN_PLAIN_ADDRESS_LEN
}

// Format USD price with 8 decimals
pub fn format_price(price: f64) -> String {
    format!("${:.8}", price)
}

// Format percent change with an explicit sign for non-negative values
pub fn format_change(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

// Round to a fixed number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// Current unix time in milliseconds
pub fn unix_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.chars().count() <= 10 {
        return address.to_string();
    }

    let start: String = address.chars().take(5).collect();
    let end: String = address
        .chars()
        .rev()
        .take(5)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_address() {
        assert!(is_plausible_address("0xabc"));
        assert!(is_plausible_address("7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr"));
        assert!(!is_plausible_address("abc"));
        assert!(!is_plausible_address(""));
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(1.234), "+1.23%");
        assert_eq!(format_change(0.0), "+0.00%");
        assert_eq!(format_change(-4.5), "-4.50%");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.00001234), "$0.00001234");
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(shorten_address("0x1234"), "0x1234");
        assert_eq!(
            shorten_address("0x6982508145454Ce325dDbE47a25d4ec3d2311933"),
            "0x698...11933"
        );
    }
}
