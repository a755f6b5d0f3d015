use std::fmt;

/// Money is stored as integer cents so debt arithmetic never drifts.
/// R$ 30.00 = 3000 cents.
pub type Cents = i64;

/// Format cents as a two-decimal currency string.
/// Example: 3000 -> "30.00", 5 -> "0.05"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse an operator-typed decimal string into cents.
/// Amounts in this ledger are always non-negative; a leading minus is rejected.
/// Example: "30.00" -> 3000, "12.5" -> 1250, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if input.starts_with('-') {
        return Err(ParseCentsError::Negative);
    }

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((u, d)) => (u, d),
        None => (input, ""),
    };

    if decimal_str.contains('.') {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    // Pad or truncate the decimal part to exactly 2 digits.
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        _ => decimal_str[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    Ok(units * 100 + decimal_cents)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Negative,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Negative => write!(f, "amount cannot be negative"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
