use thiserror::Error;

/// Monetary amounts are integer minor units (sen / cents) to keep sums exact.
/// 1 unit = 100 minor units, so Rp 1.500,00 = 150000.
pub type Cents = i64;

/// Format minor units as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format minor units as rupiah with zero decimals and `.` thousands separators.
/// Rounds half away from zero.
/// Example: 123450050 -> "Rp 1.234.501", -99 -> "-Rp 1"
pub fn format_rupiah(cents: Cents) -> String {
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents + 50) / 100;
    let sign = if cents < 0 && units > 0 { "-" } else { "" };
    format!("{}Rp {}", sign, group_thousands(units))
}

/// Sum amounts, clamping at the `Cents` range instead of overflowing.
pub fn sum_cents(amounts: impl IntoIterator<Item = Cents>) -> Cents {
    amounts.into_iter().fold(0, Cents::saturating_add)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Parse a decimal string into minor units.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
///
/// More than two decimal places are truncated. Thousands separators are not
/// accepted; import files carry plain decimals.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if digits.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (units_str, fraction_str) = digits.split_once('.').unwrap_or((digits, ""));
    if (units_str.is_empty() && fraction_str.is_empty())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        parse_digits(units_str, input)?
    };

    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => parse_digits(fraction_str, input)? * 10,
        _ => parse_digits(&fraction_str[..2], input)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(|| ParseCentsError::Overflow(input.to_string()))?;
    Ok(if negative { -cents } else { cents })
}

fn parse_digits(part: &str, input: &str) -> Result<i64, ParseCentsError> {
    if !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }
    part.parse()
        .map_err(|_| ParseCentsError::Overflow(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("empty amount")]
    Empty,

    #[error("invalid money format: {0}")]
    InvalidFormat(String),

    #[error("amount out of range: {0}")]
    Overflow(String),
}
