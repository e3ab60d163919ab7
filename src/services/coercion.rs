//! Lenient numeric coercion for form fields.
//!
//! Mirrors the browser's `parseInt` / `parseFloat`: leading whitespace is
//! skipped, the longest numeric prefix wins, and anything without one is
//! not-a-number rather than an error.

/// `None` is not-a-number. Decimal, or hex with a `0x` prefix.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = split_sign(s);

    let (digits, radix) = match rest.get(..2) {
        Some("0x") | Some("0X") => (take_while(&rest[2..], |c| c.is_ascii_hexdigit()), 16),
        _ => (take_while(rest, |c| c.is_ascii_digit()), 10),
    };
    if digits.is_empty() {
        return None;
    }

    // Out-of-range magnitudes are not-a-number here, unlike parseInt.
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Returns NaN when there is no numeric prefix.
pub fn parse_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let (negative, rest) = split_sign(s);
    let sign = if negative { -1.0 } else { 1.0 };

    if rest.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = rest.as_bytes();
    let mut end = 0;
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    rest[..end]
        .parse::<f64>()
        .map(|v| sign * v)
        .unwrap_or(f64::NAN)
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> &str {
    let end = s.find(|c: char| !pred(c)).unwrap_or(s.len());
    &s[..end]
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
