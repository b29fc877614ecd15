//! CPF (Brazilian taxpayer ID) checksum validation and formatting.

use serde::Serializer;

/// Strip every non-digit character.
pub fn unformat(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Check the two verification digits of a CPF.
///
/// Accepts formatted (`529.982.247-25`) or bare (`52998224725`) input.
/// Sequences of a single repeated digit are rejected even though their
/// checksum matches.
pub fn is_valid(raw: &str) -> bool {
    let digits: Vec<u32> = unformat(raw)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 11 {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    digits[9] == check_digit(&digits[..9], 10)
        && digits[10] == check_digit(&digits[..10], 11)
}

/// Weighted-sum verification digit: weights count down from
/// `first_weight` to 2, remainder under 2 collapses to 0.
fn check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (first_weight - i as u32))
        .sum();

    match sum % 11 {
        remainder if remainder < 2 => 0,
        remainder => 11 - remainder,
    }
}

/// Reassemble the digits as `NNN.NNN.NNN-NN`.
///
/// Input without exactly 11 digits is returned stripped but unformatted.
pub fn format(raw: &str) -> String {
    let digits = unformat(raw);
    if digits.len() != 11 {
        return digits;
    }

    format!(
        "{}.{}.{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    )
}

/// Serde helper rendering a stored (bare) CPF in its formatted shape.
pub fn serialize_formatted<S>(cpf: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(cpf))
}
