use crate::TokenError;
use alloy_primitives::Address;
use std::str::FromStr;

/// Parse a 20-byte hex address.
///
/// The `0x` prefix is optional and letter case is ignored; checksums are not
/// enforced. Anything other than exactly 40 hex digits is rejected.
pub fn parse_address(input: &str) -> Result<Address, TokenError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if digits.len() != 40 {
        return Err(TokenError::InvalidAddress {
            input: input.to_string(),
            reason: format!("expected 40 hex digits, got {}", digits.len()),
        });
    }

    Address::from_str(digits).map_err(|e| TokenError::InvalidAddress {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
