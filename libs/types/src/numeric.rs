//! Token amounts
//!
//! Amounts are integers in the token's base units. The NEX token uses
//! 8 decimals, so one whole token is `10^8` base units.

/// Token amount in base units.
pub type Amount = u128;

/// Number of decimal places of the swapped token.
pub const TOKEN_DECIMALS: u32 = 8;

/// Base units in one whole token.
pub const ONE_TOKEN: Amount = 10u128.pow(TOKEN_DECIMALS);

/// Convert a whole-token count to base units.
pub const fn whole_tokens(count: u64) -> Amount {
    count as Amount * ONE_TOKEN
}
