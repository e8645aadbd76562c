//! Contract bindings for the token client.
//!
//! The ERC20 interface is generated with alloy's `sol!` macro; callers never
//! hand-encode calldata.

pub mod token;

pub use token::IERC20;
