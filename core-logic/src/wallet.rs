//! Wallet address checks performed before any request is sent.

use crate::chain::{Chain, ChainFamily};
use crate::error::WalletError;

/// Check that `address` is well formed for the chain's family.
///
/// EVM: `0x` followed by 40 hex digits (checksum casing is not enforced).
/// Solana: base58 that decodes to a 32-byte public key.
pub fn validate_address(chain: Chain, address: &str) -> Result<(), WalletError> {
    let invalid = |reason: &str| WalletError::InvalidAddress {
        chain,
        address: address.to_string(),
        reason: reason.to_string(),
    };

    match chain.family() {
        ChainFamily::Evm => {
            let hex = address
                .strip_prefix("0x")
                .ok_or_else(|| invalid("missing 0x prefix"))?;
            if hex.len() != 40 {
                return Err(invalid("expected 40 hex digits"));
            }
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid("contains non-hex characters"));
            }
            Ok(())
        }
        ChainFamily::Solana => {
            let bytes = bs58::decode(address)
                .into_vec()
                .map_err(|e| invalid(&format!("not base58 ({})", e)))?;
            if bytes.len() != 32 {
                return Err(invalid(&format!(
                    "decodes to {} bytes, expected 32",
                    bytes.len()
                )));
            }
            Ok(())
        }
    }
}
