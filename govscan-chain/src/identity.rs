//! ENS reverse resolution of a display name for an address.
//!
//! Resolution failure is never fatal: every path that cannot produce a name
//! returns `None` and the caller falls back to the raw address.

use log::{debug, warn};
use primitive_types::{H160, H256};

use crate::abi;
use crate::reader::ChainReader;

impl ChainReader {
    /// Looks up the reverse record for `account` on the ENS registry.
    /// Returns `None` when no resolver or name is set, or on any transport
    /// or decode failure.
    pub async fn resolve_display_name(&self, account: H160) -> Option<String> {
        let reverse_name = format!("{}.addr.reverse", hex::encode(account.as_bytes()));
        let node = abi::namehash(&reverse_name);

        let resolver_call = abi::call_data(abi::ENS_RESOLVER_SIGNATURE, &[node]);
        let resolver_word = match self.eth_call(self.ens_registry(), resolver_call, None).await {
            Ok(bytes) if bytes.len() >= 32 => H256::from_slice(&bytes[..32]),
            Ok(_) => return None,
            Err(err) => {
                warn!("ens registry lookup failed for {account:#x}: {err}");
                return None;
            }
        };
        let resolver = H160::from_slice(&resolver_word.as_bytes()[12..]);
        if resolver.is_zero() {
            debug!("no reverse resolver set for {account:#x}");
            return None;
        }

        let name_call = abi::call_data(abi::ENS_NAME_SIGNATURE, &[node]);
        let name_bytes = match self.eth_call(resolver, name_call, None).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("ens name() failed for {account:#x}: {err}");
                return None;
            }
        };
        match abi::decode_string(&name_bytes) {
            Ok(name) if !name.is_empty() => Some(name),
            Ok(_) => None,
            Err(err) => {
                warn!("undecodable ens name for {account:#x}: {err}");
                None
            }
        }
    }
}
