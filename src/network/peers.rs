use std::collections::BTreeSet;
use url::Url;

use crate::error::LedgerError;

/// Normalize a URL-like peer address into `host` or `host:port`.
/// Addresses without a scheme are read as `http://`.
pub fn normalize_address(address: &str) -> Result<String, LedgerError> {
    let trimmed = address.trim();
    let invalid = || LedgerError::InvalidPeerAddress(address.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let raw = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let parsed = Url::parse(&raw).map_err(|_| invalid())?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(invalid)?;
    // `Url::port` hides a port equal to the scheme default; keep it if written.
    Ok(match parsed.port().or_else(|| explicit_port(&raw)) {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Port written in the authority of `raw` (`scheme://[user@]host[:port]/...`).
fn explicit_port(raw: &str) -> Option<u16> {
    let rest = raw.split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    // Skip past an IPv6 literal so its colons are not read as a port separator.
    let after_host = host_port.rsplit_once(']').map_or(host_port, |(_, tail)| tail);
    after_host.rsplit_once(':')?.1.parse().ok()
}

/// The set of known peers, stored normalized and deduplicated.
#[derive(Debug, Default, Clone)]
pub struct PeerRegistry {
    nodes: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a peer; registering the same location twice is a no-op.
    /// Returns the normalized form.
    pub fn register(&mut self, address: &str) -> Result<String, LedgerError> {
        let node = normalize_address(address)?;
        self.nodes.insert(node.clone());
        Ok(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sorted list of peers.
    pub fn to_vec(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }
}
