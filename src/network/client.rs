use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::Block;

/// Path on a peer serving its full chain.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Deserialize)]
struct RemoteChain {
    chain: Vec<Block>,
}

/// Fetches candidate chains from registered peers.
#[derive(Debug, Clone)]
pub struct PeerClient {
    http: Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self, PeerError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// GET the chain of a single peer (`host[:port]`).
    pub async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
        let url = format!("http://{peer}{CHAIN_PATH}");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(PeerError::Status(response.status()));
        }
        let remote: RemoteChain = response.json().await?;
        debug!("peer {peer} reported {} blocks", remote.chain.len());
        Ok(remote.chain)
    }

    /// Fetch every peer's chain, in the given order. Unreachable peers and
    /// malformed responses are logged and left out.
    pub async fn fetch_all(&self, peers: &[String]) -> Vec<(String, Vec<Block>)> {
        let mut chains = Vec::with_capacity(peers.len());
        for peer in peers {
            match self.fetch_chain(peer).await {
                Ok(chain) => chains.push((peer.clone(), chain)),
                Err(e) => warn!("skipping peer {peer}: {e}"),
            }
        }
        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn unreachable_peer_is_skipped() {
        let client = PeerClient::new(Duration::from_millis(500)).unwrap();
        // Port 9 (discard) on loopback is expected to refuse the connection.
        let chains = client.fetch_all(&["127.0.0.1:9".to_string()]).await;
        assert!(chains.is_empty());
    }
}
