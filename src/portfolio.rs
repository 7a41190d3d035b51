/*
 *  portfolio.rs
 *
 *  NetWorS - worth watching
 *	(c) 2020-26 Stuart Hunter
 *
 *	TODO:
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use chrono::Local;
use flate2::read::GzDecoder;
use log::{error, info};
use reqwest::{header, Client};
use serde_json::Value;
use std::io::Read;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::momentum::momentum;
use crate::snapshot::{Asset, MarketStatus, Snapshot, SnapshotStore};

/// Everything that can go wrong on one fetch cycle. All of it is non-fatal:
/// the loop logs, keeps the last-known-good snapshot, and waits for the next
/// interval.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("feed answered HTTP {0}")]
    BadStatus(u16),
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the portfolio feed endpoint.
#[derive(Debug)]
pub struct PortfolioFeed {
    base_url: String,
    api_key: String,
    client: Client,
}

impl PortfolioFeed {
    pub fn new(base_url: String, api_key: String) -> Result<Self, FeedError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Accept-Encoding", header::HeaderValue::from_static("deflate, gzip"));
        headers.insert("Connection", header::HeaderValue::from_static("close"));

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(1500))
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// One request/decode cycle against the feed.
    ///
    /// Any non-success status is a failure; a success is always mapped into
    /// a fully-defaulted snapshot, however thin the payload.
    pub async fn fetch(&self) -> Result<Snapshot, FeedError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::BadStatus(status.as_u16()));
        }

        let raw = response.bytes().await?;

        // Some deployments hand back gzip regardless of headers; try that
        // first and fall back to plain text.
        let plain = {
            let mut decoder = GzDecoder::new(&raw[..]);
            let mut decoded = String::new();
            match decoder.read_to_string(&mut decoded) {
                Ok(_) => decoded,
                Err(_) => String::from_utf8_lossy(&raw).to_string(),
            }
        };

        let payload: Value = serde_json::from_str(&plain)?;
        Ok(map_payload(&payload))
    }

    /// Starts the fetch worker: fetch immediately, then sleep the interval
    /// between attempts. Successes replace the stored snapshot; failures are
    /// logged and swallowed. Stop via the returned channel.
    pub fn start_polling(
        self,
        store: SnapshotStore,
        every: Duration,
    ) -> (JoinHandle<()>, mpsc::Sender<()>) {
        let (stop_tx, mut stop_rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            loop {
                match self.fetch().await {
                    Ok(snapshot) => {
                        info!(
                            "portfolio feed updated: {} ({} samples)",
                            snapshot.net_worth,
                            snapshot.history.len()
                        );
                        store.write(snapshot);
                    }
                    Err(e) => error!("portfolio fetch failed: {}", e),
                }
                tokio::select! {
                    _ = tokio::time::sleep(every) => {}
                    _ = stop_rx.recv() => {
                        info!("portfolio polling received stop signal. Exiting.");
                        break;
                    }
                }
            }
        });

        (handle, stop_tx)
    }
}

/// Map a decoded payload into a snapshot, every field through a default.
///
/// A malformed or partial payload yields a valid snapshot, never an error;
/// the feed owns formatting (`net_worth` and `change` arrive pre-formatted).
pub fn map_payload(payload: &Value) -> Snapshot {
    let net_worth = payload["net_worth"].as_str().unwrap_or("$0").to_string();
    let change = payload["change"].as_str().unwrap_or("+$0").to_string();
    let market_status = MarketStatus::parse(payload["market_status"].as_str().unwrap_or(""));

    let history: Vec<f64> = payload["history"]
        .as_array()
        .map(|samples| samples.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();

    // Holdings arrive under "allocation" on newer feeds, "assets" on older
    // ones.
    let mut records = payload["allocation"].as_array();
    if records.is_none() {
        records = payload["assets"].as_array();
    }
    let assets = records
        .map(|list| list.iter().map(map_asset).collect())
        .unwrap_or_default();

    let score = momentum(&history);

    Snapshot {
        net_worth,
        change,
        market_status,
        history,
        assets,
        momentum: score,
        last_updated: Local::now(),
    }
}

fn map_asset(record: &Value) -> Asset {
    let symbol = record["symbol"].as_str().unwrap_or("?").to_string();

    // Price may arrive pre-formatted or as a bare number.
    let price = match record["price"].as_str() {
        Some(s) => s.to_string(),
        None => format!("${:.2}", record["price"].as_f64().unwrap_or(0.0)),
    };

    let mut weight = record["weight"].as_f64().unwrap_or(-999.0);
    if weight == -999.0 {
        weight = record["raw_pct"].as_f64().unwrap_or(0.0) / 100.0;
    }

    Asset {
        symbol,
        price,
        weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port.
    async fn one_shot_server(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 2048];
                let _ = socket.read(&mut request).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/portfolio", addr)
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let snap = map_payload(&json!({"net_worth": "$100"}));
        assert_eq!(snap.net_worth, "$100");
        assert_eq!(snap.change, "+$0");
        assert_eq!(snap.market_status, MarketStatus::Closed);
        assert!(snap.history.is_empty());
        assert!(snap.assets.is_empty());
        assert_eq!(snap.momentum, 50);
    }

    #[test]
    fn full_payload_maps_every_field() {
        let snap = map_payload(&json!({
            "net_worth": "$717,085",
            "change": "-$1,042",
            "market_status": "AFTER-MARKET",
            "history": [100.0, 101.5, 103.0],
            "allocation": [
                {"symbol": "VTI", "price": "$289.11", "weight": 0.5},
                {"symbol": "BND", "price": 73.456, "raw_pct": 20.0},
            ],
        }));
        assert_eq!(snap.change, "-$1,042");
        assert_eq!(snap.market_status, MarketStatus::AfterMarket);
        assert_eq!(snap.history, vec![100.0, 101.5, 103.0]);
        assert_eq!(snap.assets.len(), 2);
        assert_eq!(snap.assets[0].weight, 0.5);
        // Numeric price gets formatted, raw_pct scales down to a fraction.
        assert_eq!(snap.assets[1].price, "$73.46");
        assert!((snap.assets[1].weight - 0.2).abs() < 1e-9);
    }

    #[test]
    fn assets_key_is_accepted_as_fallback() {
        let snap = map_payload(&json!({
            "assets": [{"symbol": "VXUS", "price": "$61.20", "weight": 1.0}],
        }));
        assert_eq!(snap.assets[0].symbol, "VXUS");
    }

    #[test]
    fn non_numeric_history_entries_are_dropped() {
        let snap = map_payload(&json!({"history": [1.0, "oops", 2.0, null]}));
        assert_eq!(snap.history, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn bad_status_is_reported_and_store_untouched() {
        let url = one_shot_server(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let feed = PortfolioFeed::new(url, "k".to_string()).unwrap();

        let store = SnapshotStore::new();
        let before = store.read();

        match feed.fetch().await {
            Err(FeedError::BadStatus(500)) => {}
            other => panic!("expected BadStatus(500), got {:?}", other.map(|_| ())),
        }
        assert_eq!(store.read(), before);
    }

    #[tokio::test]
    async fn success_response_maps_into_a_snapshot() {
        let body = r#"{"net_worth":"$42","history":[1.0,2.0]}"#;
        let response: &'static str = Box::leak(
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .into_boxed_str(),
        );
        let url = one_shot_server(response).await;
        let feed = PortfolioFeed::new(url, "k".to_string()).unwrap();

        let snap = feed.fetch().await.unwrap();
        assert_eq!(snap.net_worth, "$42");
        assert_eq!(snap.history, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        // Reserved TEST-NET-1 address; nothing answers.
        let feed =
            PortfolioFeed::new("http://192.0.2.1:9/portfolio".to_string(), "k".to_string())
                .unwrap();
        match feed.fetch().await {
            Err(FeedError::Network(_)) => {}
            other => panic!("expected Network error, got {:?}", other.map(|_| ())),
        }
    }
}
