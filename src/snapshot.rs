/*
 *  snapshot.rs
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
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};

/// Trading session state reported by the feed.
/// Anything the feed sends that we do not recognize reads as `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketStatus {
    Open,
    AfterMarket,
    #[default]
    Closed,
}

impl MarketStatus {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "OPEN" => MarketStatus::Open,
            "AFTER-MARKET" => MarketStatus::AfterMarket,
            _ => MarketStatus::Closed,
        }
    }
}

/// One holding as the feed reports it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Asset {
    pub symbol: String,
    /// Pre-formatted by the feed where it sends a string; numeric prices are
    /// formatted on ingest.
    pub price: String,
    /// Fraction of the portfolio, 0.0..=1.0.
    pub weight: f64,
}

/// The latest known full set of dashboard data.
///
/// Always fully defaulted: a partial payload produces a valid snapshot and
/// the renderer never special-cases "no data" beyond what the defaults
/// naturally draw (an empty history is just a bordered, empty chart).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub net_worth: String,
    pub change: String,
    pub market_status: MarketStatus,
    /// Oldest first.
    pub history: Vec<f64>,
    pub assets: Vec<Asset>,
    /// Momentum score in 0..=100, neutral 50 when history is too short.
    pub momentum: u8,
    pub last_updated: DateTime<Local>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            net_worth: "$0".to_string(),
            change: "+$0".to_string(),
            market_status: MarketStatus::Closed,
            history: Vec::new(),
            assets: Vec::new(),
            momentum: 50,
            last_updated: Local::now(),
        }
    }
}

/// Shared handle over the latest snapshot.
///
/// The fetch worker writes whole records; the render loop reads whole
/// copies. The lock is held only for the copy or the swap, never across a
/// network call or a draw call.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    inner: Arc<Mutex<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Snapshot::default())),
        }
    }

    /// Replace the stored snapshot as one atomic step.
    pub fn write(&self, snapshot: Snapshot) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = snapshot;
    }

    /// Independent copy of the latest snapshot; use it lock-free.
    pub fn read(&self) -> Snapshot {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
