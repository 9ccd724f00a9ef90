//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use osrs_price_history::clock::ManualClock;
use osrs_price_history::client::PriceHistoryClient;
use osrs_price_history::error::HttpError;
use osrs_price_history::shared::ItemId;
use osrs_price_history::source::PriceSource;

pub const T0: i64 = 1_700_000_000;

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
}

pub fn item(id: u32) -> ItemId {
    ItemId::new(id).unwrap()
}

/// A `PriceSource` that replays scripted replies in order and counts calls.
/// Once the script is exhausted every call times out.
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Result<String, HttpError>>>,
    calls: AtomicUsize,
    requested: Mutex<Vec<ItemId>>,
    delay: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Result<String, HttpError>>) -> Arc<Self> {
        Self::with_delay(replies, None)
    }

    /// Each call sleeps for `delay` before replying.
    pub fn slow(replies: Vec<Result<String, HttpError>>, delay: Duration) -> Arc<Self> {
        Self::with_delay(replies, Some(delay))
    }

    fn with_delay(replies: Vec<Result<String, HttpError>>, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<ItemId> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch_timeseries(&self, item_id: ItemId) -> Result<String, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(item_id);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HttpError::Timeout))
    }
}

/// Array-shaped body from `(timestamp, high, low)` triples.
pub fn array_body(points: &[(i64, u64, u64)]) -> Result<String, HttpError> {
    let data: Vec<Value> = points
        .iter()
        .map(|(ts, high, low)| {
            json!({
                "timestamp": ts,
                "avgHighPrice": high,
                "avgLowPrice": low,
                "highPriceVolume": 10,
                "lowPriceVolume": 20
            })
        })
        .collect();
    Ok(json!({ "data": data, "itemId": 4151 }).to_string())
}

pub fn server_error() -> Result<String, HttpError> {
    Err(HttpError::Status {
        status: 503,
        body: "maintenance".into(),
    })
}

pub fn client_with(source: Arc<ScriptedSource>) -> (PriceHistoryClient, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(at(T0)));
    let client = PriceHistoryClient::builder()
        .source(source)
        .clock(clock.clone())
        .build()
        .expect("client should build");
    (client, clock)
}
