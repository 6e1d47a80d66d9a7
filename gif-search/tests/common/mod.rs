#![allow(dead_code)]

use async_trait::async_trait;
use gif_search::{FetchError, FetchResult, ResultItem, ResultsFetcher, SearchTerm};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, Once};
use tokio::sync::oneshot;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// The item a `FakeFetcher` returns for `term` unless told otherwise.
pub fn item_for(term: &str) -> ResultItem {
    ResultItem::new(
        format!("id-{}", term),
        term.to_string(),
        format!("https://media.example/{}.gif", term),
        100,
        100,
    )
}

/// Scriptable in-memory fetcher that records every call.
#[derive(Default)]
pub struct FakeFetcher {
    responses: Mutex<HashMap<String, Vec<ResultItem>>>,
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, term: &str, items: Vec<ResultItem>) {
        self.responses.lock().unwrap().insert(term.to_string(), items);
    }

    pub fn fail_on(&self, term: &str) {
        self.failing.lock().unwrap().insert(term.to_string());
    }

    pub fn recover(&self, term: &str) {
        self.failing.lock().unwrap().remove(term);
    }

    /// The next fetch of `term` waits until the returned sender fires (or is dropped).
    pub fn hold(&self, term: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(term.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, term: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|t| t.as_str() == term).count()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        while self.calls() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ResultsFetcher for FakeFetcher {
    fn provider_name(&self) -> String {
        "fake".to_string()
    }

    async fn fetch(&self, term: &SearchTerm) -> FetchResult<Vec<ResultItem>> {
        let key = term.as_str().to_string();
        self.calls.lock().unwrap().push(key.clone());

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.failing.lock().unwrap().contains(&key) {
            return Err(FetchError::Status { status: 503 });
        }

        let scripted = self.responses.lock().unwrap().get(&key).cloned();
        Ok(scripted.unwrap_or_else(|| vec![item_for(&key)]))
    }
}
