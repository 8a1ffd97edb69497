//! Shared test fixtures
//!
//! Item bodies shaped like the photo API, canned responses, and a scripted
//! `PageApi` whose answers can be swapped between calls.

use crate::api::PageApi;
use crate::error::{Error, Result};
use crate::http::RawResponse;
use crate::model::Item;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// JSON record for an item with the given id
pub fn item_value(id: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2019-06-14T11:19:39-04:00",
        "updated_at": "2019-06-15T01:06:43-04:00",
        "width": 2082,
        "height": 3879,
        "color": "#8CCEE8",
        "description": null,
        "urls": {
            "raw": format!("https://images.example.com/{id}/raw"),
            "full": format!("https://images.example.com/{id}/full"),
            "regular": format!("https://images.example.com/{id}/regular"),
            "small": format!("https://images.example.com/{id}/small"),
            "thumb": format!("https://images.example.com/{id}/thumb")
        }
    })
}

/// Bare JSON array body holding one record per id
pub fn page_body(ids: &[&str]) -> String {
    Value::Array(ids.iter().map(|id| item_value(id)).collect()).to_string()
}

/// Decoded items for the given ids, in order
pub fn expected_items(ids: &[&str]) -> Vec<Item> {
    ids.iter()
        .map(|id| serde_json::from_value(item_value(id)).unwrap())
        .collect()
}

/// 200 response carrying `ids` and, when given, the total page count
pub fn ok_page(ids: &[&str], total_pages: Option<u32>) -> RawResponse {
    let response = RawResponse::new(200, page_body(ids));
    match total_pages {
        Some(total) => response.with_header("X-Total", total.to_string()),
        None => response,
    }
}

/// Completed response with a failing status
pub fn error_response(status: u16) -> RawResponse {
    RawResponse::new(status, "OAuth error")
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(RawResponse),
    Unreachable,
}

/// `PageApi` answering from a per-page script
///
/// A page with no script entry fails like an unreachable host. When built
/// with [`ScriptedApi::gated`], every call waits for a permit released by
/// [`ScriptedApi::release`] before answering.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    script: Mutex<HashMap<u32, Scripted>>,
    calls: Mutex<Vec<(u32, u32)>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedApi {
    /// Empty script; every page is unreachable
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty script whose calls block until released
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Script where page `n` (1-based) holds `pages[n - 1]` and reports
    /// `pages.len()` as the total
    pub fn paged(pages: &[&[&str]]) -> Self {
        let api = Self::new();
        api.script_pages(pages);
        api
    }

    /// Replace every page with the given contents
    pub fn script_pages(&self, pages: &[&[&str]]) {
        let total = pages.len() as u32;
        for (index, ids) in pages.iter().enumerate() {
            self.respond(index as u32 + 1, ok_page(ids, Some(total)));
        }
    }

    /// Answer `page` with `response`
    pub fn respond(&self, page: u32, response: RawResponse) {
        self.script
            .lock()
            .unwrap()
            .insert(page, Scripted::Respond(response));
    }

    /// Make `page` fail without a response
    pub fn unreachable(&self, page: u32) {
        self.script.lock().unwrap().insert(page, Scripted::Unreachable);
    }

    /// Let `count` gated calls through
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Every `(page, page_size)` requested so far
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }

    /// Pages requested so far
    pub fn pages_requested(&self) -> Vec<u32> {
        self.calls().into_iter().map(|(page, _)| page).collect()
    }
}

#[async_trait]
impl PageApi for ScriptedApi {
    async fn get_page(&self, index: u32, page_size: u32) -> Result<RawResponse> {
        self.calls.lock().unwrap().push((index, page_size));

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let scripted = self.script.lock().unwrap().get(&index).cloned();
        match scripted {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Unreachable) | None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("page {index} unreachable"),
            ))),
        }
    }
}

/// Poll `condition` until it holds, failing the test after one second
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
