use async_trait::async_trait;
use common::io::drom::{Part, SearchQuery};
use requester::drom::{DromRequesterExt, RequesterError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) fn part(title: &str) -> Part {
    Part {
        title: title.to_string(),
        brand: "B".to_string(),
        price: "10".to_string(),
        location: "L".to_string(),
        date: "D".to_string(),
        image_url: "u".to_string(),
        link: "h".to_string(),
    }
}

#[derive(Clone)]
struct Scripted {
    delay: Duration,
    result: Result<Vec<Part>, u16>,
}

/// Answers by search string. Unscripted queries get an empty list at once.
#[derive(Clone, Default)]
pub(crate) struct ScriptedRequester {
    scripts: Arc<HashMap<String, Scripted>>,
    requested: Arc<Mutex<Vec<SearchQuery>>>,
}

impl ScriptedRequester {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `Err(status)` is answered with [`RequesterError::Status`].
    pub(crate) fn with(
        mut self,
        search_string: &str,
        delay_ms: u64,
        result: Result<Vec<Part>, u16>,
    ) -> Self {
        Arc::make_mut(&mut self.scripts).insert(
            search_string.to_string(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                result,
            },
        );
        self
    }

    pub(crate) fn requested(&self) -> Vec<SearchQuery> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DromRequesterExt for ScriptedRequester {
    async fn search_parts(&self, query: &SearchQuery) -> Result<Vec<Part>, RequesterError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(query.clone());
        }
        let scripted = self
            .scripts
            .get(&query.search_string)
            .cloned()
            .unwrap_or(Scripted {
                delay: Duration::ZERO,
                result: Ok(vec![]),
            });

        tokio::time::sleep(scripted.delay).await;
        scripted.result.map_err(RequesterError::Status)
    }
}
