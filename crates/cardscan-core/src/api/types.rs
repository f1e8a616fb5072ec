//! API state and wire types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::extract::ContactParser;
use crate::models::config::CardscanConfig;
use crate::ocr::OcrEngine;
use crate::store::{CardStore, Page};

/// Shared state of the API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<CardscanConfig>,
    pub engine: Arc<dyn OcrEngine>,
    pub store: Arc<dyn CardStore>,
    pub parser: Arc<ContactParser>,
}

impl ApiState {
    pub fn new(
        config: CardscanConfig,
        engine: Arc<dyn OcrEngine>,
        store: Arc<dyn CardStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            store,
            parser: Arc::new(ContactParser::new()),
        }
    }
}

/// Query of `GET /cards`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Resolve against the configured default and maximum page size.
    pub fn to_page(&self, default_limit: u32, max_limit: u32) -> Page {
        Page::new(self.page.unwrap_or(1), self.limit.unwrap_or(default_limit))
            .clamp_limit(max_limit)
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
