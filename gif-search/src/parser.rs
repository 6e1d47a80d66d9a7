use crate::types::{FetchResult, ProviderGif, ProviderResponse, ResultItem};
use std::collections::HashSet;
use tracing::{debug, info};

/// Maps the provider's search payload onto `ResultItem`s.
pub struct ResultParser {
    page_size: usize,
}

impl ResultParser {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    pub fn parse_response(&self, content: &str) -> FetchResult<Vec<ResultItem>> {
        debug!("Parsing search response ({} bytes)", content.len());

        let response: ProviderResponse = serde_json::from_str(content)?;
        let items = self.convert_to_result_items(response.data);

        info!("Parsed search response with {} results", items.len());
        Ok(items)
    }

    /// Provider order is kept. Repeated ids keep their first occurrence.
    pub fn convert_to_result_items(&self, gifs: Vec<ProviderGif>) -> Vec<ResultItem> {
        let mut seen_ids = HashSet::new();
        let mut items = Vec::with_capacity(gifs.len().min(self.page_size));

        for gif in gifs {
            if items.len() == self.page_size {
                break;
            }
            if !seen_ids.insert(gif.id.clone()) {
                debug!("Skipping duplicate result with id: {}", gif.id);
                continue;
            }

            let rendition = gif.images.downsized_medium;
            items.push(ResultItem {
                id: gif.id,
                title: gif.title,
                url: rendition.url,
                width: parse_dimension(rendition.width.as_ref()),
                height: parse_dimension(rendition.height.as_ref()),
            });
        }

        items
    }

    pub fn is_valid_response(content: &str) -> bool {
        serde_json::from_str::<ProviderResponse>(content).is_ok()
    }
}

/// Pixel sizes arrive as text ("480") or occasionally as numbers.
/// Anything that is not a non-negative integer maps to 0.
pub fn parse_dimension(value: Option<&serde_json::Value>) -> u32 {
    match value {
        Some(serde_json::Value::String(text)) => text.trim().parse::<u32>().unwrap_or(0),
        Some(serde_json::Value::Number(number)) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        _ => 0,
    }
}

