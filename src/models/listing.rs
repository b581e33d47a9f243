use serde::{Deserialize, Serialize};

/// A candidate restaurant listing returned by a search provider
///
/// Order within a result list is the provider's relevance order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub link: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
        }
    }
}

// ============================================================================
// Naver Search API Types
// ============================================================================

/// Raw response from the Naver web search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NaverSearchResponse {
    #[serde(default)]
    pub items: Vec<NaverItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NaverItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
}

/// Removes the `<b>` highlight markup Naver wraps around matched terms
fn strip_highlight(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}

impl From<NaverItem> for SearchResult {
    fn from(item: NaverItem) -> Self {
        SearchResult {
            title: strip_highlight(&item.title),
            description: strip_highlight(&item.description),
            link: item.link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naver_item_strips_highlight_markup() {
        let item = NaverItem {
            title: "<b>강남</b> 한식 맛집".to_string(),
            description: "비 오는 날 <b>한식</b> 한 상".to_string(),
            link: "https://example.com/a".to_string(),
        };

        let result: SearchResult = item.into();
        assert_eq!(result.title, "강남 한식 맛집");
        assert_eq!(result.description, "비 오는 날 한식 한 상");
        assert_eq!(result.link, "https://example.com/a");
    }

    #[test]
    fn test_naver_response_without_items() {
        let response: NaverSearchResponse =
            serde_json::from_str(r#"{"lastBuildDate":"x","total":0}"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_naver_response_deserialization() {
        let json = r#"{
            "total": 2,
            "items": [
                {"title": "<b>A</b>", "description": "first", "link": "https://a"},
                {"title": "B", "description": "second", "link": "https://b"}
            ]
        }"#;

        let response: NaverSearchResponse = serde_json::from_str(json).unwrap();
        let results: Vec<SearchResult> = response.items.into_iter().map(Into::into).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "A");
        assert_eq!(results[1].link, "https://b");
    }
}
