//! Response envelope returned for a wells query

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WellsResponse {
    /// Executed statement with bound values inlined
    pub statement: String,
    pub total: i64,
    pub chunk: i64,
    pub page: i64,
    pub page_count: i64,
    /// `[latitude, longitude]` pairs
    #[schema(value_type = Vec<Vec<f32>>)]
    pub data: Vec<[f32; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let response = WellsResponse {
            statement: "SELECT 1".into(),
            total: 2,
            chunk: 2,
            page: 1,
            page_count: 1,
            data: vec![[53.5, -113.25], [49.0, -97.5]],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statement": "SELECT 1",
                "total": 2,
                "chunk": 2,
                "page": 1,
                "pageCount": 1,
                "data": [[53.5, -113.25], [49.0, -97.5]]
            })
        );
    }
}
