//! Table listing response model.
//!
//! The `getStatsList` JSON response nests its results under
//! `GET_STATS_LIST.DATALIST_INF`. Two quirks need handling: `TABLE_INF`
//! collapses to a single object when exactly one table matches, and
//! numeric fields arrive as either JSON numbers or numeric strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;

/// One table from the listing, reduced to what downloading needs.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    /// Table identifier (`statsDataId` for data requests).
    pub id: String,
    /// Human-readable table name.
    pub name: String,
    /// Total row count, driving pagination.
    pub total_rows: u64,
}

#[derive(Debug, Deserialize)]
struct StatsListResponse {
    #[serde(rename = "GET_STATS_LIST")]
    get_stats_list: GetStatsList,
}

#[derive(Debug, Deserialize)]
struct GetStatsList {
    #[serde(rename = "DATALIST_INF")]
    datalist_inf: DatalistInf,
}

#[derive(Debug, Deserialize)]
struct DatalistInf {
    #[serde(rename = "NUMBER", deserialize_with = "u64_lenient", default)]
    number: u64,
    #[serde(rename = "TABLE_INF", default)]
    table_inf: Option<OneOrMany<TableInf>>,
}

/// `TABLE_INF` is an array for many results, a bare object for one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct TableInf {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "OVERALL_TOTAL_NUMBER", deserialize_with = "u64_lenient")]
    overall_total_number: u64,
    #[serde(rename = "TITLE_SPEC")]
    title_spec: TitleSpec,
}

#[derive(Debug, Deserialize)]
struct TitleSpec {
    #[serde(rename = "TABLE_NAME")]
    table_name: String,
}

/// Accepts a JSON number or a numeric string.
fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Extracts the table list from a `getStatsList` JSON response.
///
/// Zero matches produce an empty vector, not an error.
///
/// # Errors
///
/// Returns [`ApiError::Listing`] when the response does not have the
/// expected shape.
pub fn parse_table_list(value: &Value) -> Result<Vec<TableInfo>, ApiError> {
    let response: StatsListResponse =
        serde_json::from_value(value.clone()).map_err(|e| ApiError::listing(e.to_string()))?;
    let datalist = response.get_stats_list.datalist_inf;

    if datalist.number == 0 {
        debug!("listing matched no tables");
        return Ok(Vec::new());
    }

    let Some(table_inf) = datalist.table_inf else {
        return Err(ApiError::listing(
            "DATALIST_INF.TABLE_INF missing despite nonzero NUMBER",
        ));
    };

    let tables = table_inf
        .into_vec()
        .into_iter()
        .map(|t| TableInfo {
            id: t.id,
            name: t.title_spec.table_name,
            total_rows: t.overall_total_number,
        })
        .collect();
    Ok(tables)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_table_list_array() {
        let value = json!({
            "GET_STATS_LIST": {
                "DATALIST_INF": {
                    "NUMBER": 2,
                    "TABLE_INF": [
                        {
                            "@id": "0000010101",
                            "OVERALL_TOTAL_NUMBER": 250000,
                            "TITLE_SPEC": { "TABLE_NAME": "人口推計" }
                        },
                        {
                            "@id": "0000010102",
                            "OVERALL_TOTAL_NUMBER": "99",
                            "TITLE_SPEC": { "TABLE_NAME": "世帯数" }
                        }
                    ]
                }
            }
        });

        let tables = parse_table_list(&value).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].id, "0000010101");
        assert_eq!(tables[0].name, "人口推計");
        assert_eq!(tables[0].total_rows, 250_000);
        // String-typed row count is accepted
        assert_eq!(tables[1].total_rows, 99);
    }

    #[test]
    fn test_parse_table_list_single_object() {
        let value = json!({
            "GET_STATS_LIST": {
                "DATALIST_INF": {
                    "NUMBER": 1,
                    "TABLE_INF": {
                        "@id": "0000010101",
                        "OVERALL_TOTAL_NUMBER": 42,
                        "TITLE_SPEC": { "TABLE_NAME": "人口推計" }
                    }
                }
            }
        });

        let tables = parse_table_list(&value).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].id, "0000010101");
    }

    #[test]
    fn test_parse_table_list_zero_results() {
        let value = json!({
            "GET_STATS_LIST": {
                "DATALIST_INF": { "NUMBER": 0 }
            }
        });

        let tables = parse_table_list(&value).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_parse_table_list_missing_tables_is_error() {
        let value = json!({
            "GET_STATS_LIST": {
                "DATALIST_INF": { "NUMBER": 3 }
            }
        });

        let result = parse_table_list(&value);
        assert!(matches!(result, Err(ApiError::Listing { .. })));
    }

    #[test]
    fn test_parse_table_list_wrong_shape_is_error() {
        let value = json!({ "RESULT": { "STATUS": 100 } });
        let result = parse_table_list(&value);
        assert!(matches!(result, Err(ApiError::Listing { .. })));
    }
}
