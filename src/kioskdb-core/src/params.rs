use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Sort direction accepted by `ordertype`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Paging, ordering and per-field filters for `list`/`search`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaginationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recperpage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordertype: Option<SortOrder>,
    /// Free-form field filters, e.g. `is_active=1`
    #[serde(flatten)]
    pub filters: BTreeMap<String, Value>,
}

impl PaginationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(start: u64, recperpage: u64) -> Self {
        Self {
            start: Some(start),
            recperpage: Some(recperpage),
            ..Self::default()
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, ordertype: SortOrder) -> Self {
        self.order = Some(field.into());
        self.ordertype = Some(ordertype);
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Query-string pairs, skipping unset and null values
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(start) = self.start {
            query.push(("start".to_string(), start.to_string()));
        }
        if let Some(recperpage) = self.recperpage {
            query.push(("recperpage".to_string(), recperpage.to_string()));
        }
        if let Some(order) = &self.order {
            query.push(("order".to_string(), order.clone()));
        }
        if let Some(ordertype) = self.ordertype {
            query.push(("ordertype".to_string(), ordertype.as_str().to_string()));
        }
        for (field, value) in &self.filters {
            if let Some(text) = query_value(value) {
                query.push((field.clone(), text));
            }
        }
        query
    }
}

/// Render a JSON value the way a query string carries it
pub fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Export document format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    Excel,
    Word,
    Pdf,
}

impl ExportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportType::Excel => "excel",
            ExportType::Word => "word",
            ExportType::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "excel" => Ok(ExportType::Excel),
            "word" => Ok(ExportType::Word),
            "pdf" => Ok(ExportType::Pdf),
            other => Err(anyhow::anyhow!("unknown export type '{}'", other)),
        }
    }
}
