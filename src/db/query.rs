/// Query vocabulary for the PostgREST-style REST interface
///
/// Translates typed equality filters, ordering, limits and free-text search into the
/// `field=eq.value` query-string convention the data service understands.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal a filter can compare against: string, number, boolean or null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => f.write_str("null"),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::Text(value.clone())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<f64> for FilterValue {
    /// Non-finite floats have no JSON form and become `Null`
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(FilterValue::Number)
            .unwrap_or(FilterValue::Null)
    }
}

impl From<uuid::Uuid> for FilterValue {
    fn from(value: uuid::Uuid) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

/// Equality filters keyed by field name
///
/// Behaves like a map (setting a field twice keeps the last value) but remembers insertion
/// order so generated query strings are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: Vec<(String, FilterValue)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(field, value)| (field.as_str(), value))
    }

    /// `(field, "eq.<value>")` pairs in insertion order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(field, value)| (field.to_string(), format!("eq.{}", value)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Filters
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (field, value) in iter {
            filters.set(field, value);
        }
        filters
    }
}

/// Sort direction for `order=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    fn render(&self) -> String {
        let direction = match self.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        format!("{}.{}", self.field, direction)
    }
}

/// A complete read request: columns, equality filters, ordering and limit
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    columns: String,
    filters: Filters,
    order: Option<Order>,
    limit: Option<usize>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new("*")
    }
}

impl Query {
    /// Start a query over `columns` (comma-joined list, or `*`; empty means `*`)
    pub fn new(columns: impl Into<String>) -> Self {
        let columns = columns.into();
        let columns = if columns.trim().is_empty() {
            "*".to_string()
        } else {
            columns
        };
        Self {
            columns,
            filters: Filters::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.set(field, value);
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        for (field, value) in filters.entries {
            self.filters.set(field, value);
        }
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn order_desc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Direction::Descending)
    }

    pub fn order_asc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Direction::Ascending)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn columns(&self) -> &str {
        &self.columns
    }

    /// Query-string pairs: `select` first, then filters, then `order` and `limit`
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.to_pairs());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.render()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Case-insensitive partial match of one term across several fields, OR-combined
///
/// Renders `or=(f1.ilike.*term*,f2.ilike.*term*)`. Terms containing PostgREST's reserved
/// characters are double-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    fields: Vec<String>,
    term: String,
}

impl TextSearch {
    pub fn new<I, S>(fields: I, term: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            term: term.into().trim().to_string(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// A search with no term or no fields would match everything
    pub fn is_empty(&self) -> bool {
        self.term.is_empty() || self.fields.is_empty()
    }

    /// Value of the `or` parameter
    pub fn render(&self) -> String {
        let pattern = quote_if_reserved(&format!("*{}*", self.term));
        let clauses: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}.ilike.{}", field, pattern))
            .collect();
        format!("({})", clauses.join(","))
    }
}

fn quote_if_reserved(value: &str) -> String {
    const RESERVED: &[char] = &[',', '(', ')', ':', '"', '\\'];
    if !value.contains(RESERVED) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Append query-string pairs to a URL, form-encoded
pub fn append_pairs(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        return;
    }
    let mut serializer = url.query_pairs_mut();
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
}
