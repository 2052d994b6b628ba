//! # Property Accessors
//!
//! Typed readers for the Notion property kinds the export uses. Each one takes
//! the raw JSON of a single property and returns `None` when the value is
//! missing or has an unexpected shape.

use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Debug, Clone)]
struct PlainText {
    #[serde(default)]
    plain_text: String,
}

#[derive(Deserialize, Debug, Clone)]
struct SelectOption {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
struct DateValue {
    #[serde(default)]
    start: Option<String>,
}

/// Reads a nested key of `property` as `T`, treating any shape mismatch as absent.
fn field<'a, T: Deserialize<'a>>(property: &'a Value, key: &str) -> Option<T> {
    property
        .get(key)
        .and_then(|value| T::deserialize(value).ok())
}

fn join_fragments(fragments: Vec<PlainText>) -> String {
    fragments
        .into_iter()
        .map(|t| t.plain_text)
        .collect::<Vec<_>>()
        .join("")
}

/// Concatenated plain text of a `title` or `rich_text` property, trimmed.
///
/// A `title` key wins over `rich_text` when both are present.
pub fn text(property: &Value) -> Option<String> {
    let fragments = if property.get("title").is_some() {
        field::<Vec<PlainText>>(property, "title")
    } else {
        field::<Vec<PlainText>>(property, "rich_text")
    }?;
    Some(join_fragments(fragments).trim().to_string())
}

/// Name of the chosen option of a `select` property.
pub fn select(property: &Value) -> Option<String> {
    field::<Option<SelectOption>>(property, "select")
        .flatten()
        .and_then(|option| option.name)
}

/// Option names of a `multi_select` property, in the order Notion lists them.
/// Options without a name are skipped.
pub fn multi_select(property: &Value) -> Option<Vec<String>> {
    field::<Vec<SelectOption>>(property, "multi_select")
        .map(|options| options.into_iter().filter_map(|o| o.name).collect())
}

/// Calendar date (`YYYY-MM-DD`) of the start of a `date` property.
pub fn date(property: &Value) -> Option<String> {
    let start = field::<Option<DateValue>>(property, "date")
        .flatten()
        .and_then(|d| d.start)?;
    Some(start.split('T').next().unwrap_or_default().to_string())
}

pub fn url(property: &Value) -> Option<String> {
    field::<Option<String>>(property, "url").flatten()
}
