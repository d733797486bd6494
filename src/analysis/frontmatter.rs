//! Frontmatter parsing
//!
//! Splits the YAML header from a markdown document and validates the fields
//! the pipeline understands into a typed [`FrontMatter`].

use serde_yaml::Value;
use thiserror::Error;

/// Errors raised while validating a frontmatter block
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("field `{field}` must be a scalar, found {found}")]
    NotAScalar { field: &'static str, found: &'static str },
}

/// Validated frontmatter fields
///
/// Unknown keys are ignored. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl FrontMatter {
    /// Parse and validate a YAML header
    pub fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        let mapping = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(m) => m,
            other => return Err(FrontMatterError::NotAMapping(kind(&other))),
        };

        let field = |name: &'static str| -> Result<Option<String>, FrontMatterError> {
            match mapping.get(name) {
                None => Ok(None),
                Some(v) => scalar_text(v).map_err(|found| FrontMatterError::NotAScalar {
                    field: name,
                    found,
                }),
            }
        };

        let tags = match mapping.get("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    scalar_text(item).map_err(|found| FrontMatterError::NotAScalar {
                        field: "tags",
                        found,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .flatten()
                .collect(),
            Some(single) => scalar_text(single)
                .map_err(|found| FrontMatterError::NotAScalar {
                    field: "tags",
                    found,
                })?
                .into_iter()
                .collect(),
        };

        Ok(Self {
            title: field("title")?,
            description: field("description")?,
            category: field("category")?,
            tags,
        })
    }
}

/// Split a document into its frontmatter block (if any) and body
///
/// The header must open on the first line with `---` and close with a line
/// of `---`. An unterminated header is left in the body.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(rest) = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, content)
}

/// Render a YAML scalar as text; `Ok(None)` for null or empty strings
fn scalar_text(value: &Value) -> Result<Option<String>, &'static str> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => return Err(kind(other)),
    };
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
