use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One value from a node's annotation comment.
///
/// BEAST-style annotations carry no schema: a value may be a bare token,
/// a quoted string, or a braces-delimited list of further values. The
/// variants keep extraction logic exhaustive instead of relying on runtime
/// type inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<AnnotationValue>),
    Map(BTreeMap<String, AnnotationValue>),
}

impl AnnotationValue {
    /// Numeric view of the value. Accepts numeric text as well, since
    /// annotation tools frequently quote numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnnotationValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            AnnotationValue::Int(i) => Some(*i as f64),
            AnnotationValue::Float(f) => Some(*f),
            AnnotationValue::Text(s) => s.trim().parse::<f64>().ok(),
            AnnotationValue::List(_) | AnnotationValue::Map(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(b) => write!(f, "{}", b),
            AnnotationValue::Int(i) => write!(f, "{}", i),
            AnnotationValue::Float(v) => write!(f, "{}", v),
            AnnotationValue::Text(s) => write!(f, "{}", s),
            AnnotationValue::List(items) => {
                write!(f, "{{")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            AnnotationValue::Map(entries) => {
                write!(f, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Parse a `[&key=value,key={a,b},...]` comment into an annotation map.
///
/// Keys are runs of word characters plus `.`, `%` and `-`. Values are
/// quoted strings, braces-delimited lists, or bare tokens; anything that
/// does not fit the pair shape is skipped rather than failing the parse.
pub fn parse_comment(comment: &str) -> BTreeMap<String, AnnotationValue> {
    let mut content = comment.trim();
    if let Some(stripped) = content.strip_prefix("[&") {
        content = stripped.strip_suffix(']').unwrap_or(stripped);
    } else if let Some(stripped) = content.strip_prefix('[') {
        content = stripped.strip_suffix(']').unwrap_or(stripped);
    }

    let chars: Vec<char> = content.chars().collect();
    let mut annotations = BTreeMap::new();
    let mut i = 0;

    while i < chars.len() {
        if !is_key_char(chars[i]) {
            i += 1;
            continue;
        }
        let key_start = i;
        while i < chars.len() && is_key_char(chars[i]) {
            i += 1;
        }
        if i >= chars.len() || chars[i] != '=' {
            continue;
        }
        let key: String = chars[key_start..i].iter().collect();
        i += 1;

        let value = match chars.get(i) {
            Some('"') => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '"' {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                if i < chars.len() {
                    i += 1;
                }
                AnnotationValue::Text(text)
            }
            Some('{') => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '}' {
                    i += 1;
                }
                let inner: String = chars[start..i].iter().collect();
                if i < chars.len() {
                    i += 1;
                }
                let inner = inner.trim();
                if inner.is_empty() {
                    AnnotationValue::List(Vec::new())
                } else {
                    AnnotationValue::List(inner.split(',').map(|item| coerce_token(item.trim())).collect())
                }
            }
            _ => {
                let start = i;
                while i < chars.len() && chars[i] != ',' {
                    i += 1;
                }
                let token: String = chars[start..i].iter().collect();
                coerce_token(token.trim())
            }
        };

        annotations.insert(key, value);
    }

    annotations
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '%' | '-')
}

/// Type-coerce a bare annotation token: booleans, then numbers (tokens
/// containing `.`, `e` or `E` become floats, the rest integers), with
/// anything unparseable left as text.
pub fn coerce_token(token: &str) -> AnnotationValue {
    let lowered = token.to_lowercase();
    if lowered == "true" || lowered == "false" {
        return AnnotationValue::Bool(lowered == "true");
    }
    if token.contains(['.', 'e', 'E']) {
        if let Ok(value) = token.parse::<f64>() {
            return AnnotationValue::Float(value);
        }
    } else if let Ok(value) = token.parse::<i64>() {
        return AnnotationValue::Int(value);
    }
    AnnotationValue::Text(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_token_types() {
        assert_eq!(coerce_token("true"), AnnotationValue::Bool(true));
        assert_eq!(coerce_token("FALSE"), AnnotationValue::Bool(false));
        assert_eq!(coerce_token("42"), AnnotationValue::Int(42));
        assert_eq!(coerce_token("0.25"), AnnotationValue::Float(0.25));
        assert_eq!(coerce_token("1e-3"), AnnotationValue::Float(0.001));
        assert_eq!(coerce_token("Lyon"), AnnotationValue::Text("Lyon".to_string()));
        // A dot is not enough to make a float.
        assert_eq!(
            coerce_token("1.2.3"),
            AnnotationValue::Text("1.2.3".to_string())
        );
    }

    #[test]
    fn test_parse_comment_pairs() {
        let parsed = parse_comment("[&location=\"Germany\",posterior=0.87,height=12]");
        assert_eq!(
            parsed.get("location"),
            Some(&AnnotationValue::Text("Germany".to_string()))
        );
        assert_eq!(parsed.get("posterior"), Some(&AnnotationValue::Float(0.87)));
        assert_eq!(parsed.get("height"), Some(&AnnotationValue::Int(12)));
    }

    #[test]
    fn test_parse_comment_lists() {
        let parsed = parse_comment("[&location.set={Germany,France},location.set.prob={0.7,0.3}]");
        assert_eq!(
            parsed.get("location.set"),
            Some(&AnnotationValue::List(vec![
                AnnotationValue::Text("Germany".to_string()),
                AnnotationValue::Text("France".to_string()),
            ]))
        );
        assert_eq!(
            parsed.get("location.set.prob"),
            Some(&AnnotationValue::List(vec![
                AnnotationValue::Float(0.7),
                AnnotationValue::Float(0.3),
            ]))
        );
    }

    #[test]
    fn test_parse_comment_empty_and_malformed() {
        assert!(parse_comment("").is_empty());
        assert!(parse_comment("[&]").is_empty());
        // A stray token without '=' is skipped, later pairs survive.
        let parsed = parse_comment("[&orphan,rate=1.5]");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("rate"), Some(&AnnotationValue::Float(1.5)));
    }

    #[test]
    fn test_parse_comment_hpd_key() {
        let parsed = parse_comment("[&height_95%_HPD={0.1,2.4}]");
        assert_eq!(
            parsed.get("height_95%_HPD"),
            Some(&AnnotationValue::List(vec![
                AnnotationValue::Float(0.1),
                AnnotationValue::Float(2.4),
            ]))
        );
    }
}
