use crate::error::{Error, Result};
use std::collections::HashMap;

/// Tree statement lifted out of a NEXUS file, with taxon indices already
/// substituted by their translated labels.
#[derive(Debug)]
pub struct NexusTree {
    pub name: Option<String>,
    pub newick: String,
}

/// Locate the translate block and the first tree statement of a NEXUS
/// file, and rewrite numeric tip references into quoted labels.
pub fn prepare(raw: &str) -> Result<NexusTree> {
    let translate_map = parse_translate_block(extract_translate_block(raw));
    let (name, tree_string) = extract_tree_statement(raw)?;
    let newick = apply_translate_map(&tree_string, &translate_map);
    Ok(NexusTree { name, newick })
}

/// Case-insensitive substring search.
fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

fn extract_translate_block(raw: &str) -> &str {
    let Some(start) = find_ignore_case(raw, "translate", 0) else {
        return "";
    };
    let rest = &raw[start + "translate".len()..];
    match rest.find(';') {
        Some(end) => &rest[..end],
        None => "",
    }
}

/// Parse `index label` entries. Labels come back single-quoted (embedded
/// quotes doubled) so substitution cannot collide with Newick syntax.
fn parse_translate_block(block: &str) -> HashMap<String, String> {
    let mut translate_map = HashMap::new();
    for entry in block.split(',') {
        let entry = entry.trim().trim_matches(';').trim();
        if entry.is_empty() {
            continue;
        }
        let Some(split_at) = entry.find(char::is_whitespace) else {
            continue;
        };
        let index = &entry[..split_at];
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let label = entry[split_at..]
            .trim()
            .trim_end_matches([',', ';'])
            .to_string();
        let quoted = if label.starts_with('\'') && label.ends_with('\'') && label.len() >= 2 {
            label
        } else {
            format!("'{}'", label.replace('\'', "''"))
        };
        translate_map.insert(index.to_string(), quoted);
    }
    translate_map
}

/// Find the first `tree <name> = (...);` statement. The word `tree` must
/// be followed by whitespace and the name segment may contain neither `=`
/// nor `;`, which keeps the scan from latching onto `begin trees;`.
fn extract_tree_statement(raw: &str) -> Result<(Option<String>, String)> {
    let mut from = 0;
    while let Some(start) = find_ignore_case(raw, "tree", from) {
        from = start + 1;
        let rest = &raw[start + "tree".len()..];
        if !rest.starts_with(|c: char| c.is_whitespace()) {
            continue;
        }
        let Some(eq) = rest.find('=') else {
            continue;
        };
        let name_segment = &rest[..eq];
        if name_segment.contains(';') {
            continue;
        }
        let Some(end) = rest[eq + 1..].find(';') else {
            continue;
        };
        let tree_string: String = rest[eq + 1..eq + 1 + end]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if tree_string.is_empty() {
            continue;
        }
        let name = name_segment.trim();
        let name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
        return Ok((name, tree_string));
    }
    Err(Error::Parse("no tree statement found in NEXUS input".to_string()))
}

/// Substitute numeric tip references with translated labels. A digit run
/// is only replaced when preceded by `(`, `,` or `)` and followed by `:`,
/// `[`, `,` or `)`, so multi-digit indices are never partially matched
/// and branch lengths are left alone.
fn apply_translate_map(tree_string: &str, translate_map: &HashMap<String, String>) -> String {
    if translate_map.is_empty() {
        return tree_string.to_string();
    }

    let chars: Vec<char> = tree_string.chars().collect();
    let mut out = String::with_capacity(tree_string.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        if !matches!(c, '(' | ',' | ')') {
            continue;
        }
        let digits_start = i;
        let mut j = i;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j == digits_start || j >= chars.len() || !matches!(chars[j], ':' | '[' | ',' | ')') {
            continue;
        }
        let index: String = chars[digits_start..j].iter().collect();
        let label = translate_map
            .get(&index)
            .or_else(|| translate_map.get(index.trim_start_matches('0')))
            .cloned()
            .unwrap_or_else(|| index.clone());
        out.push_str(&label);
        i = j;
    }
    out
}
