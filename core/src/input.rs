use anyhow::{anyhow, Result};

/// Splits `key:value` arguments and expands each key against `candidates`.
/// Values may themselves contain `:`; only the first one separates.
pub fn parse_assignments(args: &[String], candidates: &[&str]) -> Result<Vec<(String, String)>> {
    let mut assignments = Vec::with_capacity(args.len());
    for arg in args {
        let (key, value) = arg
            .split_once(':')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| anyhow!("Expected key:value, got '{}'", arg))?;
        assignments.push((expand_key(key, candidates)?, value.to_string()));
    }
    Ok(assignments)
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}
