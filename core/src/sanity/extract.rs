use std::str::FromStr;

use super::Pattern;
use crate::error::ExtractError;

fn convert<T: FromStr>(value: &str) -> Result<T, ExtractError> {
    value.parse::<T>().map_err(|_| ExtractError::Conversion {
        value: value.to_string(),
        target: std::any::type_name::<T>(),
    })
}

fn group_missing(pattern: &Pattern, group: usize) -> ExtractError {
    ExtractError::GroupNotFound {
        pattern: pattern.to_string(),
        group,
    }
}

/// Value of capture `group` in the first match of `pattern`, converted to `T`.
pub fn extract_single<T: FromStr>(
    pattern: &Pattern,
    text: &str,
    group: usize,
) -> Result<T, ExtractError> {
    if group >= pattern.regex().captures_len() {
        return Err(group_missing(pattern, group));
    }
    let caps = pattern
        .regex()
        .captures(text)
        .ok_or_else(|| ExtractError::PatternNotFound {
            pattern: pattern.to_string(),
        })?;
    let m = caps.get(group).ok_or_else(|| group_missing(pattern, group))?;
    convert(m.as_str())
}

/// Values of capture `group` across all matches. Errors when nothing matches.
pub fn extract_all<T: FromStr>(
    pattern: &Pattern,
    text: &str,
    group: usize,
) -> Result<Vec<T>, ExtractError> {
    if group >= pattern.regex().captures_len() {
        return Err(group_missing(pattern, group));
    }
    let mut values = Vec::new();
    for caps in pattern.regex().captures_iter(text) {
        if let Some(m) = caps.get(group) {
            values.push(convert(m.as_str())?);
        }
    }
    if values.is_empty() {
        return Err(ExtractError::PatternNotFound {
            pattern: pattern.to_string(),
        });
    }
    Ok(values)
}
