//! Group definitions typed on the command line
//!
//! `--group "Control=col1(A1-H1) col2(A2-H2)"` names a group and lists its
//! ranges. Parenthesised tokens keep only the text inside the parentheses,
//! so labels such as `col1` or `rowF` are free-form. Without parentheses the
//! body is split on whitespace and commas.

use regex::Regex;
use std::sync::OnceLock;
use wellplate_core::GroupDefinition;

static PARENTHESISED: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn parenthesised() -> Result<&'static Regex, String> {
    PARENTHESISED
        .get_or_init(|| Regex::new(r"\(([^()]+)\)"))
        .as_ref()
        .map_err(|e| e.to_string())
}

/// Parse one `Name=ranges` argument
pub fn parse_group_arg(arg: &str) -> Result<GroupDefinition, String> {
    let (name, body) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=RANGES, got {:?}", arg))?;

    Ok(GroupDefinition::new(name.trim(), split_ranges(body)?))
}

/// Range expressions contained in a group body
pub fn split_ranges(body: &str) -> Result<Vec<String>, String> {
    if body.contains('(') {
        return Ok(parenthesised()?
            .captures_iter(body)
            .map(|caps| caps[1].trim().to_string())
            .collect());
    }

    Ok(body
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesised_tokens() {
        let group = parse_group_arg("Control=col1(A1-H1) col2( A2-H2 ) rowF(F6-F8)").unwrap();
        assert_eq!(group.name, "Control");
        assert_eq!(group.ranges, vec!["A1-H1", "A2-H2", "F6-F8"]);
    }

    #[test]
    fn test_bare_tokens() {
        let group = parse_group_arg(" Treated = A3-H3, b1-b4 ").unwrap();
        assert_eq!(group.name, "Treated");
        assert_eq!(group.ranges, vec!["A3-H3", "b1-b4"]);
    }

    #[test]
    fn test_missing_separator() {
        assert!(parse_group_arg("Control A1-H1").is_err());
    }

    #[test]
    fn test_empty_body() {
        let group = parse_group_arg("Empty=").unwrap();
        assert!(group.ranges.is_empty());
    }
}
