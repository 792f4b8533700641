//! Extraction of environment variable blocks from `cf env` output
//!
//! `cf env` prints prose interleaved with JSON documents, one per
//! system-provided variable:
//!
//! ```text
//! Getting env variables for app tunnel in org dev / space dev as me...
//! System-Provided:
//! {
//!  "VCAP_SERVICES": {
//!   "p-service-registry": [ ... ]
//!  }
//! }
//!
//! {
//!  "VCAP_APPLICATION": {
//!   "application_id": "..."
//!  }
//! }
//! ```
//!
//! Each block becomes one entry mapping the variable name to its raw value
//! text, with every value line trimmed and concatenated. The value is not
//! reparsed as JSON.

use std::collections::BTreeMap;

/// Variable name to raw value text
pub type EnvVars = BTreeMap<String, String>;

/// Lines collected for the block currently being read, `None` outside a block
pub type Accumulator = Option<Vec<String>>;

/// Extract every complete variable block from the given lines
///
/// Malformed or unterminated blocks are dropped without error.
pub fn extract_env_vars<I, S>(lines: I) -> EnvVars
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut vars = EnvVars::new();
    let mut acc: Accumulator = None;
    for line in lines {
        acc = step(acc, line.as_ref(), &mut vars);
    }
    vars
}

/// Process a single line, returning the accumulator for the next line
///
/// The closing check runs before the append, so a line starting with `}`
/// never lands in the block it closes.
pub fn step(acc: Accumulator, line: &str, vars: &mut EnvVars) -> Accumulator {
    let mut acc = acc;

    if line.starts_with('}') {
        if let Some(block) = acc.take() {
            if let Some((name, value)) = finish_block(&block) {
                vars.insert(name, value);
            }
        }
    }

    if let Some(block) = acc.as_mut() {
        block.push(line.to_string());
    }

    if line.starts_with('{') {
        acc = Some(Vec::new());
    }

    acc
}

/// Turn collected block lines into a name/value pair
///
/// The first line is the `"NAME": {` header, the rest is the value body.
fn finish_block(block: &[String]) -> Option<(String, String)> {
    let (header, body) = block.split_first()?;
    let name = header_name(header)?;

    let mut value = String::from("{");
    for line in body {
        value.push_str(line.trim());
    }
    Some((name.to_string(), value))
}

fn header_name(header: &str) -> Option<&str> {
    let start = header.find('"')? + 1;
    let end = header.rfind('"')?;
    if end < start {
        return None;
    }
    Some(&header[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_single_block() {
        let input = lines(&[
            "noise",
            "{",
            "  \"VCAP_APPLICATION\": {",
            "    \"a\":\"b\"",
            "  }",
            "}",
            "noise",
        ]);
        let vars = extract_env_vars(&input);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["VCAP_APPLICATION"], "{\"a\":\"b\"}");
    }

    #[test]
    fn test_extract_cf_formatted_output() {
        let input = [
            "Getting env variables for app demo in org dev / space dev as admin...",
            "OK",
            "",
            "System-Provided:",
            "{",
            " \"VCAP_SERVICES\": {",
            "  \"p-service-registry\": [",
            "   {",
            "    \"name\": \"registry\"",
            "   }",
            "  ]",
            " }",
            "}",
            "",
            "{",
            " \"VCAP_APPLICATION\": {",
            "  \"application_name\": \"demo\",",
            "  \"space_name\": \"dev\"",
            " }",
            "}",
            "",
            "No user-defined env variables have been set",
        ];
        let vars = extract_env_vars(input);
        assert_eq!(vars.len(), 2);
        assert_eq!(
            vars["VCAP_SERVICES"],
            "{\"p-service-registry\": [{\"name\": \"registry\"}]}"
        );
        assert_eq!(
            vars["VCAP_APPLICATION"],
            "{\"application_name\": \"demo\",\"space_name\": \"dev\"}"
        );
    }

    #[test]
    fn test_blocks_do_not_share_content() {
        let input = [
            "{",
            " \"FIRST\": {",
            "  \"one\": 1",
            " }",
            "}",
            "{",
            " \"SECOND\": {",
            "  \"two\": 2",
            " }",
            "}",
        ];
        let vars = extract_env_vars(input);
        assert_eq!(vars["FIRST"], "{\"one\": 1}");
        assert_eq!(vars["SECOND"], "{\"two\": 2}");
    }

    #[test]
    fn test_no_opening_lines_yields_empty() {
        let vars = extract_env_vars(["just", "some", "  { indented", "text"]);
        assert!(vars.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let vars = extract_env_vars(Vec::<String>::new());
        assert!(vars.is_empty());
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let input = [
            "{",
            " \"DONE\": {",
            " }",
            "}",
            "{",
            " \"PARTIAL\": {",
            "  \"x\": 1",
        ];
        let vars = extract_env_vars(input);
        assert_eq!(vars.len(), 1);
        assert!(vars.contains_key("DONE"));
        assert!(!vars.contains_key("PARTIAL"));
    }

    #[test]
    fn test_header_without_quotes_is_dropped() {
        let vars = extract_env_vars(["{", "no header here", "}"]);
        assert!(vars.is_empty());
    }

    #[test]
    fn test_block_without_header_is_dropped() {
        let vars = extract_env_vars(["{", "}"]);
        assert!(vars.is_empty());
    }

    #[test]
    fn test_closing_line_outside_block_is_ignored() {
        let vars = extract_env_vars(["}", "} trailing", "noise"]);
        assert!(vars.is_empty());
    }

    #[test]
    fn test_closing_line_is_not_appended() {
        let mut vars = EnvVars::new();
        let acc = Some(lines(&[" \"NAME\": {", "  \"k\": \"v\""]));

        let next = step(acc, "} closing", &mut vars);

        assert!(next.is_none());
        assert_eq!(vars["NAME"], "{\"k\": \"v\"");
        assert!(!vars["NAME"].contains("closing"));
    }

    #[test]
    fn test_step_opens_accumulator_on_brace() {
        let mut vars = EnvVars::new();
        let acc = step(None, "{", &mut vars);
        assert_eq!(acc, Some(Vec::new()));
        assert!(vars.is_empty());
    }

    #[test]
    fn test_step_appends_inside_block() {
        let mut vars = EnvVars::new();
        let acc = step(Some(Vec::new()), " \"NAME\": {", &mut vars);
        assert_eq!(acc, Some(vec![" \"NAME\": {".to_string()]));
    }

    #[test]
    fn test_brace_inside_block_restarts_accumulator() {
        // A line opening with `{` while collecting discards what was read so far.
        let input = ["{", " \"LOST\": {", "{", " \"KEPT\": {", "  1", "}"];
        let vars = extract_env_vars(input);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["KEPT"], "{1");
    }

    #[test]
    fn test_duplicate_name_keeps_last() {
        let input = ["{", " \"V\": {", "  1", "}", "{", " \"V\": {", "  2", "}"];
        let vars = extract_env_vars(input);
        assert_eq!(vars["V"], "{2");
    }
}
