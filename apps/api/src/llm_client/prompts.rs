// Shared prompt fragments and prompt-building utilities.
// Operation-specific templates live in generation/prompts.rs.

/// Section list every generated resume must contain.
pub const RESUME_SECTIONS_INSTRUCTION: &str =
    "The resume must include a Professional Summary, Skills, Work Experience, and Education section.";

/// Delimiter line that fences free text supplied by the user inside a prompt.
pub const BLOCK_DELIMITER: &str = "---";

/// Substitutes `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so user text that happens to
/// contain `{placeholder}` sequences is embedded verbatim. Unknown
/// placeholders are left as-is.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_placeholders() {
        let out = fill_template(
            "Hello {name}, you are {role}.",
            &[("name", "Ada"), ("role", "admin")],
        );
        assert_eq!(out, "Hello Ada, you are admin.");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("A={a} B={b}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(out, "A={b} B=two");
    }

    #[test]
    fn test_fill_template_keeps_unknown_and_unbalanced_braces() {
        let out = fill_template("{\"k\": 1} {missing} {x", &[("x", "nope")]);
        assert_eq!(out, "{\"k\": 1} {missing} {x");
    }
}
