use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    // `${VAR}` or `${VAR:-default}`; default may be empty
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("must be valid regex")
});

/// Expand `${VAR}` placeholders in a raw TOML string
///
/// Runs before deserialization so config structs hold plain
/// `String`/`SecretString` values. `${VAR:-default}` substitutes the default
/// when the variable is unset; a bare `${VAR}` on an unset variable is an
/// error. TOML comment lines are passed through untouched.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut missing: Option<String> = None;

    let expanded = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_owned();
            }
            PLACEHOLDER_RE
                .replace_all(line, |captures: &Captures| {
                    let var = &captures[1];
                    match std::env::var(var) {
                        Ok(value) => value,
                        Err(_) => captures.get(2).map_or_else(
                            || {
                                missing.get_or_insert_with(|| var.to_owned());
                                String::new()
                            },
                            |default| default.as_str().to_owned(),
                        ),
                    }
                })
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n");

    if let Some(var) = missing {
        return Err(format!("environment variable not set: `{var}`"));
    }

    // `lines` drops a trailing newline
    if input.ends_with('\n') {
        Ok(expanded + "\n")
    } else {
        Ok(expanded)
    }
}
