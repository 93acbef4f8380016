//! Placeholder expansion for connection settings.

use std::env;

const PLACEHOLDER_OPEN: &str = "${env:";

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// `~user` forms are left unchanged.
pub fn expand_tilde(input: &str) -> String {
    shellexpand::tilde(input).into_owned()
}

/// Replace `${env:VAR_NAME}` placeholders with the value of `VAR_NAME`.
///
/// Unset variables and unterminated placeholders are kept verbatim.
pub fn expand_env_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some((before, tail)) = rest.split_once(PLACEHOLDER_OPEN) {
        out.push_str(before);
        let Some((name, after)) = tail.split_once('}') else {
            out.push_str(PLACEHOLDER_OPEN);
            out.push_str(tail);
            return out;
        };
        match env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => {
                out.push_str(PLACEHOLDER_OPEN);
                out.push_str(name);
                out.push('}');
            }
        }
        rest = after;
    }

    out.push_str(rest);
    out
}
