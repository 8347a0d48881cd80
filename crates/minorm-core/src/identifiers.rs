//! SQL identifier checks.
//!
//! Table and column names are spliced into generated SQL verbatim, so every
//! name that does not come from a derive (which checks at compile time) goes
//! through `validate_identifier` first.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// True if `name` is a plain, unquoted SQL identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Reject names that are not plain SQL identifiers.
pub fn validate_identifier(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{:?} is not a valid SQL identifier",
            name
        )))
    }
}
