//! Domain models for the query resolver.

mod catalog;
mod knowledge;
mod resolution;

pub use catalog::*;
pub use knowledge::*;
pub use resolution::*;

use serde::{Deserialize, Deserializer};

use crate::resolver::normalize;

/// Deserialize a phrase into the same form queries are matched in.
fn normalized_phrase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| normalize(&s))
}

fn normalized_phrases<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Vec::<String>::deserialize(deserializer).map(|v| v.iter().map(|s| normalize(s)).collect())
}
