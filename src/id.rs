//! Unique, time-sortable identifiers for forms, steps, and fields.

use ulid::{Generator, Ulid};

const FORM_PREFIX: &str = "form";
const STEP_PREFIX: &str = "step";
const FIELD_PREFIX: &str = "field";

/// Mints prefixed ULID identifiers.
///
/// Identifiers sort lexicographically by creation time, including ids minted
/// within the same millisecond (the inner generator is monotonic). The prefix
/// keeps ids human-attributable in logs and exported JSON.
pub struct IdGenerator {
    inner: Generator,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            inner: Generator::new(),
        }
    }

    pub fn form_id(&mut self) -> String {
        format!("{}_{}", FORM_PREFIX, self.next())
    }

    pub fn step_id(&mut self) -> String {
        format!("{}_{}", STEP_PREFIX, self.next())
    }

    pub fn field_id(&mut self) -> String {
        format!("{}_{}", FIELD_PREFIX, self.next())
    }

    /// Whether `id` looks like an id minted by this generator, as opposed to
    /// a canonical id assigned by the primary store.
    pub fn is_generated(id: &str) -> bool {
        let Some((prefix, tail)) = id.split_once('_') else {
            return false;
        };
        matches!(prefix, FORM_PREFIX | STEP_PREFIX | FIELD_PREFIX)
            && Ulid::from_string(tail).is_ok()
    }

    fn next(&mut self) -> Ulid {
        // The generator only errors when the random tail overflows within a
        // single millisecond; a fresh ULID is still unique then.
        self.inner.generate().unwrap_or_else(|_| Ulid::new())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
