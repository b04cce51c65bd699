//! Parsed tag records.

use std::fmt;

/// A single tag row broken into its structural parts.
///
/// Records are produced once per input row by the parser and never mutated
/// afterwards.
///
/// # Examples
///
/// ```
/// use tagtree_core::record::TagRecord;
///
/// let record = TagRecord::new("Area1.Line2", "3", Some("1".to_string()), Some("Overload".to_string()));
/// assert_eq!(record.prefix(), "Area1.Line2");
/// assert_eq!(record.instance_name(), "3");
/// assert_eq!(record.bit(), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    prefix: String,
    instance_name: String,
    bit: Option<String>,
    description: Option<String>,
}

impl TagRecord {
    /// Creates a new record.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Dot-separated folder path of the tag.
    /// * `instance_name` - Name of the UDT instance the tag belongs to.
    /// * `bit` - Terminal numeric segment, if the tag ends in one.
    /// * `description` - Description text, `None` when the cell was empty or null.
    pub fn new(
        prefix: impl Into<String>,
        instance_name: impl Into<String>,
        bit: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            instance_name: instance_name.into(),
            bit,
            description,
        }
    }

    /// Returns the folder path of the tag.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the instance name.
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Returns the bit number, if any.
    pub fn bit(&self) -> Option<&str> {
        self.bit.as_deref()
    }

    /// Returns the description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for TagRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.instance_name)?;
        if let Some(bit) = &self.bit {
            write!(f, "#{bit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_bit() {
        let record = TagRecord::new("A.B", "M1", Some("4".to_string()), None);
        assert_eq!(record.to_string(), "A.B/M1#4");
    }

    #[test]
    fn test_display_without_bit() {
        let record = TagRecord::new("A", "Motor", None, Some("Running".to_string()));
        assert_eq!(record.to_string(), "A/Motor");
        assert_eq!(record.description(), Some("Running"));
    }
}
