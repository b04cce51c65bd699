//! Template selection by instance name shape.

use log::debug;

use tagtree_core::template::TemplateId;

use crate::config::TemplateConfig;

/// Lexical shape of an instance name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceShape {
    /// Only ASCII decimal digits, e.g. `12`.
    Numeric,
    /// Anything non-empty without brackets, e.g. `Motor_1`.
    Textual,
    /// Empty, or containing `[` or `]`.
    Irregular,
}

impl InstanceShape {
    /// Classifies an instance name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagtree::select::InstanceShape;
    ///
    /// assert_eq!(InstanceShape::of("42"), InstanceShape::Numeric);
    /// assert_eq!(InstanceShape::of("Pump 3"), InstanceShape::Textual);
    /// assert_eq!(InstanceShape::of("a[1]"), InstanceShape::Irregular);
    /// ```
    pub fn of(name: &str) -> Self {
        if name.is_empty() {
            InstanceShape::Irregular
        } else if name.bytes().all(|b| b.is_ascii_digit()) {
            InstanceShape::Numeric
        } else if name.contains(['[', ']']) {
            InstanceShape::Irregular
        } else {
            InstanceShape::Textual
        }
    }
}

/// Chooses the template an instance is built from.
///
/// Irregular names use the numeric template. This keeps a batch moving when
/// an odd tag slips through; it is logged, not reported as an error.
#[derive(Debug, Clone)]
pub struct TemplateSelector {
    numeric: TemplateId,
    textual: TemplateId,
}

impl TemplateSelector {
    pub fn new(numeric: impl Into<TemplateId>, textual: impl Into<TemplateId>) -> Self {
        Self {
            numeric: numeric.into(),
            textual: textual.into(),
        }
    }

    /// Creates a selector from the `[templates]` configuration section.
    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(config.numeric(), config.textual())
    }

    /// Returns the template for `instance_name`.
    pub fn select(&self, instance_name: &str) -> &TemplateId {
        match InstanceShape::of(instance_name) {
            InstanceShape::Numeric => &self.numeric,
            InstanceShape::Textual => &self.textual,
            InstanceShape::Irregular => {
                debug!(
                    instance_name,
                    template = self.numeric.as_str();
                    "Irregular instance name, using numeric template"
                );
                &self.numeric
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> TemplateSelector {
        TemplateSelector::new("AlarmsDINT", "AlarmsDINT2")
    }

    #[test]
    fn test_numeric_names() {
        assert_eq!(selector().select("0").as_str(), "AlarmsDINT");
        assert_eq!(selector().select("0123").as_str(), "AlarmsDINT");
    }

    #[test]
    fn test_textual_names() {
        for name in ["M1", "Motor", "12a", "Pump 3", "1.2"] {
            assert_eq!(selector().select(name).as_str(), "AlarmsDINT2", "{name}");
        }
    }

    #[test]
    fn test_irregular_names_fall_back_to_numeric() {
        for name in ["", "a[1]", "]", "x["] {
            assert_eq!(InstanceShape::of(name), InstanceShape::Irregular, "{name}");
            assert_eq!(selector().select(name).as_str(), "AlarmsDINT", "{name}");
        }
    }

    #[test]
    fn test_from_config() {
        let config = TemplateConfig::new("Num", "Text", "");
        let selector = TemplateSelector::from_config(&config);

        assert_eq!(selector.select("7").as_str(), "Num");
        assert_eq!(selector.select("seven").as_str(), "Text");
    }
}
