//! UDT instantiation.
//!
//! An instance is built from the records that share one prefix and instance
//! name: their bit descriptions are collected, a template is selected by the
//! instance name, and the template's tag tree is copied with the descriptions
//! written into its bit slots.

use std::collections::HashMap;

use log::trace;

use tagtree_core::{record::TagRecord, template::TemplateStore, tree::UdtInstance};

use crate::{TagTreeError, select::TemplateSelector};

/// Collects `bit → description` from records that carry both.
///
/// When a bit appears more than once, the last description wins.
pub fn bit_descriptions(records: &[&TagRecord]) -> HashMap<String, String> {
    records
        .iter()
        .filter_map(|record| {
            let bit = record.bit()?;
            let description = record.description()?;
            Some((bit.to_string(), description.to_string()))
        })
        .collect()
}

/// An instance together with the number of descriptions that had no slot.
#[derive(Debug, Clone)]
pub struct Instantiated {
    pub instance: UdtInstance,
    pub unmatched_bits: usize,
}

/// Builds [`UdtInstance`]s from a [`TemplateStore`].
#[derive(Debug)]
pub struct Instantiator<'a> {
    selector: TemplateSelector,
    templates: &'a TemplateStore,
    namespace: &'a str,
}

impl<'a> Instantiator<'a> {
    /// Creates an instantiator.
    ///
    /// # Arguments
    ///
    /// * `selector` - Picks the template for each instance name.
    /// * `templates` - Loaded templates.
    /// * `namespace` - UDT type path used for the instances' `typeId`.
    pub fn new(selector: TemplateSelector, templates: &'a TemplateStore, namespace: &'a str) -> Self {
        Self {
            selector,
            templates,
            namespace,
        }
    }

    /// Builds the instance named `instance_name` from its records.
    ///
    /// # Errors
    ///
    /// Returns [`TagTreeError::MissingTemplate`] if the selected template is
    /// not in the store.
    pub fn instantiate(
        &self,
        instance_name: &str,
        records: &[&TagRecord],
    ) -> Result<Instantiated, TagTreeError> {
        let descriptions = bit_descriptions(records);
        let template_id = self.selector.select(instance_name);

        let template =
            self.templates
                .get(template_id.as_str())
                .ok_or_else(|| TagTreeError::MissingTemplate {
                    template: template_id.clone(),
                    instance: instance_name.to_string(),
                })?;

        let mut unmatched_bits = 0;
        for bit in descriptions.keys() {
            if !template.has_slot(bit) {
                trace!(
                    instance_name,
                    bit = bit.as_str(),
                    template = template_id.as_str();
                    "Bit has no placeholder in template"
                );
                unmatched_bits += 1;
            }
        }

        let tags = template.instantiate_tags(&descriptions);
        let instance = UdtInstance::new(instance_name, template_id.clone(), self.namespace, tags);

        Ok(Instantiated {
            instance,
            unmatched_bits,
        })
    }
}
