//! Template store loading.
//!
//! Templates are exported UDT JSON documents. Each file becomes one template
//! named after its file stem, so `AlarmsDINT.json` provides `AlarmsDINT`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{info, warn};

use tagtree_core::template::{TemplateStore, UdtTemplate};

use crate::{TagTreeError, config::TemplateConfig};

/// Loads templates from files and directories.
///
/// A directory contributes every `*.json` file directly inside it, in file
/// name order. A template loaded later replaces an earlier one with the same
/// name.
///
/// # Errors
///
/// Returns an error if a path cannot be read or a file is not a valid
/// template document.
pub fn load_templates<P: AsRef<Path>>(
    paths: &[P],
    config: &TemplateConfig,
) -> Result<TemplateStore, TagTreeError> {
    let mut store = TemplateStore::new();

    for path in paths {
        for file in template_files(path.as_ref())? {
            let template = load_template_file(&file, config.placeholder_folder())?;
            info!(
                template = template.id().as_str(),
                path = file.display().to_string(),
                slots = template.slot_count();
                "Template loaded"
            );
            if let Some(previous) = store.insert(template) {
                warn!(template = previous.id().as_str(); "Template replaced by a later file");
            }
        }
    }

    Ok(store)
}

fn template_files(path: &Path) -> Result<Vec<PathBuf>, TagTreeError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let file = entry?.path();
        if file.is_file() && file.extension().and_then(|ext| ext.to_str()) == Some("json") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads one template file, named after its file stem.
pub fn load_template_file(path: &Path, placeholder_folder: &str) -> Result<UdtTemplate, TagTreeError> {
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot name a template after `{}`", path.display()),
            )
        })?;

    let json = fs::read_to_string(path)?;
    Ok(UdtTemplate::from_json(id, &json, placeholder_folder)?)
}
