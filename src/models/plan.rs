//! Plan data model.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A single copy operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    /// 1-based position among the kept items.
    pub id: usize,
    /// Absolute path of the file to archive.
    pub src: PathBuf,
    /// Absolute path of the tagged copy.
    pub dest: PathBuf,
    /// Whether `dest` existed at planning time and will be replaced.
    pub overwrite_flag: bool,
}

impl fmt::Display for PlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {}",
            self.id,
            self.src.display(),
            self.dest.display()
        )?;
        if self.overwrite_flag {
            write!(f, " (overwrite)")?;
        }
        Ok(())
    }
}

/// Ordered list of copy operations produced by the planner.
///
/// A plan is immutable once built: items can only be added by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Creation timestamp.
    pub created_at: String,
    /// Directory the include patterns were resolved against.
    pub root_dir: PathBuf,
    /// Tag inserted into every destination name.
    pub tag: String,
    items: Vec<PlanItem>,
}

impl Plan {
    pub(crate) fn new(root_dir: &Path, tag: &str) -> Self {
        Self {
            created_at: chrono::Local::now().to_rfc3339(),
            root_dir: root_dir.to_path_buf(),
            tag: tag.to_string(),
            items: Vec::new(),
        }
    }

    /// Append an item with the next sequential id.
    pub(crate) fn push(&mut self, src: PathBuf, dest: PathBuf, overwrite_flag: bool) -> &PlanItem {
        let id = self.items.len() + 1;
        self.items.push(PlanItem {
            id,
            src,
            dest,
            overwrite_flag,
        });
        &self.items[id - 1]
    }

    /// Planned items, in id order.
    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PlanItem;
    type IntoIter = std::slice::Iter<'a, PlanItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Save a plan to a JSON file.
pub fn save_plan(plan: &Plan, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Plan saved to {:?}", path);
    Ok(())
}

/// Load a plan from a JSON file.
///
/// Reads back the file written by [`save_plan`] (`-o/--output`), so a saved
/// plan can be inspected or compared after the run.
pub fn load_plan(path: &Path) -> Result<Plan> {
    let content = fs::read_to_string(path)?;
    let plan: Plan = serde_json::from_str(&content)?;
    Ok(plan)
}
