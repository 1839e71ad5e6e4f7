//! Plan generation module.
//!
//! Builds the list of copy operations for one run:
//! 1. Render the tag and check it against the tag pattern
//! 2. Collect source files from include/exclude patterns
//! 3. Skip files that already carry a tag
//! 4. Resolve existing destinations with the conflict policy
//! 5. Reject destinations that are themselves sources of this run

use crate::core::context::Context;
use crate::core::scanner::collect_source_files;
use crate::core::tag::Tag;
use crate::models::config::{Config, OnConflict};
use crate::models::plan::Plan;
use crate::utils::fs::{stem_str, tagged_path};
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Plan generator.
pub struct Planner<'a> {
    config: &'a Config,
    tag: Tag,
}

impl<'a> Planner<'a> {
    /// Create a planner tagging with the current local time.
    ///
    /// Fails before touching the file system if the rendered tag does not
    /// fully match the configured tag pattern.
    pub fn new(config: &'a Config) -> Result<Self> {
        let tag = Tag::generate(&config.tag_format, &config.tag_pattern)?;
        Ok(Self::with_tag(config, tag))
    }

    /// Create a planner with a pre-rendered tag.
    pub fn with_tag(config: &'a Config, tag: Tag) -> Self {
        Self { config, tag }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Generate a plan for the files under `root_dir`.
    pub fn generate(&self, root_dir: &Path) -> Result<Plan> {
        tracing::debug!("Generating plan for {:?} with tag {:?}", root_dir, self.tag.as_str());

        let scan = collect_source_files(root_dir, &self.config.include, &self.config.exclude)?;
        let src_paths = &scan.files;

        let mut plan = Plan::new(root_dir, self.tag.as_str());
        let mut overwriting_src_paths: HashSet<PathBuf> = HashSet::new();
        let mut skipped_paths: HashSet<PathBuf> = HashSet::new();
        let mut conflict_skips = 0usize;

        for src_path in src_paths {
            if self.tag.is_tagged(&stem_str(src_path)) {
                tracing::info!("Skipping file with matched tag: {}", src_path.display());
                skipped_paths.insert(src_path.clone());
                continue;
            }

            let dest_path = tagged_path(src_path, self.tag.as_str());
            let mut overwrite_flag = false;

            if dest_path.exists() {
                if src_paths.contains(&dest_path) {
                    overwriting_src_paths.insert(dest_path.clone());
                }

                match self.config.on_conflict {
                    OnConflict::Error => {
                        return Err(crate::Error::DestinationExists(dest_path));
                    }
                    OnConflict::Skip => {
                        tracing::info!(
                            "Skipping existing destination file: {}",
                            dest_path.display()
                        );
                        conflict_skips += 1;
                        continue;
                    }
                    OnConflict::Overwrite => {
                        tracing::debug!(
                            "Overwriting existing destination file: {}",
                            dest_path.display()
                        );
                        overwrite_flag = true;
                    }
                }
            }

            let item = plan.push(src_path.clone(), dest_path, overwrite_flag);
            tracing::debug!("Planned {}", item);
        }

        check_same_run_conflicts(&overwriting_src_paths, &skipped_paths)?;

        tracing::debug!(
            "Planned {} of {} candidate files ({} already tagged, {} skipped on conflict)",
            plan.len(),
            src_paths.len(),
            skipped_paths.len(),
            conflict_skips
        );

        Ok(plan)
    }
}

/// Fail if any destination collides with a source that is still being archived.
///
/// A source that is itself tagged is skipped, so colliding with it is fine.
fn check_same_run_conflicts(
    overwriting_src_paths: &HashSet<PathBuf>,
    skipped_paths: &HashSet<PathBuf>,
) -> Result<()> {
    let mut conflicts: Vec<PathBuf> = overwriting_src_paths
        .difference(skipped_paths)
        .cloned()
        .collect();
    if conflicts.is_empty() {
        return Ok(());
    }
    conflicts.sort();
    Err(crate::Error::SameRunConflict(conflicts))
}

/// Generate a plan, logging through the context's sink (convenience function).
pub fn build_plan(config: &Config, root_dir: &Path, context: &Context) -> Result<Plan> {
    tracing::dispatcher::with_default(context.dispatch(), || {
        Planner::new(config)?.generate(root_dir)
    })
}
