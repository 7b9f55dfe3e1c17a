// rlx-core/src/resolve.rs
use std::collections::HashSet;
use std::path::PathBuf;

use rlx_common::error::{Result, RlxError};
use rlx_common::{AppDescriptor, AppRegistry, Goal};
use tracing::{debug, error};

use crate::locate::LookupContext;
use crate::system_path::SystemPathRegistry;

/// Computes the dependency closure of a goal list.
///
/// The output lists every application after all of its dependencies, keeps
/// sibling order as declared, and contains each name at most once. A resolver
/// owns its seen set, so it is consumed by [`DependencyResolver::resolve_goals`]
/// and a fresh one is needed per release.
pub struct DependencyResolver<'a> {
    context: LookupContext<'a>,
    exclude: &'a HashSet<String>,
    seen: HashSet<String>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(context: LookupContext<'a>, exclude: &'a HashSet<String>) -> Self {
        Self {
            context,
            exclude,
            seen: HashSet::new(),
        }
    }

    pub fn resolve_goals(mut self, goals: &[Goal]) -> Result<Vec<AppDescriptor>> {
        debug!(
            "Starting dependency resolution for goals: {:?}",
            goals.iter().map(Goal::to_string).collect::<Vec<_>>()
        );
        let mut resolved = Vec::new();
        for goal in goals {
            // Top-level goals have no optional context: every miss is fatal.
            self.resolve_recursive(&goal.name, goal.vsn.as_deref(), None, &mut resolved)?;
        }
        debug!(
            "Resolved {} applications: {:?}",
            resolved.len(),
            resolved.iter().map(AppDescriptor::to_string).collect::<Vec<_>>()
        );
        Ok(resolved)
    }

    /// `parent` is whichever application referenced `name`; a miss is only
    /// tolerated when `name` is one of its optional dependencies.
    fn resolve_recursive(
        &mut self,
        name: &str,
        vsn: Option<&str>,
        parent: Option<&AppDescriptor>,
        resolved: &mut Vec<AppDescriptor>,
    ) -> Result<()> {
        // -------- memo + cycle guard --------------------------------------------------
        if self.seen.contains(name) {
            debug!("'{}' already resolved or in progress", name);
            return Ok(());
        }

        let Some(app) = self.context.locate(name, vsn)? else {
            if parent.is_some_and(|p| p.is_optional_dependency(name)) {
                // Not marked seen: another parent may still require it.
                debug!("Optional application '{}' not found, skipping", name);
                return Ok(());
            }
            error!(
                "Application '{}' ({}) not found",
                name,
                vsn.unwrap_or("any version")
            );
            return Err(RlxError::app_not_found(name, vsn));
        };

        // Marked before descending so cyclic graphs terminate.
        self.seen.insert(name.to_string());

        for dep in app.all_dependencies() {
            self.resolve_recursive(dep, None, Some(&app), resolved)?;
        }

        if self.exclude.contains(name) {
            debug!("Excluding '{}' from output, keeping its dependencies", name);
        } else {
            resolved.push(app);
        }
        Ok(())
    }
}

/// Resolves `goals` against the three lookup tiers, omitting `exclude`d
/// names from the output.
pub fn resolve(
    goals: &[Goal],
    registry: &AppRegistry,
    lib_dirs: &[PathBuf],
    check_system_path: bool,
    exclude: &HashSet<String>,
    system_path: &dyn SystemPathRegistry,
) -> Result<Vec<AppDescriptor>> {
    let context = LookupContext::new(registry, lib_dirs, check_system_path, system_path);
    DependencyResolver::new(context, exclude).resolve_goals(goals)
}
