/// Transformer driver
///
/// Orchestrates the pipeline for a list of program entry points: resolve the
/// closed-world unit, build its World, generate mirror code, apply the edits.
/// Pure function of (Program Model, entry points); all I/O belongs to the
/// surrounding build pipeline.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use specula_model::ProgramModel;

use crate::codegen::{MirrorGenerator, NamingSession};
use crate::error::{Diagnostic, Result};
use crate::world::WorldBuilder;

/// Options for a transformer run.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Print progress to stderr.
    pub verbose: bool,
}

impl TransformOptions {
    pub fn new() -> Self {
        TransformOptions::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Result of one transformer run over all entry points.
#[derive(Debug, Default, Serialize)]
pub struct TransformOutput {
    /// Rewritten source per transformed module, keyed by module name.
    /// Untouched modules are absent.
    pub modules: HashMap<String, String>,
    /// Everything reported along the way, in report order.
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformOutput {
    pub fn was_transformed(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    pub fn rewritten(&self, module: &str) -> Option<&str> {
        self.modules.get(module).map(String::as_str)
    }
}

/// The reflection transformer.
pub struct Transformer {
    options: TransformOptions,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Transformer { options }
    }

    /// Transform every closed-world unit rooted at the given entry points.
    ///
    /// Units are processed independently and in order; the naming session is
    /// reset for each one. A module reachable from two entry points is
    /// transformed at most once: a second conflicting transformation is
    /// rejected per module with a diagnostic, and the first result stands.
    pub fn transform<M: ProgramModel>(
        &self,
        model: &M,
        entry_points: &[&str],
    ) -> Result<TransformOutput> {
        let mut output = TransformOutput::default();
        let mut transformed: HashSet<String> = HashSet::new();

        for &entry in entry_points {
            let Some(entry_id) = model.find_module_by_name(entry) else {
                output
                    .diagnostics
                    .push(Diagnostic::error(entry, "entry point module not found"));
                continue;
            };
            let unit = model.reachable_modules(entry_id);
            if self.options.verbose {
                eprintln!("specula: unit `{entry}`: {} modules", unit.len());
            }

            let builder = WorldBuilder::new(model);
            let Some(world) = builder.build(&unit, &mut output.diagnostics)? else {
                if self.options.verbose {
                    eprintln!("specula: unit `{entry}`: no marker type, skipped");
                }
                continue;
            };

            let mut session = NamingSession::new();
            let mut generator = MirrorGenerator::new(model, &mut session);
            let patches = generator.generate(&world, &unit, &mut output.diagnostics)?;

            for (module_id, patch) in patches {
                if patch.is_empty() {
                    continue;
                }
                let decl = model.module(module_id);
                if transformed.contains(&decl.name) {
                    output.diagnostics.push(Diagnostic::warning(
                        &decl.name,
                        format!(
                            "module is reachable from entry point `{entry}` but was already \
                             transformed by an earlier entry point; keeping the first result"
                        ),
                    ));
                    continue;
                }
                let rewritten = patch.apply(&decl.name, &decl.source)?;
                transformed.insert(decl.name.clone());
                output.modules.insert(decl.name.clone(), rewritten);
            }

            if self.options.verbose {
                eprintln!(
                    "specula: unit `{entry}`: {} domains, {} modules rewritten so far",
                    world.domains().len(),
                    output.modules.len()
                );
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder() {
        let options = TransformOptions::new().verbose(true);
        assert!(options.verbose);
    }

    #[test]
    fn output_queries() {
        let mut output = TransformOutput::default();
        output.modules.insert("app".into(), "rewritten".into());
        assert!(output.was_transformed("app"));
        assert_eq!(output.rewritten("app"), Some("rewritten"));
        assert!(!output.was_transformed("lib"));
    }
}
