/// Mirror code generator
///
/// Turns a `World` into offset-based edits: capability-bounded mirror types
/// appended to the modules of the annotated classes, a `reflect` dispatcher
/// inserted into each reflector's body, import additions for cross-module
/// visibility, and the rewrite of marker-module imports to the
/// reflection-runtime-free variant. All output is deterministic for a given
/// World; the naming state lives in a session constructed fresh per
/// closed-world unit.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;

use specula_model::{MethodDecl, ModuleId, ProgramModel, TypeId};

use crate::capability::{MARKER_MODULE_INFIX, STATIC_MARKER_MODULE_INFIX};
use crate::error::{Diagnostic, Result};
use crate::patch::PatchSet;
use crate::world::{ClassDomain, ReflectorDomain, World};

/// Role suffix of a generated mirror type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorRole {
    ClassMirror,
    InstanceMirror,
}

impl MirrorRole {
    fn suffix(self) -> &'static str {
        match self {
            MirrorRole::ClassMirror => "ClassMirror",
            MirrorRole::InstanceMirror => "InstanceMirror",
        }
    }
}

/// Per-unit naming state: the prefix cache and the disambiguation counter.
///
/// Constructed fresh at the start of every closed-world unit so that
/// repeated runs over identical input produce identical names. Never shared
/// across units.
#[derive(Debug, Default)]
pub struct NamingSession {
    prefixes: HashMap<(TypeId, TypeId), String>,
    counter: usize,
}

impl NamingSession {
    pub fn new() -> Self {
        NamingSession::default()
    }

    /// The prefix assigned to one class domain, identified by (reflector,
    /// class): a class annotated by two reflectors gets two distinct mirror
    /// sets. Minted on first request, cached for the session's lifetime.
    pub fn prefix_for(&mut self, reflector: TypeId, class: TypeId) -> String {
        if let Some(prefix) = self.prefixes.get(&(reflector, class)) {
            return prefix.clone();
        }
        let prefix = format!("_m{}", self.counter);
        self.counter += 1;
        self.prefixes.insert((reflector, class), prefix.clone());
        prefix
    }

    /// `<prefix>_<AnnotatedClassLocalName>_<role>`.
    pub fn mirror_name(
        &mut self,
        reflector: TypeId,
        class: TypeId,
        local_name: &str,
        role: MirrorRole,
    ) -> String {
        format!(
            "{}_{}_{}",
            self.prefix_for(reflector, class),
            local_name,
            role.suffix()
        )
    }
}

pub struct MirrorGenerator<'a, M: ProgramModel> {
    model: &'a M,
    session: &'a mut NamingSession,
    /// Modules that already carry the generated-code banner.
    bannered: HashSet<ModuleId>,
}

impl<'a, M: ProgramModel> MirrorGenerator<'a, M> {
    pub fn new(model: &'a M, session: &'a mut NamingSession) -> Self {
        MirrorGenerator {
            model,
            session,
            bannered: HashSet::new(),
        }
    }

    /// Produce the full edit set for one unit's World.
    pub fn generate(
        &mut self,
        world: &World,
        unit: &[ModuleId],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<BTreeMap<ModuleId, PatchSet>> {
        let mut patches: BTreeMap<ModuleId, PatchSet> = BTreeMap::new();
        self.rewrite_marker_directives(unit, &mut patches, diagnostics);
        for domain in world.domains() {
            self.generate_domain(domain, &mut patches)?;
        }
        Ok(patches)
    }

    /// Rewrite every import/export of the marker module to the runtime-free
    /// variant. Directives with member filters or deferred loading are
    /// unsupported scoping forms: reported, edit skipped.
    fn rewrite_marker_directives(
        &self,
        unit: &[ModuleId],
        patches: &mut BTreeMap<ModuleId, PatchSet>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for &module in unit {
            let decl = self.model.module(module);
            for directive in &decl.directives {
                if !directive.uri.contains(MARKER_MODULE_INFIX) {
                    continue;
                }
                if directive.has_combinators || directive.is_deferred {
                    diagnostics.push(
                        Diagnostic::error(
                            &decl.name,
                            "marker-module directives with member filters or deferred \
                             loading are not supported; directive left unchanged",
                        )
                        .at_offset(directive.offset),
                    );
                    continue;
                }
                let rewritten = directive
                    .uri
                    .replace(MARKER_MODULE_INFIX, STATIC_MARKER_MODULE_INFIX);
                patches.entry(module).or_default().replace(
                    directive.offset,
                    directive.length,
                    rewritten,
                );
            }
        }
    }

    fn generate_domain(
        &mut self,
        domain: &ReflectorDomain,
        patches: &mut BTreeMap<ModuleId, PatchSet>,
    ) -> Result<()> {
        // Cross-module visibility first: the dispatcher references classes
        // and mirrors declared elsewhere.
        let reflector_module = self.model.module(domain.module);
        for &needed in &domain.missing_imports {
            let uri = self.model.import_uri(domain.module, needed);
            patches.entry(domain.module).or_default().insert(
                reflector_module.directive_insert_offset,
                format!("import \"{uri}\";\n"),
            );
        }

        let mut dispatch_arms = String::new();
        for class_domain in &domain.classes {
            let class_decl = self.model.type_decl(class_domain.class);
            let class_mirror = self.session.mirror_name(
                domain.reflector,
                class_domain.class,
                &class_decl.name,
                MirrorRole::ClassMirror,
            );
            let instance_mirror = self.session.mirror_name(
                domain.reflector,
                class_domain.class,
                &class_decl.name,
                MirrorRole::InstanceMirror,
            );

            let patch = patches.entry(class_decl.module).or_default();
            if self.bannered.insert(class_decl.module) {
                patch.append("// Mirrors generated by specula. Do not edit.");
            }
            patch.append(emit_class_mirror(&class_mirror, class_domain, class_decl.name.as_str())?);
            patch.append(emit_instance_mirror(
                &instance_mirror,
                class_domain,
                class_decl.name.as_str(),
                domain,
            )?);

            write!(
                dispatch_arms,
                "    if (instance.runtimeType == {name}) {{\n      \
                 return {instance_mirror}(instance as {name});\n    }}\n",
                name = class_decl.name,
            )?;
        }

        let reflector_decl = self.model.type_decl(domain.reflector);
        let mut dispatcher = String::new();
        write!(
            dispatcher,
            "\n  InstanceMirrorBase reflect(Object instance) {{\n\
             {dispatch_arms}    throw UnexpectedReflecteeError(instance);\n  }}\n",
        )?;
        patches
            .entry(domain.module)
            .or_default()
            .insert(reflector_decl.body_insert_offset, dispatcher);
        Ok(())
    }
}

/// The class-shape mirror: a minimal type carrying the member-name list, the
/// extension point for introspection operations.
fn emit_class_mirror(
    mirror_name: &str,
    class_domain: &ClassDomain,
    class_name: &str,
) -> Result<String> {
    let member_names = class_domain
        .invokable
        .iter()
        .map(|m| format!("\"{}\"", m.name))
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = String::new();
    write!(
        out,
        "class {mirror_name} extends ClassMirrorBase {{\n  \
         const {mirror_name}();\n\n  \
         String get simpleName => \"{class_name}\";\n\n  \
         List<String> get declaredMemberNames => const [{member_names}];\n}}\n",
    )?;
    Ok(out)
}

/// The instance mirror: wraps one reflectee and implements `invoke` over the
/// capability-filtered member set. Denial under the capability set and
/// native absence of a granted member are distinct failures and must stay
/// distinct.
fn emit_instance_mirror(
    mirror_name: &str,
    class_domain: &ClassDomain,
    class_name: &str,
    domain: &ReflectorDomain,
) -> Result<String> {
    let mut out = String::new();
    write!(
        out,
        "class {mirror_name} extends InstanceMirrorBase {{\n  \
         {mirror_name}(this.reflectee);\n\n  \
         final {class_name} reflectee;\n\n  \
         Object? invoke(String memberName, List positionalArgs,\n      \
         [Map<String, Object?> namedArgs = const {{}}]) {{\n    \
         switch (memberName) {{\n",
    )?;
    for method in &class_domain.invokable {
        write!(
            out,
            "      case \"{}\":\n        return {};\n",
            method.name,
            forward_call(method)
        )?;
    }
    out.push_str("    }\n");
    if domain.capabilities.has_blanket_instance_invoke() {
        // A blanket grant authorizes names we never saw at generation time.
        // Those go to native dynamic dispatch (unimplemented passthrough),
        // where a genuinely absent member fails with the native error.
        write!(
            out,
            "    return dynamicDispatch(reflectee, memberName, positionalArgs, namedArgs);\n",
        )?;
    } else {
        write!(
            out,
            "    throw CapabilityDeniedError(\"{class_name}\", memberName);\n",
        )?;
    }
    out.push_str("  }\n}\n");
    Ok(out)
}

fn forward_call(method: &MethodDecl) -> String {
    let mut args: Vec<String> = method
        .positional_params
        .iter()
        .enumerate()
        .map(|(i, _)| format!("positionalArgs[{i}]"))
        .collect();
    args.extend(
        method
            .named_params
            .iter()
            .map(|n| format!("{n}: namedArgs[\"{n}\"]")),
    );
    format!("reflectee.{}({})", method.name, args.join(", "))
}
