/// World builder
///
/// Scans one closed-world unit of the Program Model for reflection requests:
/// classes annotated with a constant instance of a direct subtype of the
/// reflection marker type. Each such subtype is a reflector identity and owns
/// exactly one capability set, computed from the single list argument of its
/// constructor's super call. The result is a `World`: every reflector domain
/// with its annotated classes and their capability-filtered invokable
/// members, plus the cross-module imports the generated dispatchers will
/// need.

use std::collections::{BTreeSet, HashSet};

use specula_model::{ConstExpr, MethodDecl, ModuleId, ProgramModel, TypeId};

use crate::capability::{CapabilitySet, MARKER_CAPABILITIES_FIELD, MARKER_TYPE_NAME};
use crate::constant::{ConstantResolver, Reduced};
use crate::error::{Diagnostic, Result, TransformError};

/// One annotated class under a reflector domain.
#[derive(Debug)]
pub struct ClassDomain {
    pub class: TypeId,
    /// Instance methods the capability set authorizes, own and inherited,
    /// operators excluded. Overriding declarations shadow ancestor ones.
    pub invokable: Vec<MethodDecl>,
}

/// One reflector identity with everything it reflects.
#[derive(Debug)]
pub struct ReflectorDomain {
    pub reflector: TypeId,
    /// Module declaring the reflector; generated dispatch code lands here.
    pub module: ModuleId,
    pub capabilities: CapabilitySet,
    pub classes: Vec<ClassDomain>,
    /// Modules declaring this domain's classes, minus the reflector's own
    /// module. Deduplicated, deterministic order. Filled by the post-pass.
    pub missing_imports: Vec<ModuleId>,
}

/// The complete result of one closed-world scan.
#[derive(Debug)]
pub struct World {
    pub marker: TypeId,
    domains: Vec<ReflectorDomain>,
}

impl World {
    pub fn domains(&self) -> &[ReflectorDomain] {
        &self.domains
    }

    /// Domains owned by (declared in) the given module.
    pub fn domains_in(&self, module: ModuleId) -> impl Iterator<Item = &ReflectorDomain> {
        self.domains.iter().filter(move |d| d.module == module)
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// A domain slot during the scan. Abandoned slots keep their reflector id so
/// later classes under the same reflector are skipped without a second
/// diagnostic.
enum DomainSlot {
    Live(ReflectorDomain),
    Abandoned(TypeId),
}

pub struct WorldBuilder<'a, M: ProgramModel> {
    model: &'a M,
    resolver: ConstantResolver<'a, M>,
}

impl<'a, M: ProgramModel> WorldBuilder<'a, M> {
    pub fn new(model: &'a M) -> Self {
        WorldBuilder {
            model,
            resolver: ConstantResolver::new(model),
        }
    }

    /// Build the world for one closed-world unit. Returns `None` when the
    /// unit does not contain the reflection marker type at all; such a unit
    /// is skipped, not failed.
    pub fn build(
        &self,
        unit: &[ModuleId],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<World>> {
        let Some(marker) = self.find_marker(unit) else {
            return Ok(None);
        };

        let mut slots: Vec<DomainSlot> = Vec::new();

        for &module in unit {
            for &class in self.model.module(module).types.iter() {
                for annotation in &self.model.type_decl(class).annotations {
                    let Some(reflector) = self.resolver.annotation_type(module, &annotation.expr)
                    else {
                        // Not a shape we can type; ignored by design.
                        continue;
                    };
                    match self.marker_relation(reflector, marker) {
                        MarkerRelation::Direct => {}
                        MarkerRelation::Indirect => {
                            diagnostics.push(Diagnostic::error(
                                &self.model.module(module).name,
                                format!(
                                    "reflector `{}` extends `{}` only indirectly; \
                                     reflectors must extend it directly",
                                    self.model.type_decl(reflector).name,
                                    MARKER_TYPE_NAME,
                                ),
                            ));
                            continue;
                        }
                        MarkerRelation::Unrelated => continue,
                    }
                    self.record_class(&mut slots, reflector, class, diagnostics)?;
                }
            }
        }

        let mut domains: Vec<ReflectorDomain> = slots
            .into_iter()
            .filter_map(|slot| match slot {
                DomainSlot::Live(domain) => Some(domain),
                DomainSlot::Abandoned(_) => None,
            })
            .collect();

        // Post-pass: which modules must become visible to each reflector's
        // module so the dispatcher can reference classes and their mirrors.
        for domain in &mut domains {
            let mut needed: BTreeSet<ModuleId> = BTreeSet::new();
            for class in &domain.classes {
                let declared_in = self.model.declaring_module(class.class);
                if declared_in != domain.module {
                    needed.insert(declared_in);
                }
            }
            domain.missing_imports = needed.into_iter().collect();
        }

        Ok(Some(World { marker, domains }))
    }

    /// Locate the reflection marker type: the expected name plus a content
    /// fingerprint (a `capabilities` field and a single const constructor).
    /// Name alone is unreliable across modules.
    fn find_marker(&self, unit: &[ModuleId]) -> Option<TypeId> {
        for &module in unit {
            for &t in self.model.module(module).types.iter() {
                let decl = self.model.type_decl(t);
                if decl.name == MARKER_TYPE_NAME
                    && decl.fields.iter().any(|f| f == MARKER_CAPABILITIES_FIELD)
                    && decl.constructors.len() == 1
                    && decl.constructors[0].is_const
                {
                    return Some(t);
                }
            }
        }
        None
    }

    fn marker_relation(&self, reflector: TypeId, marker: TypeId) -> MarkerRelation {
        let mut depth = 0usize;
        // Guards against a malformed model with a cyclic supertype chain.
        let mut visited: HashSet<TypeId> = HashSet::new();
        let mut current = self.model.direct_supertype(reflector);
        while let Some(ancestor) = current {
            if !visited.insert(ancestor) {
                return MarkerRelation::Unrelated;
            }
            depth += 1;
            if self.model.is_same_declaration(ancestor, marker) {
                return if depth == 1 {
                    MarkerRelation::Direct
                } else {
                    MarkerRelation::Indirect
                };
            }
            current = self.model.direct_supertype(ancestor);
        }
        MarkerRelation::Unrelated
    }

    /// Attach `class` to the domain of `reflector`, creating the domain (and
    /// its capability set) on first sight.
    fn record_class(
        &self,
        slots: &mut Vec<DomainSlot>,
        reflector: TypeId,
        class: TypeId,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let index = slots.iter().position(|slot| {
            let id = match slot {
                DomainSlot::Live(d) => d.reflector,
                DomainSlot::Abandoned(id) => *id,
            };
            self.model.is_same_declaration(id, reflector)
        });

        let index = match index {
            Some(i) => i,
            None => {
                let module = self.model.declaring_module(reflector);
                let module_name = self.model.module(module).name.clone();
                let capabilities = match self.capability_set(reflector) {
                    Ok(set) => set,
                    Err(error @ TransformError::Invariant(_)) => return Err(error),
                    Err(error) => {
                        diagnostics.push(Diagnostic::error(&module_name, error.to_string()));
                        slots.push(DomainSlot::Abandoned(reflector));
                        return Ok(());
                    }
                };
                for kind in capabilities.unsupported_kinds() {
                    diagnostics.push(Diagnostic::warning(
                        &module_name,
                        format!("capability kind `{kind}` is recognized but not yet supported"),
                    ));
                }
                if capabilities.has_unsupported_invoke_refinement() {
                    diagnostics.push(Diagnostic::error(
                        &module_name,
                        format!(
                            "reflector `{}` requests an unimplemented invoke refinement; \
                             its domain is skipped",
                            self.model.type_decl(reflector).name
                        ),
                    ));
                    slots.push(DomainSlot::Abandoned(reflector));
                    return Ok(());
                }
                slots.push(DomainSlot::Live(ReflectorDomain {
                    reflector,
                    module,
                    capabilities,
                    classes: Vec::new(),
                    missing_imports: Vec::new(),
                }));
                slots.len() - 1
            }
        };

        let DomainSlot::Live(domain) = &mut slots[index] else {
            return Ok(());
        };
        // A class annotated twice with the same reflector is one membership.
        if domain
            .classes
            .iter()
            .any(|c| self.model.is_same_declaration(c.class, class))
        {
            return Ok(());
        }
        let invokable = self.invokable_members(class, &domain.capabilities)?;
        domain.classes.push(ClassDomain { class, invokable });
        Ok(())
    }

    /// Compute a reflector's capability set from its constructor.
    ///
    /// The required shape is an invariant, not a per-unit recoverable
    /// condition: exactly one default constructor whose super call passes
    /// exactly one list-valued argument. Individual list elements that fail
    /// to resolve are shape errors handled by the caller.
    fn capability_set(&self, reflector: TypeId) -> Result<CapabilitySet> {
        let decl = self.model.type_decl(reflector);
        let scope = self.model.declaring_module(reflector);
        if decl.constructors.len() != 1 {
            return Err(TransformError::invariant(format!(
                "reflector `{}` must declare exactly one constructor, found {}",
                decl.name,
                decl.constructors.len()
            )));
        }
        let ctor = &decl.constructors[0];
        if !ctor.is_const {
            return Err(TransformError::invariant(format!(
                "reflector `{}` constructor must be const",
                decl.name
            )));
        }
        if ctor.param_count != 0 {
            return Err(TransformError::invariant(format!(
                "reflector `{}` constructor must take no parameters",
                decl.name
            )));
        }
        if ctor.super_args.len() != 1 {
            return Err(TransformError::invariant(format!(
                "reflector `{}` super call must pass exactly one argument, found {}",
                decl.name,
                ctor.super_args.len()
            )));
        }
        let elements = match self.resolver.reduce(scope, &ctor.super_args[0])? {
            Reduced::Irreducible(ConstExpr::ListLit(elements)) => elements,
            _ => {
                return Err(TransformError::invariant(format!(
                    "reflector `{}` super-call argument must be a capability list",
                    decl.name
                )));
            }
        };
        let mut tokens = Vec::with_capacity(elements.len());
        for element in elements {
            tokens.push(self.resolver.resolve_capability(scope, element)?);
        }
        Ok(CapabilitySet::new(tokens))
    }

    /// Own and ancestor instance methods, operators excluded, filtered by
    /// the domain's capability set.
    fn invokable_members(&self, class: TypeId, capabilities: &CapabilitySet) -> Result<Vec<MethodDecl>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut invokable = Vec::new();
        let mut visited: HashSet<TypeId> = HashSet::new();
        let mut current = Some(class);
        while let Some(t) = current {
            if !visited.insert(t) {
                break;
            }
            for method in &self.model.type_decl(t).methods {
                if method.is_operator || method.is_static {
                    continue;
                }
                if !seen.insert(method.name.clone()) {
                    continue;
                }
                if capabilities.supports_instance_invoke(&method.name)? {
                    invokable.push(method.clone());
                }
            }
            current = self.model.direct_supertype(t);
        }
        Ok(invokable)
    }
}

enum MarkerRelation {
    Direct,
    Indirect,
    Unrelated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use specula_model::{ConstExpr, Constructor, Program, ProgramBuilder};

    /// A program with the marker module, the capability vocabulary, and an
    /// `app` module ready for reflectors and annotated classes.
    struct Fixture {
        b: ProgramBuilder,
        app: ModuleId,
        marker: TypeId,
        instance_invoke_cap: TypeId,
        invoking_cap: TypeId,
        meta_cap: TypeId,
    }

    fn fixture() -> Fixture {
        let mut b = ProgramBuilder::new();
        let reflect = b.add_module("reflectable", "package:reflect/reflectable.lang", "");
        let marker = b.add_class(reflect, "Reflectable", None);
        b.add_field(marker, "capabilities");
        b.add_constructor(
            marker,
            Constructor {
                param_count: 1,
                is_const: true,
                super_args: vec![],
            },
        );
        let vocab = b.add_module("capability", "package:reflect/capability.lang", "");
        let instance_invoke_cap = b.add_class(vocab, "InstanceInvokeCapability", None);
        let invoking_cap = b.add_class(vocab, "InvokingCapability", None);
        let meta_cap = b.add_class(vocab, "InstanceInvokeMetaCapability", None);
        let app = b.add_module("app", "package:demo/app.lang", "");
        b.link_import(app, reflect);
        b.link_import(app, vocab);
        Fixture {
            b,
            app,
            marker,
            instance_invoke_cap,
            invoking_cap,
            meta_cap,
        }
    }

    impl Fixture {
        /// Reflector with the canonical constructor shape.
        fn add_reflector(&mut self, module: ModuleId, name: &str, caps: Vec<ConstExpr>) -> TypeId {
            let reflector = self.b.add_class(module, name, Some(self.marker));
            self.b.add_constructor(
                reflector,
                Constructor {
                    param_count: 0,
                    is_const: true,
                    super_args: vec![ConstExpr::ListLit(caps)],
                },
            );
            reflector
        }

        fn build(self) -> (Program, Vec<ModuleId>) {
            let program = self.b.finish();
            let unit = program.modules();
            (program, unit)
        }
    }

    fn build_world(program: &Program, unit: &[ModuleId]) -> (Option<World>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let world = WorldBuilder::new(program)
            .build(unit, &mut diagnostics)
            .unwrap();
        (world, diagnostics)
    }

    #[test]
    fn unit_without_marker_is_skipped() {
        let mut b = ProgramBuilder::new();
        let app = b.add_module("app", "package:demo/app.lang", "");
        b.add_class(app, "A", None);
        let program = b.finish();
        let (world, diagnostics) = build_world(&program, &[app]);
        assert!(world.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn lookalike_marker_without_fingerprint_does_not_count() {
        let mut b = ProgramBuilder::new();
        let fake = b.add_module("fake", "package:other/reflectable.lang", "");
        // Right name, no capabilities field, no const constructor.
        b.add_class(fake, "Reflectable", None);
        let program = b.finish();
        let (world, _) = build_world(&program, &[fake]);
        assert!(world.is_none());
    }

    #[test]
    fn classes_sharing_a_reflector_land_in_one_domain() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate(f.invoking_cap);
        let reflector = f.add_reflector(app, "MyReflector", vec![cap]);
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::instantiate(reflector));
        let bb = f.b.add_class(app, "B", None);
        f.b.add_annotation(bb, ConstExpr::instantiate(reflector));
        let (program, unit) = f.build();

        let (world, diagnostics) = build_world(&program, &unit);
        let world = world.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(world.domains().len(), 1);
        let domain = &world.domains()[0];
        assert_eq!(domain.reflector, reflector);
        assert_eq!(domain.classes.len(), 2);
        assert!(domain.capabilities.has_blanket_instance_invoke());
        assert_eq!(world.domains_in(app).count(), 1);
    }

    #[test]
    fn annotation_through_constant_indirection_is_recognized() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate(f.invoking_cap);
        let reflector = f.add_reflector(app, "MyReflector", vec![cap]);
        f.b.add_constant(
            app,
            "myReflector",
            Some(ConstExpr::instantiate(reflector)),
        );
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::Identifier("myReflector".into()));
        let (program, unit) = f.build();

        let (world, _) = build_world(&program, &unit);
        assert_eq!(world.unwrap().domains().len(), 1);
    }

    #[test]
    fn indirect_marker_subtype_is_rejected_with_a_diagnostic() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate(f.invoking_cap);
        let direct = f.add_reflector(app, "Base", vec![cap]);
        let indirect = f.b.add_class(app, "Sub", Some(direct));
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::instantiate(indirect));
        let (program, unit) = f.build();

        let (world, diagnostics) = build_world(&program, &unit);
        assert!(world.unwrap().is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("only indirectly"));
    }

    #[test]
    fn unrelated_annotations_are_ignored() {
        let mut f = fixture();
        let app = f.app;
        let plain = f.b.add_class(app, "Deprecated", None);
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::instantiate(plain));
        f.b.add_annotation(a, ConstExpr::Opaque);
        let (program, unit) = f.build();

        let (world, diagnostics) = build_world(&program, &unit);
        assert!(world.unwrap().is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn malformed_constructor_shape_is_fatal() {
        let mut f = fixture();
        let app = f.app;
        let reflector = f.b.add_class(app, "Bad", Some(f.marker));
        f.b.add_constructor(
            reflector,
            Constructor {
                param_count: 0,
                is_const: true,
                super_args: vec![ConstExpr::ListLit(vec![]), ConstExpr::ListLit(vec![])],
            },
        );
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::instantiate(reflector));
        let (program, unit) = f.build();

        let mut diagnostics = Vec::new();
        let err = WorldBuilder::new(&program)
            .build(&unit, &mut diagnostics)
            .unwrap_err();
        assert!(matches!(err, TransformError::Invariant(_)));
    }

    #[test]
    fn non_const_reflector_constructor_is_fatal() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate(f.invoking_cap);
        let reflector = f.b.add_class(app, "Runtime", Some(f.marker));
        f.b.add_constructor(
            reflector,
            Constructor {
                param_count: 0,
                is_const: false,
                super_args: vec![ConstExpr::ListLit(vec![cap])],
            },
        );
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::instantiate(reflector));
        let (program, unit) = f.build();

        let mut diagnostics = Vec::new();
        let err = WorldBuilder::new(&program)
            .build(&unit, &mut diagnostics)
            .unwrap_err();
        assert!(matches!(err, TransformError::Invariant(_)));
        assert!(err.to_string().contains("must be const"));
    }

    #[test]
    fn unresolvable_capability_abandons_only_that_domain() {
        let mut f = fixture();
        let app = f.app;
        // A "constant" without a compile-time initializer.
        f.b.add_constant(app, "notConst", None);
        let broken = f.add_reflector(
            app,
            "Broken",
            vec![ConstExpr::Identifier("notConst".into())],
        );
        let ok_cap = ConstExpr::instantiate(f.invoking_cap);
        let healthy = f.add_reflector(app, "Healthy", vec![ok_cap]);
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::instantiate(broken));
        let bb = f.b.add_class(app, "B", None);
        f.b.add_annotation(bb, ConstExpr::instantiate(healthy));
        let (program, unit) = f.build();

        let (world, diagnostics) = build_world(&program, &unit);
        let world = world.unwrap();
        assert_eq!(world.domains().len(), 1);
        assert_eq!(world.domains()[0].reflector, healthy);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("not a compile-time constant"));
    }

    #[test]
    fn unimplemented_invoke_refinement_abandons_the_domain() {
        let mut f = fixture();
        let app = f.app;
        let caps = vec![
            ConstExpr::instantiate(f.invoking_cap),
            ConstExpr::instantiate(f.meta_cap),
        ];
        let reflector = f.add_reflector(app, "MetaReflector", caps);
        let a = f.b.add_class(app, "A", None);
        f.b.add_annotation(a, ConstExpr::instantiate(reflector));
        let (program, unit) = f.build();

        let (world, diagnostics) = build_world(&program, &unit);
        assert!(world.unwrap().is_empty());
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("unimplemented invoke refinement")));
    }

    #[test]
    fn invokable_members_union_ancestors_and_exclude_operators() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate(f.invoking_cap);
        let reflector = f.add_reflector(app, "MyReflector", vec![cap]);
        let base = f.b.add_class(app, "Base", None);
        f.b.add_method(base, MethodDecl::instance("inherited", &[]));
        f.b.add_method(base, MethodDecl::instance("overridden", &["x"]));
        let sub = f.b.add_class(app, "Sub", Some(base));
        f.b.add_method(sub, MethodDecl::instance("own", &[]));
        f.b.add_method(sub, MethodDecl::instance("overridden", &[]));
        f.b.add_method(sub, MethodDecl::operator("+"));
        f.b.add_method(sub, MethodDecl::static_method("create", &[]));
        f.b.add_annotation(sub, ConstExpr::instantiate(reflector));
        let (program, unit) = f.build();

        let (world, _) = build_world(&program, &unit);
        let world = world.unwrap();
        let names: Vec<&str> = world.domains()[0].classes[0]
            .invokable
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["own", "overridden", "inherited"]);
        // The subclass override shadows the ancestor declaration.
        let overridden = &world.domains()[0].classes[0].invokable[1];
        assert!(overridden.positional_params.is_empty());
    }

    #[test]
    fn cyclic_supertype_chain_terminates() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate(f.invoking_cap);
        let reflector = f.add_reflector(app, "MyReflector", vec![cap]);
        // A malformed model where two classes name each other as supertype.
        let a = f.b.add_class(app, "A", None);
        let bb = f.b.add_class(app, "B", Some(a));
        f.b.set_supertype(a, Some(bb));
        f.b.add_method(a, MethodDecl::instance("fromA", &[]));
        f.b.add_method(bb, MethodDecl::instance("fromB", &[]));
        f.b.add_annotation(a, ConstExpr::instantiate(reflector));
        let (program, unit) = f.build();

        let (world, diagnostics) = build_world(&program, &unit);
        let world = world.unwrap();
        assert!(diagnostics.is_empty());
        let names: Vec<&str> = world.domains()[0].classes[0]
            .invokable
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["fromA", "fromB"]);
    }

    #[test]
    fn name_scoped_capability_filters_members() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate_with_name(f.instance_invoke_cap, "arg0");
        let reflector = f.add_reflector(app, "Scoped", vec![cap]);
        let a = f.b.add_class(app, "A", None);
        f.b.add_method(a, MethodDecl::instance("arg0", &[]));
        f.b.add_method(a, MethodDecl::instance("arg1", &["x"]));
        f.b.add_annotation(a, ConstExpr::instantiate(reflector));
        let (program, unit) = f.build();

        let (world, _) = build_world(&program, &unit);
        let world = world.unwrap();
        let names: Vec<&str> = world.domains()[0].classes[0]
            .invokable
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["arg0"]);
    }

    #[test]
    fn missing_imports_exclude_the_reflectors_module() {
        let mut f = fixture();
        let app = f.app;
        let cap = ConstExpr::instantiate(f.invoking_cap);
        let reflector = f.add_reflector(app, "Wide", vec![cap]);
        let m1 = f.b.add_module("m1", "package:demo/m1.lang", "");
        let m2 = f.b.add_module("m2", "package:demo/m2.lang", "");
        let m3 = f.b.add_module("m3", "package:demo/m3.lang", "");
        f.b.link_import(app, m1);
        f.b.link_import(app, m2);
        f.b.link_import(app, m3);
        for (module, name) in [(m1, "C1"), (m2, "C2"), (m3, "C3"), (m2, "C4"), (app, "Local")] {
            let c = f.b.add_class(module, name, None);
            f.b.add_annotation(c, ConstExpr::instantiate(reflector));
        }
        let (program, unit) = f.build();

        let (world, _) = build_world(&program, &unit);
        let world = world.unwrap();
        let domain = &world.domains()[0];
        assert_eq!(domain.classes.len(), 5);
        assert_eq!(domain.missing_imports, vec![m1, m2, m3]);
    }
}
