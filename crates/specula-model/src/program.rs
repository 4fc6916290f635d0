/// The `ProgramModel` query interface and its in-memory implementation
///
/// The transformer is written against the trait; `Program`/`ProgramBuilder`
/// exist so the build pipeline (and the test suite) can assemble a resolved
/// program without a real front end.

use std::collections::HashSet;

use crate::model::{
    Annotation, ConstExpr, Constant, ConstantId, Constructor, Directive, DirectiveKind,
    MethodDecl, ModuleDecl, ModuleId, TypeDecl, TypeId,
};

/// Read-only queries over a resolved host program.
///
/// Type identity and subtyping are exposed as explicit methods
/// (`is_same_declaration`, `direct_supertype`) rather than relying on id
/// equality at call sites, so a model backed by a real resolver can answer
/// them however it needs to.
pub trait ProgramModel {
    /// All modules of the program.
    fn modules(&self) -> Vec<ModuleId>;

    /// Module declaration by id.
    fn module(&self, id: ModuleId) -> &ModuleDecl;

    /// Type declaration by id.
    fn type_decl(&self, id: TypeId) -> &TypeDecl;

    /// Constant declaration by id.
    fn constant(&self, id: ConstantId) -> &Constant;

    /// Look up a module by its short name.
    fn find_module_by_name(&self, name: &str) -> Option<ModuleId>;

    /// Direct supertype of a type, `None` for the universal root.
    fn direct_supertype(&self, t: TypeId) -> Option<TypeId> {
        self.type_decl(t).supertype
    }

    /// Whether two type references denote the same declaration.
    fn is_same_declaration(&self, a: TypeId, b: TypeId) -> bool {
        a == b
    }

    /// Module a type is declared in.
    fn declaring_module(&self, t: TypeId) -> ModuleId {
        self.type_decl(t).module
    }

    /// Resolve a constant reference as seen from `scope`. A prefixed
    /// reference carries the import prefix; the in-memory model treats the
    /// prefix as opaque and matches on the name alone.
    fn resolve_constant(
        &self,
        scope: ModuleId,
        prefix: Option<&str>,
        name: &str,
    ) -> Option<ConstantId>;

    /// Reverse-resolve a shareable reference for importing `to` from `from`.
    fn import_uri(&self, from: ModuleId, to: ModuleId) -> String {
        let _ = from;
        self.module(to).uri.clone()
    }

    /// The closed-world unit rooted at `entry`: every module reachable over
    /// import edges, entry first, in deterministic discovery order.
    fn reachable_modules(&self, entry: ModuleId) -> Vec<ModuleId> {
        let mut seen: HashSet<ModuleId> = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![entry];
        while let Some(m) = stack.pop() {
            if !seen.insert(m) {
                continue;
            }
            order.push(m);
            // Reverse so that imports are visited in declaration order.
            for dep in self.module(m).imports.iter().rev() {
                if !seen.contains(dep) {
                    stack.push(*dep);
                }
            }
        }
        order
    }
}

/// In-memory program, the reference `ProgramModel` implementation.
#[derive(Debug, Default)]
pub struct Program {
    modules: Vec<ModuleDecl>,
    types: Vec<TypeDecl>,
    constants: Vec<Constant>,
}

impl ProgramModel for Program {
    fn modules(&self) -> Vec<ModuleId> {
        (0..self.modules.len() as u32).map(ModuleId).collect()
    }

    fn module(&self, id: ModuleId) -> &ModuleDecl {
        &self.modules[id.0 as usize]
    }

    fn type_decl(&self, id: TypeId) -> &TypeDecl {
        &self.types[id.0 as usize]
    }

    fn constant(&self, id: ConstantId) -> &Constant {
        &self.constants[id.0 as usize]
    }

    fn find_module_by_name(&self, name: &str) -> Option<ModuleId> {
        self.modules
            .iter()
            .position(|m| m.name == name)
            .map(|i| ModuleId(i as u32))
    }

    fn resolve_constant(
        &self,
        scope: ModuleId,
        _prefix: Option<&str>,
        name: &str,
    ) -> Option<ConstantId> {
        // Declarations in the requesting module shadow imported ones.
        let local = self
            .module(scope)
            .constants
            .iter()
            .find(|c| self.constant(**c).name == name);
        if let Some(id) = local {
            return Some(*id);
        }
        self.constants
            .iter()
            .position(|c| c.name == name)
            .map(|i| ConstantId(i as u32))
    }
}

/// Assembles an in-memory `Program` piece by piece.
///
/// Declarations are added in the order the ids are handed out; the builder
/// does no validation beyond index bookkeeping.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder::default()
    }

    /// Add a module. `directive_insert_offset` defaults to 0 and the body
    /// insert offset of types defaults to the end of the source; adjust with
    /// the dedicated setters when offsets matter to a test.
    pub fn add_module(
        &mut self,
        name: impl Into<String>,
        uri: impl Into<String>,
        source: impl Into<String>,
    ) -> ModuleId {
        let id = ModuleId(self.program.modules.len() as u32);
        self.program.modules.push(ModuleDecl {
            name: name.into(),
            uri: uri.into(),
            source: source.into(),
            directive_insert_offset: 0,
            types: Vec::new(),
            constants: Vec::new(),
            directives: Vec::new(),
            imports: Vec::new(),
        });
        id
    }

    pub fn set_directive_insert_offset(&mut self, module: ModuleId, offset: usize) {
        self.program.modules[module.0 as usize].directive_insert_offset = offset;
    }

    /// Record an import/export directive and, for imports, the resolved edge.
    pub fn add_directive(
        &mut self,
        module: ModuleId,
        directive: Directive,
        resolved: Option<ModuleId>,
    ) {
        let decl = &mut self.program.modules[module.0 as usize];
        if directive.kind == DirectiveKind::Import {
            if let Some(target) = resolved {
                decl.imports.push(target);
            }
        }
        decl.directives.push(directive);
    }

    /// Record an import edge that has no textual directive (synthetic setups).
    pub fn link_import(&mut self, from: ModuleId, to: ModuleId) {
        self.program.modules[from.0 as usize].imports.push(to);
    }

    pub fn add_class(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
        supertype: Option<TypeId>,
    ) -> TypeId {
        let id = TypeId(self.program.types.len() as u32);
        let body_insert_offset = self.program.modules[module.0 as usize].source.len();
        self.program.types.push(TypeDecl {
            name: name.into(),
            module,
            supertype,
            body_insert_offset,
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
        });
        self.program.modules[module.0 as usize].types.push(id);
        id
    }

    pub fn set_body_insert_offset(&mut self, t: TypeId, offset: usize) {
        self.program.types[t.0 as usize].body_insert_offset = offset;
    }

    pub fn set_supertype(&mut self, t: TypeId, supertype: Option<TypeId>) {
        self.program.types[t.0 as usize].supertype = supertype;
    }

    pub fn add_field(&mut self, t: TypeId, name: impl Into<String>) {
        self.program.types[t.0 as usize].fields.push(name.into());
    }

    pub fn add_constructor(&mut self, t: TypeId, ctor: Constructor) {
        self.program.types[t.0 as usize].constructors.push(ctor);
    }

    pub fn add_method(&mut self, t: TypeId, method: MethodDecl) {
        self.program.types[t.0 as usize].methods.push(method);
    }

    pub fn add_annotation(&mut self, t: TypeId, expr: ConstExpr) {
        self.program.types[t.0 as usize]
            .annotations
            .push(Annotation { expr });
    }

    pub fn add_constant(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
        initializer: Option<ConstExpr>,
    ) -> ConstantId {
        let id = ConstantId(self.program.constants.len() as u32);
        self.program.constants.push(Constant {
            name: name.into(),
            module,
            initializer,
        });
        self.program.modules[module.0 as usize].constants.push(id);
        id
    }

    pub fn finish(self) -> Program {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachability_follows_imports() {
        let mut b = ProgramBuilder::new();
        let app = b.add_module("app", "package:demo/app.lang", "");
        let lib = b.add_module("lib", "package:demo/lib.lang", "");
        let deep = b.add_module("deep", "package:demo/deep.lang", "");
        let lonely = b.add_module("lonely", "package:demo/lonely.lang", "");
        b.link_import(app, lib);
        b.link_import(lib, deep);
        let program = b.finish();

        let unit = program.reachable_modules(app);
        assert_eq!(unit, vec![app, lib, deep]);
        assert!(!unit.contains(&lonely));
    }

    #[test]
    fn local_constants_shadow_foreign_ones() {
        let mut b = ProgramBuilder::new();
        let a = b.add_module("a", "package:demo/a.lang", "");
        let bm = b.add_module("b", "package:demo/b.lang", "");
        b.add_constant(a, "shared", Some(ConstExpr::StringLit("from a".into())));
        let local = b.add_constant(bm, "shared", Some(ConstExpr::StringLit("from b".into())));
        let program = b.finish();

        assert_eq!(program.resolve_constant(bm, None, "shared"), Some(local));
        assert_eq!(program.resolve_constant(bm, None, "missing"), None);
    }

    #[test]
    fn reachability_handles_import_cycles() {
        let mut b = ProgramBuilder::new();
        let a = b.add_module("a", "package:demo/a.lang", "");
        let bm = b.add_module("b", "package:demo/b.lang", "");
        b.link_import(a, bm);
        b.link_import(bm, a);
        let program = b.finish();

        assert_eq!(program.reachable_modules(a), vec![a, bm]);
    }
}
