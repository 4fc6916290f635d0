/// Data types of the Program Model
///
/// Everything here is plain resolved data. Identifiers are indexes into the
/// owning `Program`; they carry no meaning outside the program they were
/// minted by.

/// Identifies a module within one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

/// Identifies a type declaration within one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Identifies a constant declaration within one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstantId(pub u32);

/// A module (one source file / library) of the host program.
#[derive(Debug, Clone)]
pub struct ModuleDecl {
    /// Short name used to address the module from the outside (entry points,
    /// transformer output keys).
    pub name: String,
    /// Shareable reference other modules import this module by,
    /// e.g. `package:demo/model.lang`.
    pub uri: String,
    /// Full source text. Offsets in directives and type declarations index
    /// into this string.
    pub source: String,
    /// Offset at which a new import directive may be inserted.
    pub directive_insert_offset: usize,
    /// Types declared in this module, in declaration order.
    pub types: Vec<TypeId>,
    /// Top-level constants declared in this module.
    pub constants: Vec<ConstantId>,
    /// Import/export directives, in source order.
    pub directives: Vec<Directive>,
    /// Modules this module imports (resolved).
    pub imports: Vec<ModuleId>,
}

/// Kind of a module-level directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Import,
    Export,
}

/// An import or export directive with the source span of its URI literal.
///
/// `offset`/`length` cover the URI text itself, without the surrounding
/// quotes; replacing that span with another URI yields a valid directive.
#[derive(Debug, Clone)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub uri: String,
    pub offset: usize,
    pub length: usize,
    /// The directive carries show/hide member filters.
    pub has_combinators: bool,
    /// The directive requests deferred (lazy) loading.
    pub is_deferred: bool,
}

/// A class-like type declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Local (unqualified) name.
    pub name: String,
    /// Declaring module.
    pub module: ModuleId,
    /// Direct supertype, `None` for the universal root.
    pub supertype: Option<TypeId>,
    /// Offset just before the closing brace of the type body, where new
    /// members may be inserted.
    pub body_insert_offset: usize,
    /// Field names, declaration order.
    pub fields: Vec<String>,
    /// Declared constructors.
    pub constructors: Vec<Constructor>,
    /// Declared methods (instance and static).
    pub methods: Vec<MethodDecl>,
    /// Metadata attached to the declaration.
    pub annotations: Vec<Annotation>,
}

/// A constructor declaration, reduced to what the transformer inspects.
#[derive(Debug, Clone)]
pub struct Constructor {
    pub param_count: usize,
    pub is_const: bool,
    /// Arguments of the `super(...)` invocation in the initializer list.
    pub super_args: Vec<ConstExpr>,
}

/// A method declaration.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub is_static: bool,
    /// Operator declarations are never invokable through mirrors.
    pub is_operator: bool,
    pub positional_params: Vec<String>,
    pub named_params: Vec<String>,
}

impl MethodDecl {
    /// Instance method with positional parameters only.
    pub fn instance(name: impl Into<String>, positional: &[&str]) -> Self {
        MethodDecl {
            name: name.into(),
            is_static: false,
            is_operator: false,
            positional_params: positional.iter().map(|p| p.to_string()).collect(),
            named_params: Vec::new(),
        }
    }

    /// Static method with positional parameters only.
    pub fn static_method(name: impl Into<String>, positional: &[&str]) -> Self {
        MethodDecl {
            is_static: true,
            ..MethodDecl::instance(name, positional)
        }
    }

    /// Operator declaration.
    pub fn operator(name: impl Into<String>) -> Self {
        MethodDecl {
            is_operator: true,
            ..MethodDecl::instance(name, &["other"])
        }
    }
}

/// Metadata attached to a declaration, kept in expression form.
///
/// The expression is one of the restricted constant shapes; annotations whose
/// expression falls outside those shapes are represented as `Opaque` and are
/// ignored by the transformer.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub expr: ConstExpr,
}

/// A top-level constant declaration.
#[derive(Debug, Clone)]
pub struct Constant {
    pub name: String,
    pub module: ModuleId,
    /// `None` models a declaration that is not actually compile-time
    /// constant; resolving through it is an error, not a crash.
    pub initializer: Option<ConstExpr>,
}

/// Restricted constant-expression variant.
///
/// This is deliberately not a general expression tree: the transformer only
/// ever needs identifier indirection and instantiation-like literals, plus
/// the string and list literals that appear as capability arguments. An
/// explicit `Opaque` terminal marks everything that cannot be reduced
/// further.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstExpr {
    /// Simple identifier reference, e.g. `invokeArg0`.
    Identifier(String),
    /// Prefixed reference, e.g. `caps.invokeArg0`.
    Qualified { prefix: String, name: String },
    /// Instantiation-like literal, e.g. `InstanceInvokeCapability("arg0")`.
    /// The type is already resolved.
    Instantiation { type_id: TypeId, args: Vec<ConstExpr> },
    /// String literal.
    StringLit(String),
    /// List literal.
    ListLit(Vec<ConstExpr>),
    /// Not further reducible (and not one of the shapes above).
    Opaque,
}

impl ConstExpr {
    /// Instantiation with no arguments.
    pub fn instantiate(type_id: TypeId) -> Self {
        ConstExpr::Instantiation {
            type_id,
            args: Vec::new(),
        }
    }

    /// Instantiation with a single string argument.
    pub fn instantiate_with_name(type_id: TypeId, arg: impl Into<String>) -> Self {
        ConstExpr::Instantiation {
            type_id,
            args: vec![ConstExpr::StringLit(arg.into())],
        }
    }
}
