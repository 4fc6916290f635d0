/// Constant resolver
///
/// A restricted constant-expression evaluator: it chases identifier
/// indirections through declared constants until it reaches an
/// instantiation-like literal, and switches on that literal's type name to
/// produce a capability token. No arithmetic, no conditionals, no general
/// folding. The chase depth is bounded so a cyclic constant chain reports
/// instead of spinning.

use specula_model::{ConstExpr, ModuleId, ProgramModel, TypeId};

use crate::capability::{CapabilityToken, VOCABULARY_MODULE_INFIX};
use crate::error::{Result, TransformError};

/// Upper bound on identifier indirections per expression. Real capability
/// constants sit one or two hops deep; hitting the bound means a cycle or a
/// pathological chain, and either way the expression is not resolvable.
const MAX_CHASE_DEPTH: usize = 64;

/// Terminal form of a reduced constant expression.
#[derive(Debug)]
pub enum Reduced<'a> {
    /// An instantiation-like literal with its resolved type.
    Instantiation {
        type_id: TypeId,
        args: &'a [ConstExpr],
    },
    /// Terminal, but not an instantiation (string, list, opaque).
    Irreducible(&'a ConstExpr),
}

pub struct ConstantResolver<'a, M: ProgramModel> {
    model: &'a M,
}

impl<'a, M: ProgramModel> ConstantResolver<'a, M> {
    pub fn new(model: &'a M) -> Self {
        ConstantResolver { model }
    }

    fn module_name(&self, scope: ModuleId) -> String {
        self.model.module(scope).name.clone()
    }

    /// Reduce `expr` to its terminal form, substituting constant initializers
    /// for identifier references. Resolution scope follows the substituted
    /// constant's declaring module.
    pub fn reduce(&self, scope: ModuleId, expr: &'a ConstExpr) -> Result<Reduced<'a>> {
        let mut scope = scope;
        let mut current = expr;
        for _ in 0..MAX_CHASE_DEPTH {
            let (prefix, name) = match current {
                ConstExpr::Instantiation { type_id, args } => {
                    return Ok(Reduced::Instantiation {
                        type_id: *type_id,
                        args,
                    });
                }
                ConstExpr::Identifier(name) => (None, name.as_str()),
                ConstExpr::Qualified { prefix, name } => (Some(prefix.as_str()), name.as_str()),
                other => return Ok(Reduced::Irreducible(other)),
            };
            let constant_id = self
                .model
                .resolve_constant(scope, prefix, name)
                .ok_or_else(|| {
                    TransformError::shape(
                        self.module_name(scope),
                        format!("`{name}` does not resolve to a declared constant"),
                    )
                })?;
            let constant = self.model.constant(constant_id);
            let initializer = constant.initializer.as_ref().ok_or_else(|| {
                TransformError::shape(
                    self.module_name(scope),
                    format!("`{name}` is not a compile-time constant"),
                )
            })?;
            scope = constant.module;
            current = initializer;
        }
        Err(TransformError::shape(
            self.module_name(scope),
            "constant indirection chain too deep (cycle?)",
        ))
    }

    /// Resolve one capability-literal expression to a token.
    pub fn resolve_capability(&self, scope: ModuleId, expr: &'a ConstExpr) -> Result<CapabilityToken> {
        let (type_id, args) = match self.reduce(scope, expr)? {
            Reduced::Instantiation { type_id, args } => (type_id, args),
            Reduced::Irreducible(_) => {
                return Err(TransformError::shape(
                    self.module_name(scope),
                    "capability expression does not reduce to a capability literal",
                ));
            }
        };

        let decl = self.model.type_decl(type_id);
        let declared_in = self.model.module(self.model.declaring_module(type_id));
        if !declared_in.uri.contains(VOCABULARY_MODULE_INFIX) {
            return Err(TransformError::shape(
                self.module_name(scope),
                format!(
                    "`{}` is declared in `{}`, not in the capability vocabulary",
                    decl.name, declared_in.uri
                ),
            ));
        }

        match decl.name.as_str() {
            "InstanceInvokeCapability" => match args.first() {
                None => Ok(CapabilityToken::InstanceInvoke),
                Some(arg) => match self.reduce(scope, arg)? {
                    Reduced::Irreducible(ConstExpr::StringLit(name)) => {
                        Ok(CapabilityToken::InstanceInvokeNamed(name.clone()))
                    }
                    _ => Err(TransformError::shape(
                        self.module_name(scope),
                        "InstanceInvokeCapability argument must be a string literal",
                    )),
                },
            },
            "InvokingCapability" => Ok(CapabilityToken::InvokeMembers),
            "StaticInvokeCapability" => Ok(CapabilityToken::StaticInvoke),
            "MetadataCapability" => Ok(CapabilityToken::Metadata),
            "DeclarationsCapability" => Ok(CapabilityToken::Declarations),
            "LibraryCapability" => Ok(CapabilityToken::LibraryAccess),
            // Valid vocabulary, not implemented here. Kept as an explicit
            // token so a query that depends on it can refuse to answer.
            "InstanceInvokeMetaCapability"
            | "SuperclassQuantifyCapability"
            | "TypeCapability"
            | "TypingCapability" => Ok(CapabilityToken::Unsupported(decl.name.clone())),
            other => Err(TransformError::shape(
                self.module_name(scope),
                format!("`{other}` is not a known capability type"),
            )),
        }
    }

    /// Determine the exact type of an annotation expression, chasing constant
    /// indirections. Shapes that are neither instantiations nor simple or
    /// qualified identifiers are ignored (returned as `None`), as are
    /// identifiers that fail to resolve; arbitrary annotations on unrelated
    /// classes must not derail the scan.
    pub fn annotation_type(&self, scope: ModuleId, expr: &'a ConstExpr) -> Option<TypeId> {
        match self.reduce(scope, expr) {
            Ok(Reduced::Instantiation { type_id, .. }) => Some(type_id),
            _ => None,
        }
    }
}
