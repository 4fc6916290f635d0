/// Program Model for the specula reflection transformer
///
/// A read-only, semantically resolved view of the host program: modules,
/// types, members, annotations, supertypes and constant initializers. The
/// transformer consumes this model through the `ProgramModel` trait and never
/// parses source text itself; parsing and name resolution belong to the build
/// pipeline that constructs the model.

pub mod model;
pub mod program;

pub use model::{
    Annotation, ConstExpr, Constant, Constructor, Directive, DirectiveKind, MethodDecl,
    ModuleDecl, TypeDecl,
};
pub use model::{ConstantId, ModuleId, TypeId};
pub use program::{Program, ProgramBuilder, ProgramModel};
