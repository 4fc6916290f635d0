/// Specula reflection transformer
///
/// Gives a statically compiled program introspection and dynamic invocation
/// without a runtime reflection subsystem: a closed-world, ahead-of-time
/// pass that finds reflection requests in the Program Model, resolves the
/// capabilities each request grants, and generates mirror types implementing
/// exactly the authorized operations.

pub mod capability;
pub mod codegen;
pub mod constant;
pub mod driver;
pub mod error;
pub mod patch;
pub mod world;

pub use capability::{CapabilitySet, CapabilityToken};
pub use codegen::{MirrorGenerator, MirrorRole, NamingSession};
pub use constant::{ConstantResolver, Reduced};
pub use driver::{TransformOptions, TransformOutput, Transformer};
pub use error::{Diagnostic, Result, Severity, TransformError};
pub use patch::{PatchSet, SourceEdit};
pub use world::{ClassDomain, ReflectorDomain, World, WorldBuilder};
