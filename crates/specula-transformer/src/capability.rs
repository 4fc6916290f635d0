/// Capability tokens and capability sets
///
/// A capability token is one atomic grant of a reflective-operation
/// category. The set of kinds is closed: anything the vocabulary declares
/// that this transformer does not implement yet is carried as an explicit
/// `Unsupported` token and surfaces as a "not yet supported" failure where it
/// could change an answer, never as a silent denial.

use crate::error::{Result, TransformError};

/// Name of the reflection marker type every reflector must directly extend.
pub const MARKER_TYPE_NAME: &str = "Reflectable";

/// Field the marker type must declare; part of the content fingerprint that
/// guards against same-named lookalikes in other modules.
pub const MARKER_CAPABILITIES_FIELD: &str = "capabilities";

/// URI infix identifying the marker module.
pub const MARKER_MODULE_INFIX: &str = "reflect/reflectable";

/// Replacement URI infix for the reflection-runtime-free marker variant.
pub const STATIC_MARKER_MODULE_INFIX: &str = "reflect/static_reflectable";

/// URI infix identifying the capability vocabulary module. Capability
/// literals whose type is declared anywhere else are foreign.
pub const VOCABULARY_MODULE_INFIX: &str = "reflect/capability";

/// One authorized reflective-operation category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityToken {
    /// Blanket grant to invoke any instance member.
    InstanceInvoke,
    /// Grant to invoke the single instance member with this name.
    InstanceInvokeNamed(String),
    /// Blanket grant covering instance, static and constructor invocation.
    InvokeMembers,
    /// Grant to invoke static members.
    StaticInvoke,
    /// Grant to read declaration metadata.
    Metadata,
    /// Grant to enumerate declarations.
    Declarations,
    /// Grant to access library mirrors.
    LibraryAccess,
    /// Recognized vocabulary kind this transformer does not implement.
    /// Carries the vocabulary type name.
    Unsupported(String),
}

impl CapabilityToken {
    /// Whether an unsupported kind refines instance invocation, in which case
    /// instance-invoke queries cannot be answered honestly.
    pub(crate) fn is_invoke_refinement(kind: &str) -> bool {
        matches!(
            kind,
            "InstanceInvokeMetaCapability" | "SuperclassQuantifyCapability"
        )
    }
}

/// The capabilities one reflector grants, resolved once per reflector
/// identity and owned by its domain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    tokens: Vec<CapabilityToken>,
}

impl CapabilitySet {
    pub fn new(tokens: Vec<CapabilityToken>) -> Self {
        CapabilitySet { tokens }
    }

    pub fn tokens(&self) -> &[CapabilityToken] {
        &self.tokens
    }

    /// Vocabulary names of the unsupported kinds in this set.
    pub fn unsupported_kinds(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            CapabilityToken::Unsupported(kind) => Some(kind.as_str()),
            _ => None,
        })
    }

    /// Whether the set carries an unimplemented refinement of instance
    /// invocation. Such a set cannot answer instance-invoke queries.
    pub fn has_unsupported_invoke_refinement(&self) -> bool {
        self.unsupported_kinds()
            .any(CapabilityToken::is_invoke_refinement)
    }

    /// Whether a blanket token makes every instance-member name invokable.
    pub fn has_blanket_instance_invoke(&self) -> bool {
        self.tokens.iter().any(|t| {
            matches!(
                t,
                CapabilityToken::InstanceInvoke | CapabilityToken::InvokeMembers
            )
        })
    }

    /// Whether invoking the instance member `name` is authorized.
    ///
    /// Fails with `NotYetSupported` if the set carries an unimplemented
    /// invoke refinement: answering `false` there would let a denial
    /// masquerade as an intentional "not implemented".
    pub fn supports_instance_invoke(&self, name: &str) -> Result<bool> {
        for kind in self.unsupported_kinds() {
            if CapabilityToken::is_invoke_refinement(kind) {
                return Err(TransformError::NotYetSupported(kind.to_string()));
            }
        }
        Ok(self.has_blanket_instance_invoke()
            || self
                .tokens
                .iter()
                .any(|t| matches!(t, CapabilityToken::InstanceInvokeNamed(n) if n == name)))
    }

    /// Whether invoking static members is authorized.
    pub fn supports_static_invoke(&self) -> bool {
        self.tokens.iter().any(|t| {
            matches!(
                t,
                CapabilityToken::StaticInvoke | CapabilityToken::InvokeMembers
            )
        })
    }

    /// Whether reading declaration metadata is authorized.
    pub fn supports_metadata(&self) -> bool {
        self.tokens.contains(&CapabilityToken::Metadata)
    }

    /// Whether enumerating declarations is authorized.
    pub fn supports_declarations(&self) -> bool {
        self.tokens.contains(&CapabilityToken::Declarations)
    }

    /// Whether library access is authorized.
    pub fn supports_library_access(&self) -> bool {
        self.tokens.contains(&CapabilityToken::LibraryAccess)
    }
}
