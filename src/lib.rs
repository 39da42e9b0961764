pub mod context;
pub mod errors;
pub mod namespace; // pluggable namespace resolvers
pub mod resolver;
pub mod template;
mod parser;

use context::Context;
use errors::{InterpError, Result};
use namespace::Registry;
use template::Segment;

/// The main entry point. Holds the namespace registry (built once, shared
/// read-only) and resolves specification strings against per-call contexts.
pub struct Interpolator {
    registry: Registry,
}

impl Interpolator {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Parse a raw string into its literal/reference segments.
    pub fn parse(&self, input: &str) -> Result<Vec<Segment>> {
        template::parse_template(input)
    }

    /// Parse and resolve in one call.
    pub fn resolve(&self, input: &str, ctx: &Context) -> Result<String> {
        let segments = template::parse_template(input)?;
        self.resolve_segments(&segments, ctx)
    }

    /// Resolve already-parsed segments (useful when one string is evaluated
    /// against many candidate nodes).
    pub fn resolve_segments(&self, segments: &[Segment], ctx: &Context) -> Result<String> {
        resolver::resolve_segments(&self.registry, segments, ctx)
    }

    /// Resolve the attribute field of a constraint. An unresolved reference
    /// means the candidate node lacks the property, which the scheduler
    /// treats as "constraint does not match" rather than an error; malformed
    /// expressions stay fatal.
    pub fn resolve_constraint_target(&self, input: &str, ctx: &Context) -> Result<Option<String>> {
        match self.resolve(input, ctx) {
            Ok(v) => Ok(Some(v)),
            Err(InterpError::UnresolvedReference { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(Registry::with_builtins())
    }
}

/// Convenience: resolve with the builtin registry.
pub fn resolve(input: &str, ctx: &Context) -> Result<String> {
    Interpolator::default().resolve(input, ctx)
}

/// Whether `input` contains at least one `${...}` reference opener. Strings
/// without one resolve to themselves.
pub fn contains_reference(input: &str) -> bool {
    input.contains("${")
}

pub use context::{ContextSpec, EvaluationPhase, NodeIdentity};
pub use errors::InterpError as Error;
pub use template::{RefExpr, Reference};
