// src/resolver.rs
use tracing::debug;

use crate::context::Context;
use crate::errors::Result;
use crate::namespace::Registry;
use crate::template::{RefExpr, Segment};

/// Substitute every reference in `segments` against `ctx` and reassemble the
/// output by in-order concatenation, with no added separators.
///
/// Pure and deterministic: identical `(segments, ctx)` always yields
/// identical output, and nothing is mutated. Malformed input cannot reach
/// this point; the only error here is an unresolved reference.
pub fn resolve_segments(
    registry: &Registry,
    segments: &[Segment],
    ctx: &Context,
) -> Result<String> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Reference(r) => {
                let value = match &r.expr {
                    RefExpr::Path(parts) => registry.lookup_path(ctx, parts),
                    RefExpr::Index { base, key } => registry.lookup_index(ctx, base, key),
                };
                match value {
                    Ok(v) => out.push_str(&v),
                    Err(err) => {
                        debug!(reference = %r.raw(), phase = ?ctx.phase(), %err, "unresolved");
                        return Err(err);
                    }
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, EvaluationPhase, NodeIdentity};
    use crate::errors::InterpError;
    use crate::template::parse_template;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn node() -> NodeIdentity {
        NodeIdentity {
            id: "9afa5da1".to_string(),
            name: "client-42".to_string(),
            datacenter: "dc1".to_string(),
            class: "linux-64bit".to_string(),
        }
    }

    fn attrs() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("cpu.arch".to_string(), "amd64".to_string());
        m.insert("kernel.name".to_string(), "linux".to_string());
        m
    }

    fn runtime_vars() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("NOMAD_ADDR_RPC".to_string(), "10.0.0.5:6379".to_string());
        m.insert("invalid...name".to_string(), "x".to_string());
        m
    }

    fn resolve_in(phase: EvaluationPhase, input: &str) -> Result<String> {
        let registry = Registry::with_builtins();
        let ctx = Context::build(
            phase,
            node(),
            attrs(),
            HashMap::new(),
            Some(runtime_vars()),
        );
        let segments = parse_template(input)?;
        resolve_segments(&registry, &segments, &ctx)
    }

    #[test]
    fn identity_without_references() {
        let input = "plain text, $dollar and {braces} untouched";
        assert_eq!(
            resolve_in(EvaluationPhase::Runtime, input).unwrap(),
            input
        );
    }

    #[test]
    fn sole_reference_yields_exactly_the_value() {
        assert_eq!(
            resolve_in(EvaluationPhase::Runtime, "${attr.cpu.arch}").unwrap(),
            "amd64"
        );
    }

    #[test]
    fn attr_resolves_in_both_phases() {
        assert_eq!(
            resolve_in(EvaluationPhase::Constraint, "${attr.cpu.arch}").unwrap(),
            "amd64"
        );
        assert_eq!(
            resolve_in(EvaluationPhase::Runtime, "${attr.cpu.arch}").unwrap(),
            "amd64"
        );
    }

    #[test]
    fn flat_runtime_var_is_phase_gated() {
        assert_eq!(
            resolve_in(EvaluationPhase::Constraint, "${NOMAD_ADDR_RPC}").unwrap_err(),
            InterpError::unresolved("env", "NOMAD_ADDR_RPC")
        );
        assert_eq!(
            resolve_in(EvaluationPhase::Runtime, "${NOMAD_ADDR_RPC}").unwrap(),
            "10.0.0.5:6379"
        );
    }

    #[test]
    fn env_path_form_is_phase_gated() {
        assert!(resolve_in(EvaluationPhase::Constraint, "${env.NOMAD_ADDR_RPC}").is_err());
        assert_eq!(
            resolve_in(EvaluationPhase::Runtime, "${env.NOMAD_ADDR_RPC}").unwrap(),
            "10.0.0.5:6379"
        );
    }

    #[test]
    fn indexed_env_reference_is_phase_gated() {
        let expr = r#"${env["invalid...name"]}"#;
        assert_eq!(resolve_in(EvaluationPhase::Runtime, expr).unwrap(), "x");
        assert_eq!(
            resolve_in(EvaluationPhase::Constraint, expr).unwrap_err(),
            InterpError::unresolved("env", "invalid...name")
        );
    }

    #[test]
    fn consecutive_dots_fail_parse_in_both_phases() {
        for phase in [EvaluationPhase::Constraint, EvaluationPhase::Runtime] {
            let err = resolve_in(phase, "${invalid...name}").unwrap_err();
            assert!(matches!(err, InterpError::MalformedExpression(_)), "{err}");
        }
    }

    #[test]
    fn unknown_reference_never_emits_blank_text() {
        let err = resolve_in(EvaluationPhase::Runtime, "a${attr.missing}b").unwrap_err();
        assert_eq!(err, InterpError::unresolved("attr", "missing"));
    }

    #[test]
    fn mixed_namespaces_in_one_string() {
        assert_eq!(
            resolve_in(
                EvaluationPhase::Runtime,
                "${attr.kernel.name}/${node.datacenter} rpc=${NOMAD_ADDR_RPC}"
            )
            .unwrap(),
            "linux/dc1 rpc=10.0.0.5:6379"
        );
    }

    #[test]
    fn resolution_is_idempotent_once_fully_resolved() {
        let once = resolve_in(EvaluationPhase::Runtime, "arch=${attr.cpu.arch}").unwrap();
        let twice = resolve_in(EvaluationPhase::Runtime, &once).unwrap();
        assert_eq!(once, twice);
    }
}
