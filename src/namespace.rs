// src/namespace.rs
use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use tracing::trace;

use crate::context::{Context, ResolutionPhase};
use crate::errors::{InterpError, Result};

/// Trait for the pluggable namespace resolvers dispatched by the first path
/// token of a reference.
pub trait Namespace: Send + Sync {
    fn prefix(&self) -> &'static str;
    /// The pipeline stage this namespace's data exists from.
    fn phase(&self) -> ResolutionPhase;
    /// Path-form lookup over the segments following the prefix.
    fn lookup(&self, ctx: &Context, rest: &[String]) -> Option<String>;
    /// Index-form lookup of an opaque bracketed key. Namespaces opt in;
    /// the default rejects `prefix["..."]`.
    fn lookup_indexed(&self, _ctx: &Context, _key: &str) -> Option<String> {
        None
    }
    fn supports_index(&self) -> bool {
        false
    }
}

/// Thread-safe registry of namespace resolvers. Built once at startup and
/// shared read-only across evaluations; cloning is cheap.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<HashMap<&'static str, Arc<dyn Namespace>>>,
}

impl Registry {
    pub fn with_builtins() -> Self {
        let mut map: HashMap<&'static str, Arc<dyn Namespace>> = HashMap::new();
        map.insert("node", Arc::new(builtins::NodeFields));
        map.insert("attr", Arc::new(builtins::NodeAttributes));
        map.insert("meta", Arc::new(builtins::NodeMeta));
        map.insert("env", Arc::new(builtins::RuntimeEnv));
        Self {
            inner: Arc::new(map),
        }
    }

    pub fn register<N: Namespace + 'static>(&mut self, ns: N) {
        let map = Arc::make_mut(&mut self.inner);
        map.insert(ns.prefix(), Arc::new(ns));
    }

    pub fn get(&self, prefix: &str) -> Option<Arc<dyn Namespace>> {
        self.inner.get(prefix).cloned()
    }

    /// Resolve a path-form reference. The first segment selects the
    /// namespace; an unregistered first segment falls through to the flat
    /// runtime variable table (with one legacy alias, see below).
    pub fn lookup_path(&self, ctx: &Context, segments: &[String]) -> Result<String> {
        let prefix = &segments[0];
        let rest = &segments[1..];

        if let Some(ns) = self.get(prefix) {
            let key = rest.iter().join(".");
            trace!(namespace = %prefix, key = %key, "path lookup");
            if !ns.phase().available_in(ctx.phase()) {
                return Err(InterpError::unresolved(prefix.clone(), key));
            }
            return ns
                .lookup(ctx, rest)
                .ok_or_else(|| InterpError::unresolved(prefix.clone(), key));
        }

        // Bare (unprefixed) reference. `cpu.numcores` is a legacy alias
        // into the attr namespace; everything else is a flat runtime
        // variable such as NOMAD_ADDR_RPC.
        let key = segments.iter().join(".");
        if key == "cpu.numcores" {
            trace!(key = %key, "legacy attr alias lookup");
            return ctx
                .attribute(&key)
                .map(str::to_string)
                .ok_or_else(|| InterpError::unresolved("attr", key));
        }
        trace!(key = %key, "flat runtime lookup");
        if !ResolutionPhase::PostPlacement.available_in(ctx.phase()) {
            return Err(InterpError::unresolved("env", key));
        }
        ctx.runtime_var(&key)
            .map(str::to_string)
            .ok_or_else(|| InterpError::unresolved("env", key))
    }

    /// Resolve an index-form reference, e.g. `env["invalid...name"]`.
    pub fn lookup_index(&self, ctx: &Context, base: &str, key: &str) -> Result<String> {
        trace!(namespace = %base, key = %key, "index lookup");
        let ns = self
            .get(base)
            .filter(|ns| ns.supports_index())
            .ok_or_else(|| InterpError::unresolved(base, key))?;
        if !ns.phase().available_in(ctx.phase()) {
            return Err(InterpError::unresolved(base, key));
        }
        ns.lookup_indexed(ctx, key)
            .ok_or_else(|| InterpError::unresolved(base, key))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

pub mod builtins {
    use super::*;

    /// `node.*`: the fixed identity fields of the candidate node.
    pub struct NodeFields;
    impl Namespace for NodeFields {
        fn prefix(&self) -> &'static str {
            "node"
        }
        fn phase(&self) -> ResolutionPhase {
            ResolutionPhase::PrePlacement
        }
        fn lookup(&self, ctx: &Context, rest: &[String]) -> Option<String> {
            let node = ctx.node();
            let field = match rest.iter().join(".").as_str() {
                "unique.id" => &node.id,
                "unique.name" => &node.name,
                "datacenter" => &node.datacenter,
                "class" => &node.class,
                _ => return None,
            };
            Some(field.clone())
        }
    }

    /// `attr.*`: fingerprinted node attributes, keyed by the remaining
    /// path joined with dots (e.g. `attr.cpu.arch` → key `cpu.arch`).
    pub struct NodeAttributes;
    impl Namespace for NodeAttributes {
        fn prefix(&self) -> &'static str {
            "attr"
        }
        fn phase(&self) -> ResolutionPhase {
            ResolutionPhase::PrePlacement
        }
        fn lookup(&self, ctx: &Context, rest: &[String]) -> Option<String> {
            if rest.is_empty() {
                return None;
            }
            ctx.attribute(&rest.iter().join(".")).map(str::to_string)
        }
    }

    /// `meta.*`: client-configured metadata, single-segment keys only.
    pub struct NodeMeta;
    impl Namespace for NodeMeta {
        fn prefix(&self) -> &'static str {
            "meta"
        }
        fn phase(&self) -> ResolutionPhase {
            ResolutionPhase::PrePlacement
        }
        fn lookup(&self, ctx: &Context, rest: &[String]) -> Option<String> {
            match rest {
                [key] => ctx.meta(key).map(str::to_string),
                _ => None,
            }
        }
    }

    /// `env.*` and `env["..."]`: runtime variables assigned at placement.
    /// The index form exists for variable names that are not expressible
    /// as dotted paths.
    pub struct RuntimeEnv;
    impl Namespace for RuntimeEnv {
        fn prefix(&self) -> &'static str {
            "env"
        }
        fn phase(&self) -> ResolutionPhase {
            ResolutionPhase::PostPlacement
        }
        fn lookup(&self, ctx: &Context, rest: &[String]) -> Option<String> {
            if rest.is_empty() {
                return None;
            }
            ctx.runtime_var(&rest.iter().join(".")).map(str::to_string)
        }
        fn lookup_indexed(&self, ctx: &Context, key: &str) -> Option<String> {
            ctx.runtime_var(key).map(str::to_string)
        }
        fn supports_index(&self) -> bool {
            true
        }
    }
}
