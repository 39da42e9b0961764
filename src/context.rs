// src/context.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which pipeline stage an evaluation runs in. Determines which namespaces
/// are populated in the [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationPhase {
    /// Constraint evaluation during scheduling: only pre-placement
    /// namespaces (`node`, `attr`, `meta`) are resolvable.
    Constraint,
    /// Task environment construction after placement: all namespaces.
    Runtime,
}

/// The phase a namespace requires before its data exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPhase {
    PrePlacement,
    PostPlacement,
}

impl ResolutionPhase {
    /// Pre-placement namespaces are legal in both phases; post-placement
    /// namespaces only once a task has actually been placed.
    pub fn available_in(self, phase: EvaluationPhase) -> bool {
        match self {
            ResolutionPhase::PrePlacement => true,
            ResolutionPhase::PostPlacement => phase == EvaluationPhase::Runtime,
        }
    }
}

/// Identity fields of a candidate client node, supplied by the scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub id: String,
    pub name: String,
    pub datacenter: String,
    pub class: String,
}

/// A read-only binding of namespaces to values for one evaluation. Built
/// fresh per call from external fingerprint/allocation data and discarded
/// afterwards; resolution never mutates it.
#[derive(Debug, Clone)]
pub struct Context {
    phase: EvaluationPhase,
    node: NodeIdentity,
    attributes: HashMap<String, String>,
    meta: HashMap<String, String>,
    runtime: HashMap<String, String>,
}

impl Context {
    /// Build a context for `phase`. In the constraint phase the runtime
    /// table is dropped even if supplied; this is what makes runtime
    /// variables uninterpretable inside constraints.
    pub fn build(
        phase: EvaluationPhase,
        node: NodeIdentity,
        attributes: HashMap<String, String>,
        meta: HashMap<String, String>,
        runtime: Option<HashMap<String, String>>,
    ) -> Self {
        let runtime = match phase {
            EvaluationPhase::Constraint => HashMap::new(),
            EvaluationPhase::Runtime => runtime.unwrap_or_default(),
        };
        Self {
            phase,
            node,
            attributes,
            meta,
            runtime,
        }
    }

    /// Pre-placement context for evaluating constraints against one
    /// candidate node.
    pub fn constraint(
        node: NodeIdentity,
        attributes: HashMap<String, String>,
        meta: HashMap<String, String>,
    ) -> Self {
        Self::build(EvaluationPhase::Constraint, node, attributes, meta, None)
    }

    /// Post-placement context for building a task's environment, driver
    /// config, and meta. Node namespaces stay available so a single string
    /// may reference both node attributes and runtime variables.
    pub fn runtime(
        node: NodeIdentity,
        attributes: HashMap<String, String>,
        meta: HashMap<String, String>,
        runtime: HashMap<String, String>,
    ) -> Self {
        Self::build(
            EvaluationPhase::Runtime,
            node,
            attributes,
            meta,
            Some(runtime),
        )
    }

    pub fn phase(&self) -> EvaluationPhase {
        self.phase
    }

    pub fn node(&self) -> &NodeIdentity {
        &self.node
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    pub fn runtime_var(&self, key: &str) -> Option<&str> {
        self.runtime.get(key).map(String::as_str)
    }
}

/// Serializable form of a context, used by the CLI to load namespace data
/// from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSpec {
    #[serde(default)]
    pub node: NodeIdentity,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub meta: HashMap<String, String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ContextSpec {
    pub fn into_context(self, phase: EvaluationPhase) -> Context {
        Context::build(phase, self.node, self.attributes, self.meta, Some(self.env))
    }
}
