use clap::Parser;
use jobspec_interpolation::{ContextSpec, EvaluationPhase, Interpolator};
use jobspec_interpolation::namespace::Registry;

/// Resolve `${...}` references in a job specification string against node
/// attribute and runtime environment data.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// The string to interpolate, e.g. 'host ${attr.cpu.arch}'
    template: String,
    /// Evaluation phase: constraint (pre-placement) or runtime
    #[arg(long, value_enum, default_value = "runtime")]
    phase: Phase,
    /// JSON file with node/attributes/meta/env tables
    #[arg(long)]
    context: Option<std::path::PathBuf>,
    /// Node attribute, key=value (repeatable)
    #[arg(long = "attr", value_parser = parse_key_val)]
    attrs: Vec<(String, String)>,
    /// Node metadata, key=value (repeatable)
    #[arg(long = "meta", value_parser = parse_key_val)]
    meta: Vec<(String, String)>,
    /// Runtime environment variable, key=value (repeatable)
    #[arg(long = "env", value_parser = parse_key_val)]
    env: Vec<(String, String)>,
    #[arg(long, default_value = "")]
    node_id: String,
    #[arg(long, default_value = "")]
    node_name: String,
    #[arg(long, default_value = "")]
    datacenter: String,
    #[arg(long, default_value = "")]
    node_class: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Phase {
    Constraint,
    Runtime,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) => Ok((k.to_string(), v.to_string())),
        None => Err(format!("expected key=value, got '{s}'")),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Start from the context file (if given), then layer flag values on top.
    let mut spec = match args.context.as_ref() {
        Some(path) => {
            let raw = match std::fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(e) => {
                    eprintln!("cannot read {}: {e}", path.display());
                    std::process::exit(1);
                }
            };
            match serde_json::from_str::<ContextSpec>(&raw) {
                Ok(spec) => spec,
                Err(e) => {
                    eprintln!("invalid context file: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => ContextSpec::default(),
    };
    spec.attributes.extend(args.attrs);
    spec.meta.extend(args.meta);
    spec.env.extend(args.env);
    if !args.node_id.is_empty() {
        spec.node.id = args.node_id;
    }
    if !args.node_name.is_empty() {
        spec.node.name = args.node_name;
    }
    if !args.datacenter.is_empty() {
        spec.node.datacenter = args.datacenter;
    }
    if !args.node_class.is_empty() {
        spec.node.class = args.node_class;
    }

    let phase = match args.phase {
        Phase::Constraint => EvaluationPhase::Constraint,
        Phase::Runtime => EvaluationPhase::Runtime,
    };
    let ctx = spec.into_context(phase);

    let interp = Interpolator::new(Registry::with_builtins());
    match interp.resolve(&args.template, &ctx) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
