use anyhow::{Context, Result};
use blueprint_artifact::{ArtifactKind, ArtifactNode, Status};
use blueprint_store::TraceConfig;
use blueprint_trace::{EngineError, Repository};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "BLUEPRINT_LOG";

fn cli() -> Command {
    let json = || {
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output as JSON")
    };
    let id = |help: &'static str| Arg::new("id").required(true).help(help);

    Command::new("blueprint-trace")
        .version(blueprint_trace::VERSION)
        .about("Traceability and gate validation for blueprint artifacts")
        .subcommand_required(true)
        .arg(
            Arg::new("root")
                .long("root")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Corpus root (overrides config and BLUEPRINT_ROOT)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file (default: ./blueprint.toml if present)"),
        )
        .subcommand(
            Command::new("validate")
                .about("Check the whole corpus against every traceability rule")
                .arg(json()),
        )
        .subcommand(
            Command::new("index")
                .about("List every indexed artifact")
                .arg(json()),
        )
        .subcommand(
            Command::new("show")
                .about("Show one artifact")
                .arg(id("Artifact id, e.g. UC-100")),
        )
        .subcommand(
            Command::new("list")
                .about("List artifacts of one kind")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(value_parser!(ArtifactKind))
                        .help("Goal, Feature, Research, UseCase, Task (or prefix)"),
                ),
        )
        .subcommand(
            Command::new("children")
                .about("List artifacts naming this one as parent")
                .arg(id("Parent artifact id")),
        )
        .subcommand(
            Command::new("trace")
                .about("Walk from an artifact up to its root")
                .arg(id("Starting artifact id")),
        )
        .subcommand(Command::new("pending").about("Artifacts awaiting review and unread feedback"))
        .subcommand(
            Command::new("check-transition")
                .about("Ask whether an artifact may move to a new status")
                .arg(id("Artifact id"))
                .arg(
                    Arg::new("status")
                        .required(true)
                        .value_parser(value_parser!(Status))
                        .help("Proposed status, e.g. APPROVED"),
                ),
        )
        .subcommand(
            Command::new("check-create")
                .about("Ask whether a new artifact may be created")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(value_parser!(ArtifactKind))
                        .help("Kind of the new artifact"),
                )
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .help("Parent artifact id"),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<TraceConfig> {
    let file = matches.get_one::<PathBuf>("config");
    let mut config = TraceConfig::resolve(file.map(PathBuf::as_path))
        .context("failed to load configuration")?;
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config = config.with_root(root);
    }
    Ok(config)
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a String> {
    args.get_one::<String>(name)
        .with_context(|| format!("missing argument '{name}'"))
}

fn print_node_line(node: &ArtifactNode) {
    let status = node.status().map_or("-", Status::as_str);
    let title = node.metadata.title.as_deref().unwrap_or("");
    println!("{:<10} {:<9} {:<10} {}", node.id, node.kind(), status, title);
}

/// Print a gate decision; `Ok(false)` means the gate refused
fn report_gate(outcome: Result<(), EngineError>) -> Result<bool> {
    match outcome {
        Ok(()) => {
            println!("ALLOWED");
            Ok(true)
        }
        Err(EngineError::Gate(err)) => {
            println!("BLOCKED [{}] {err}", err.rule());
            Ok(false)
        }
        Err(EngineError::Store(err)) => Err(err).context("failed to read the corpus"),
    }
}

fn run(matches: &ArgMatches) -> Result<bool> {
    let config = load_config(matches)?;
    tracing::debug!(root = %config.corpus_root.display(), "configuration resolved");
    let repo = Repository::from_config(&config);

    match matches.subcommand() {
        Some(("validate", args)) => {
            let report = repo.validate(None).context("failed to index the corpus")?;
            if args.get_flag("json") {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report.summary());
            }
            Ok(!report.has_errors())
        }
        Some(("index", args)) => {
            if args.get_flag("json") {
                let entries = repo.export_index().context("failed to index the corpus")?;
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                let snapshot = repo.build_index(false).context("failed to index the corpus")?;
                for node in snapshot.iter() {
                    print_node_line(node);
                }
                println!("{} artifact(s)", snapshot.len());
            }
            Ok(true)
        }
        Some(("show", args)) => {
            let id = required(args, "id")?;
            let snapshot = repo.build_index(false)?;
            let Some(node) = snapshot.get_by_id(id) else {
                eprintln!("artifact '{id}' not found");
                return Ok(false);
            };
            println!("id:       {}", node.id);
            println!("kind:     {}", node.kind());
            println!("status:   {}", node.status().map_or("-", Status::as_str));
            println!("title:    {}", node.metadata.title.as_deref().unwrap_or("-"));
            println!("location: {}", node.location);
            println!("revision: {}", node.revision());
            for (field, parent) in node.metadata.parents.iter() {
                println!("{field}: {parent}");
            }
            let deps: Vec<&str> = node.dependencies().collect();
            if !deps.is_empty() {
                println!("dependencies: {}", deps.join(", "));
            }
            Ok(true)
        }
        Some(("list", args)) => {
            let kind = *args
                .get_one::<ArtifactKind>("kind")
                .context("missing argument 'kind'")?;
            let snapshot = repo.build_index(false)?;
            for node in snapshot.get_by_kind(kind) {
                print_node_line(node);
            }
            Ok(true)
        }
        Some(("children", args)) => {
            let id = required(args, "id")?;
            let snapshot = repo.build_index(false)?;
            for node in snapshot.children(id) {
                print_node_line(node);
            }
            Ok(true)
        }
        Some(("trace", args)) => {
            let id = required(args, "id")?;
            let snapshot = repo.build_index(false)?;
            let path = snapshot.trace_path(id);
            if path.is_empty() {
                eprintln!("artifact '{id}' not found");
                return Ok(false);
            }
            let ids: Vec<&str> = path.iter().map(|node| node.id.as_str()).collect();
            println!("{}", ids.join(" -> "));
            Ok(true)
        }
        Some(("pending", _)) => {
            let queue = repo.pending().context("failed to index the corpus")?;
            println!("{}", serde_json::to_string_pretty(&queue)?);
            Ok(true)
        }
        Some(("check-transition", args)) => {
            let id = required(args, "id")?;
            let status = *args
                .get_one::<Status>("status")
                .context("missing argument 'status'")?;
            report_gate(repo.authorize_transition(id, status))
        }
        Some(("check-create", args)) => {
            let kind = *args
                .get_one::<ArtifactKind>("kind")
                .context("missing argument 'kind'")?;
            let parent = args.get_one::<String>("parent").map(String::as_str);
            report_gate(repo.authorize_create(kind, parent))
        }
        _ => Ok(true),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let matches = cli().get_matches();
    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
