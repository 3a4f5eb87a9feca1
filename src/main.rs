use argo_canvas_rs::canvas::ids::{SequentialIds, UuidIds};
use argo_canvas_rs::canvas::mapper::{GraphMapper, MapperOptions};
use argo_canvas_rs::config::Settings;
use argo_canvas_rs::error::CanvasError;
use argo_canvas_rs::manifest::loader::ManifestLoader;
use argo_canvas_rs::manifest::schema;
use argo_canvas_rs::manifest::validator::{SchemaValidator, ValidationRules};
use argo_canvas_rs::pipeline::{self, Pipeline};
use argo_canvas_rs::server;
use clap::{Args as ClapArgs, Parser, Subcommand};
use dotenv::dotenv;

use std::fs;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug, Clone, Copy)]
struct RuleArgs {
    /// Report templates that share a name
    #[arg(long)]
    unique_names: bool,

    /// Report DAG tasks and steps that reference unknown templates
    #[arg(long)]
    resolve_references: bool,

    /// Enable every optional check
    #[arg(long)]
    strict: bool,
}

impl RuleArgs {
    fn rules(&self) -> ValidationRules {
        if self.strict {
            return ValidationRules::strict();
        }
        ValidationRules {
            unique_template_names: self.unique_names,
            resolve_references: self.resolve_references,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export canvas nodes (JSON) as a workflow manifest
    Export {
        /// Path to a JSON array of canvas nodes
        #[arg(short, long)]
        nodes: String,

        /// Workflow name
        #[arg(short = 'w', long)]
        name: Option<String>,

        /// Namespace; defaults to ARGO_CANVAS_NAMESPACE or "default"
        #[arg(long)]
        namespace: Option<String>,

        /// Write the manifest here instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Import a workflow manifest as canvas nodes (JSON)
    Import {
        /// Path to the manifest
        #[arg(short, long)]
        file: String,

        /// Use random ids instead of node-0, node-1, ...
        #[arg(long)]
        uuid: bool,
    },
    /// Validate a workflow manifest
    Validate {
        /// Path to the manifest
        #[arg(short, long)]
        file: String,

        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Print the JSON schema of workflow manifests
    Schema {
        /// Print only this definition, e.g. ContainerConfig
        #[arg(short, long)]
        definition: Option<String>,
    },
    /// Serve the editor API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        rules: RuleArgs,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let settings = Settings::from_env()?;

    Ok(run(args.command, settings).await?)
}

async fn run(command: Commands, mut settings: Settings) -> Result<ExitCode, CanvasError> {
    match command {
        Commands::Export {
            nodes,
            name,
            namespace,
            output,
            rules,
        } => {
            let graph = pipeline::load_nodes(&nodes)?;

            if let Some(namespace) = namespace {
                settings.namespace = Some(namespace).filter(|ns| !ns.is_empty());
            }
            let name = name.unwrap_or(settings.workflow_name);

            let pipeline = Pipeline::new(
                GraphMapper::new(MapperOptions {
                    namespace: settings.namespace,
                }),
                SchemaValidator::new(rules.rules()),
            );
            let result = pipeline.export(&graph, &name)?;

            for error in &result.report.errors {
                eprintln!("warning: {}", error);
            }

            match output {
                Some(path) => {
                    fs::write(&path, &result.manifest)?;
                    log::info!("Wrote manifest for '{}' to {}", name, path);
                }
                None => print!("{}", result.manifest),
            }
        }
        Commands::Import { file, uuid } => {
            let doc = ManifestLoader::new().load(&file)?;
            let nodes = if uuid {
                argo_canvas_rs::canvas::workflow_to_nodes(&doc, &mut UuidIds)
            } else {
                argo_canvas_rs::canvas::workflow_to_nodes(&doc, &mut SequentialIds::new())
            };
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
        Commands::Validate { file, rules } => {
            let doc = ManifestLoader::new().load(&file)?;
            let report = SchemaValidator::new(rules.rules()).validate(&doc);
            if report.valid {
                println!("{}: valid", file);
            } else {
                for error in &report.errors {
                    println!("{}: {}", file, error);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Schema { definition } => {
            let json = match definition {
                Some(name) => match schema::definition(&name) {
                    Some(def) => serde_json::to_string_pretty(def)?,
                    None => {
                        eprintln!(
                            "Unknown definition '{}'. Available: {}",
                            name,
                            schema::definition_names().join(", ")
                        );
                        return Ok(ExitCode::FAILURE);
                    }
                },
                None => serde_json::to_string_pretty(schema::manifest_schema())?,
            };
            println!("{}", json);
        }
        Commands::Serve { port, rules } => {
            // Fails only on the log bridge: env_logger already owns the `log`
            // facade, and the tracing subscriber is installed regardless.
            if let Err(err) = tracing_subscriber::fmt::try_init() {
                log::debug!("tracing subscriber left log records to env_logger: {}", err);
            }
            if let Some(port) = port {
                settings.port = port;
            }
            tracing::info!(port = settings.port, "Starting editor API");
            server::serve(settings, rules.rules()).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
