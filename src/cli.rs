//! Minimal CLI: manifest → (sozo schema queries) → TypeScript components
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::compile;
use crate::config::{self, GenerateConfig};
use crate::emit;
use crate::fetch::{SchemaSource, SozoSchemaSource};
use crate::manifest::Manifest;
use crate::mapping::TypeMode;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate statically-typed RECS component definitions from a world's model schemas
#[derive(Parser, Debug)]
#[command(name = "recs-codegen", version)]
pub struct CommandLineInterface {
    /// debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile every model in a manifest into one components file
    Generate(GenerateOut),
    /// fetch and translate a single model, print its type expression
    Inspect(InspectOut),
}

#[derive(Args, Debug, Clone)]
struct ConnectionSettings {
    /// JSON-RPC endpoint of the node serving the world
    #[arg(long)]
    rpc_url: String,

    /// world contract address
    #[arg(long)]
    world: String,

    /// schema query tool
    #[arg(long, default_value = "sozo")]
    sozo: String,

    /// per-model query timeout; unbounded if omitted
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct ModeSettings {
    /// force the target mode instead of deriving it from the recs version
    #[arg(long, value_enum)]
    mode: Option<TypeMode>,

    /// @dojoengine/recs version constraint (e.g. ^2.0.0)
    #[arg(long)]
    recs_version: Option<String>,

    /// package.json declaring the @dojoengine/recs dependency
    #[arg(long, default_value = "package.json")]
    package_json: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    /// manifest listing the world's models
    #[arg(long)]
    manifest: PathBuf,

    /// output .ts file ('-' for stdout)
    #[arg(short, long)]
    out: PathBuf,

    /// concurrent schema queries
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    #[command(flatten)]
    connection: ConnectionSettings,

    #[command(flatten)]
    mode: ModeSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct InspectOut {
    /// model name as declared in the world
    model: String,

    #[command(flatten)]
    connection: ConnectionSettings,

    #[command(flatten)]
    mode: ModeSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ModeSettings {
    fn resolve(&self) -> TypeMode {
        let (mode, origin) = config::resolve_mode(self.mode, self.recs_version.as_deref(), &self.package_json);
        tracing::info!(?mode, ?origin, "resolved target mode");
        eprintln!("...generating for {} version {}", config::RECS_PACKAGE, mode.describe());
        eprintln!("---------------------------");
        mode
    }
}

impl ConnectionSettings {
    fn config(&self, mode: TypeMode, jobs: usize) -> GenerateConfig {
        GenerateConfig {
            mode,
            rpc_url: self.rpc_url.clone(),
            world_address: self.world.clone(),
            sozo_program: self.sozo.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            jobs,
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        init_logging(self.verbose);
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let config = target.connection.config(target.mode.resolve(), target.jobs);
                let source = available_source(&config)?;

                let manifest_src = std::fs::read_to_string(&target.manifest)
                    .with_context(|| format!("failed to read manifest {}", target.manifest.display()))?;
                let manifest = Manifest::parse(&manifest_src)
                    .with_context(|| format!("invalid manifest {}", target.manifest.display()))?;

                let ts_src = generate(&manifest, &config, &source)?;
                if target.out.as_os_str() == "-" {
                    write_stdout(&mut std::io::stdout().lock(), &ts_src)?;
                } else {
                    write_output(&target.out, &ts_src)?;
                    eprintln!("{}", "file generated successfully".green());
                }
                Ok(())
            }
            Command::Inspect(target) => {
                let config = target.connection.config(target.mode.resolve(), 1);
                let source = available_source(&config)?;
                let fragment = compile::compile_model(&target.model, config.mode, &source)?;
                println!("{}", fragment.type_expr);
                println!("types: {}", serde_json::to_string(&fragment.custom_types)?);
                Ok(())
            }
        }
    }
}

/// Compile and render. Nothing is returned unless every model succeeded.
pub fn generate(manifest: &Manifest, config: &GenerateConfig, source: &dyn SchemaSource) -> Result<String> {
    tracing::info!(models = manifest.models.len(), jobs = config.jobs, "compiling manifest");
    let fragments = if config.jobs > 1 {
        compile::compile_parallel(manifest, config.mode, source, config.jobs)?
    } else {
        compile::compile(manifest, config.mode, source)?
    };
    Ok(emit::emit(&fragments))
}

/// Write next to the target then rename over it, so a failed write never
/// leaves a truncated file behind.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let Some(file_name) = path.file_name() else {
        bail!("output path {} does not name a file", path.display());
    };
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, contents)
        .with_context(|| format!("error writing file {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("error writing file {}", path.display()))?;
    Ok(())
}

/// Stdout gets exactly the bytes the file would.
fn write_stdout(out: &mut impl Write, contents: &str) -> Result<()> {
    out.write_all(contents.as_bytes()).context("error writing to stdout")?;
    out.flush().context("error writing to stdout")?;
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn available_source(config: &GenerateConfig) -> Result<SozoSchemaSource> {
    let source = config.schema_source();
    if !source.is_available() {
        bail!("unable to find `{}` command. Please install using `dojoup`.", source.program);
    }
    Ok(source)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
