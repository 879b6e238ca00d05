use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use schemaforge_codegen::{self, CodegenError, Config, PromptTemplate, CONFIG_FILE};
use schemaforge_core::error::SchemaError;
use schemaforge_core::injector::SchemaSource;
use std::env;
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new schemaforge.toml config file
    Init,

    /// Fetch and validate every configured table without writing output
    Check,

    /// Generate code once and exit
    Run,

    /// Generate code and watch for changes
    Watch,

    /// Print a generation prompt for one table
    Prompt {
        table: String,

        /// Overrides the prompt template from the config
        #[arg(long, value_enum)]
        template: Option<TemplateArg>,
    },

    /// Show metadata server health and the tables it knows
    Status,

    /// Ask the metadata server to drop its schema cache
    ClearCache,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateArg {
    Form,
    Table,
    Crud,
}

impl From<TemplateArg> for PromptTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Form => PromptTemplate::Form,
            TemplateArg::Table => PromptTemplate::Table,
            TemplateArg::Crud => PromptTemplate::Crud,
        }
    }
}

const EXAMPLE_CONFIG: &str = r#"version = "1.0"

[source]
url = "http://localhost:8000"
# token_env = "SCHEMAFORGE_TOKEN"
timeout_secs = 10
# snapshots = "schemas/"
# ui_url = "http://localhost:8001"

[cache]
ttl_secs = 300

[generate]
tables = ["invoices", "customers"]
component = "both"
language = "de"
styling = "both"
tests = true
documentation = true
prompt = "crud"

[output]
path = "src/generated"
format = false
"#;

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn progress_bar(len: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template("  {spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

async fn check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let bar = progress_bar(config.generate.tables.len())?;

    let result = schemaforge_codegen::check(config, |schema| {
        bar.println(format!(
            "  {} {} ({} columns)",
            style("✓").green(),
            schema.table,
            schema.columns.len()
        ));
        bar.inc(1);
    })
    .await;

    match result {
        Ok(()) => {
            bar.finish_and_clear();
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            Err(e.into())
        }
    }
}

async fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let bar = progress_bar(config.generate.tables.len())?;
    if config.output.format {
        bar.println("  Formatting written files with prettier");
    }

    let result = schemaforge_codegen::generate_with(config, |table, files| {
        bar.set_message(format!("{table} ({} files)", files.len()));
        bar.inc(1);
    })
    .await;

    let written = match result {
        Ok(written) => {
            bar.finish_and_clear();
            written
        }
        Err(e) => {
            bar.abandon();
            return Err(e.into());
        }
    };

    println!(
        "{} Wrote {} files to {}",
        style("✓").green(),
        written.len(),
        config.output.path.display()
    );
    Ok(())
}

async fn prompt(
    config: &Config,
    table: &str,
    template: Option<TemplateArg>,
) -> Result<(), Box<dyn std::error::Error>> {
    let injector = config.build_injector()?;
    let schema = schemaforge_codegen::check_table(&injector, table).await?;

    let mut options = config.generation_options();
    if let Some(template) = template {
        options = options.prompt_template(template.into());
    }

    println!("{}", schemaforge_codegen::generate_prompt(&schema, &options));
    Ok(())
}

async fn status(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.build_source()?;

    if let Some(http) = source.as_http() {
        let health = http.health().await?;
        let marker = if health.is_healthy() {
            style("✓").green()
        } else {
            style("✖").red()
        };
        println!("{} Server {}: {}", marker, http.base_url(), health.status);
        println!("  provider initialized: {}", health.provider_initialized);
        println!("  supabase connected:   {}", health.supabase_connected);
    }

    let shared = source.into_shared();
    let tables = shared.list_tables().await?;
    println!("Tables from {} ({}):", shared.describe(), tables.len());
    for table in tables {
        println!("  - {table}");
    }
    Ok(())
}

async fn clear_cache(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.build_source()?;
    match source.as_http() {
        Some(http) => {
            http.clear_remote_cache().await?;
            println!("{} Cleared the metadata server cache", style("✓").green());
        }
        None => println!("Snapshot sources have no remote cache to clear"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Init => {
            let config_path = env::current_dir()?.join(CONFIG_FILE);
            if config_path.exists() {
                println!("Config file already exists at {}", config_path.display());
                return Ok(());
            }

            fs::write(&config_path, EXAMPLE_CONFIG)?;
            println!("Created {CONFIG_FILE}");
            Ok(())
        }
        cmd => {
            match Config::find_and_load(&env::current_dir()?) {
                Ok((config, config_dir)) => {
                    env::set_current_dir(&config_dir)?;
                    println!("Using configuration from: {}", config_dir.display());

                    let result = match cmd {
                        Commands::Check => {
                            println!("Checking {} tables...", config.generate.tables.len());
                            check(&config).await.map(|()| println!("All checks passed!"))
                        }
                        Commands::Run => {
                            println!("Generating code...");
                            run(&config).await.map(|()| println!("Done!"))
                        }
                        Commands::Watch => {
                            println!("Starting watch mode...");
                            let config_path = config_dir.join(CONFIG_FILE);
                            schemaforge_codegen::watch(config, &config_path)
                                .await
                                .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
                        }
                        Commands::Prompt { table, template } => prompt(&config, &table, template).await,
                        Commands::Status => status(&config).await,
                        Commands::ClearCache => clear_cache(&config).await,
                        Commands::Init => unreachable!(),
                    };

                    if let Err(err) = &result {
                        let schema_error = match err.downcast_ref::<CodegenError>() {
                            Some(CodegenError::Schema(schema)) => Some(schema),
                            _ => err.downcast_ref::<SchemaError>(),
                        };
                        if let Some(schema) = schema_error {
                            eprintln!("Error: {}", schema.report());
                            std::process::exit(1);
                        }
                    }
                    result
                }
                Err(CodegenError::ConfigNotFound(_)) => {
                    eprintln!("Error: No {CONFIG_FILE} found in current directory or parent directories");
                    eprintln!("Run 'schemaforge init' to create a new config file");
                    std::process::exit(1);
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
