use anyhow::{Error, Result};
use clap::{Parser, Subcommand};
use ldfserver::config::Config;
use ldfserver::dispatch::{DispatchRequest, Dispatcher};
use ldfserver::server;
use log::info;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::form_urlencoded;

#[derive(Debug, Parser)]
#[command(name = "ldfserver")]
#[command(about = "Triple Pattern Fragments server for read-only RDF datasets")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve every configured dataset over HTTP until interrupted
    Serve {
        /// JSON configuration file
        #[clap(long, short)]
        config: PathBuf,
        /// Address to listen on
        #[clap(long, short, default_value = "127.0.0.1:3000")]
        bind: String,
    },
    /// Print one fragment of a dataset to stdout
    Fragment {
        /// JSON configuration file
        #[clap(long, short)]
        config: PathBuf,
        /// Name of the dataset
        dataset: String,
        /// Subject of the pattern, e.g. http://example.org/alice
        #[clap(long, short)]
        subject: Option<String>,
        /// Predicate of the pattern
        #[clap(long, short)]
        predicate: Option<String>,
        /// Object of the pattern, e.g. '"Alice"@en'
        #[clap(long, short)]
        object: Option<String>,
        /// Page number, starting at 1
        #[clap(long)]
        page: Option<u64>,
        /// Media type to write, defaults to text/turtle
        #[clap(long, short, default_value = "text/turtle")]
        format: String,
    },
    /// List the configured datasets
    Datasets {
        /// JSON configuration file
        #[clap(long, short)]
        config: PathBuf,
        /// Output JSON instead of text
        #[clap(long, action, default_value = "false")]
        json: bool,
    },
    /// Prints the version of the ldfserver binary
    Version,
}

pub fn run() -> Result<()> {
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

fn execute(cmd: Cli) -> Result<()> {
    // CLI flags for verbosity take precedence over RUST_LOG; without either we log warnings.
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    match cmd.command {
        Commands::Serve { config, bind } => {
            let dispatcher = Arc::new(load(&config)?);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(dispatcher, &bind))?;
        }
        Commands::Fragment {
            config,
            dataset,
            subject,
            predicate,
            object,
            page,
            format,
        } => {
            let dispatcher = load(&config)?;
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (name, value) in [
                ("subject", subject),
                ("predicate", predicate),
                ("object", object),
                ("page", page.map(|p| p.to_string())),
            ] {
                if let Some(value) = value {
                    query.append_pair(name, &value);
                }
            }
            let request = DispatchRequest::dataset(dataset)
                .with_query(query.finish())
                .with_accept(format);
            let response = dispatcher.handle(&request);
            std::io::stdout().write_all(&response.body)?;
            dispatcher.shutdown();
            if !response.status.is_success() {
                return Err(anyhow::anyhow!("request failed with status {}", response.status));
            }
        }
        Commands::Datasets { config, json } => {
            let config = read_config(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config.datasources)?);
            } else {
                for (name, source) in &config.datasources {
                    println!(
                        "{}\t{}\t{}",
                        name,
                        source.kind,
                        source.title.as_deref().unwrap_or(name)
                    );
                }
            }
        }
        Commands::Version => {
            println!("ldfserver {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn read_config(path: &Path) -> Result<Config> {
    let config = Config::from_file(path)?;
    info!(
        "Read configuration from {} ({} datasets)",
        path.display(),
        config.datasources.len()
    );
    Ok(config)
}

fn load(path: &Path) -> Result<Dispatcher> {
    Ok(Dispatcher::from_config(read_config(path)?)?)
}
