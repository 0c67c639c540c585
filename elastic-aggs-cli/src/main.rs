use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use elastic_aggs::{AggregationRequest, AggregationsConfig, LoggingConfig, Script, StatsAggregation};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "elastic-aggs")]
#[command(about = "Render Elasticsearch aggregation request bodies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the request described by a TOML definition file
    Render {
        /// Definition file
        #[arg(short, long, env = "ELASTIC_AGGS_CONFIG")]
        config: PathBuf,

        /// Pretty-print the JSON body
        #[arg(long)]
        pretty: bool,
    },

    /// Render a request with a single stats aggregation
    Stats {
        /// Name the aggregation is stored under
        #[arg(short, long, default_value = "stats")]
        name: String,

        /// Field to aggregate
        #[arg(short, long)]
        field: Option<String>,

        /// Script computing the value per document
        #[arg(short, long)]
        script: Option<String>,

        /// Script language
        #[arg(long, requires = "script")]
        lang: Option<String>,

        /// Display format for the results
        #[arg(long)]
        format: Option<String>,

        /// Number of hits to return
        #[arg(long)]
        size: Option<usize>,

        /// Pretty-print the JSON body
        #[arg(long)]
        pretty: bool,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| logging.level.clone()),
    );
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    // stdout carries the rendered body, logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    } else {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }
}

fn load_definitions(path: &Path) -> Result<AggregationsConfig> {
    let loaded = AggregationsConfig::load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    // The subscriber is configured from the file, so the load is logged once it exists
    init_tracing(&loaded.logging);
    tracing::debug!(
        path = %path.display(),
        aggregations = loaded.aggregations.len(),
        size = ?loaded.size,
        log_format = %loaded.logging.format,
        "loaded aggregation config"
    );
    Ok(loaded)
}

struct StatsArgs {
    name: String,
    field: Option<String>,
    script: Option<String>,
    lang: Option<String>,
    format: Option<String>,
    size: Option<usize>,
}

fn build_stats_request(args: StatsArgs) -> AggregationRequest {
    let mut agg = StatsAggregation::new();
    if let Some(field) = args.field {
        agg = agg.field(field);
    }
    if let Some(source) = args.script {
        let mut script = Script::new(source);
        if let Some(lang) = args.lang {
            script = script.lang(lang);
        }
        agg = agg.script(script);
    }
    if let Some(format) = args.format {
        agg = agg.format(format);
    }

    let mut request = AggregationRequest::new();
    if let Some(size) = args.size {
        request = request.size(size);
    }
    request.aggregation(args.name, agg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (request, pretty) = match cli.command {
        Commands::Render { config, pretty } => {
            let loaded = load_definitions(&config)?;
            tracing::info!(
                "Rendering {} aggregation(s) from {}",
                loaded.aggregations.len(),
                config.display()
            );
            (loaded.build()?, pretty)
        }
        Commands::Stats {
            name,
            field,
            script,
            lang,
            format,
            size,
            pretty,
        } => {
            init_tracing(&LoggingConfig::default());
            if field.is_none() && script.is_none() {
                tracing::warn!("Neither --field nor --script given; the service will reject this");
            }
            let request = build_stats_request(StatsArgs {
                name,
                field,
                script,
                lang,
                format,
                size,
            });
            (request, pretty)
        }
    };

    let body = request.to_json_string(pretty).map_err(|e| {
        tracing::error!(error_type = e.error_type(), "{}", e);
        e
    })?;
    println!("{}", body);
    Ok(())
}
