use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edge_resizer::config::Config;
use edge_resizer::edge::{EdgeRequest, EdgeResponse};
use edge_resizer::image_optimizer::ResizeMetrics;
use edge_resizer::pipeline::EdgePipeline;
use edge_resizer::rewriter::RequestRewriter;
use edge_resizer::store::LocalObjectStore;
use http::header::ACCEPT;
use http::{HeaderMap, HeaderValue};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// Edge Resizer - on-the-fly image resizing between a CDN and an object store
#[derive(Parser, Debug)]
#[command(name = "edge-resizer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Test configuration and exit
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the origin request produced for a viewer URI
    Rewrite {
        /// Viewer request target, e.g. /images/300x200/80/product.jpg
        uri: String,
    },
    /// Run rewrite, fetch from a local directory and transform one request
    ServeOne {
        /// Viewer request target
        uri: String,

        /// Directory holding original objects (e.g. <root>/original/product.jpg)
        #[arg(long)]
        root: PathBuf,

        /// Accept header sent by the client
        #[arg(long)]
        accept: Option<String>,

        /// File the response body is written to
        #[arg(long)]
        out: PathBuf,

        /// Also write Prometheus metrics (text format) to this file
        #[arg(long)]
        metrics_out: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn headers_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        let entry = map
            .entry(name.as_str().to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(values) = entry {
            values.push(Value::String(value));
        }
    }
    Value::Object(map)
}

fn request_json(request: &EdgeRequest) -> Value {
    json!({
        "uri": request.uri,
        "querystring": request.querystring,
        "headers": headers_json(&request.headers),
    })
}

fn response_json(response: &EdgeResponse) -> Value {
    json!({
        "status": response.status.as_u16(),
        "headers": headers_json(&response.headers),
        "body_bytes": response.body.len(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;

    edge_resizer::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = ?args.config,
        resize_prefix = %config.resize.resize_prefix,
        original_prefix = %config.resize.original_prefix,
        max_width = config.resize.max_width,
        max_height = config.resize.max_height,
        "Configuration loaded successfully"
    );

    if args.check {
        println!("configuration OK");
        return Ok(());
    }

    match args.command {
        Some(Command::Rewrite { uri }) => {
            let rewritten = RequestRewriter::new(&config.resize).rewrite(EdgeRequest::from_target(&uri));
            println!("{}", serde_json::to_string_pretty(&request_json(&rewritten))?);
        }
        Some(Command::ServeOne {
            uri,
            root,
            accept,
            out,
            metrics_out,
        }) => {
            let mut request = EdgeRequest::from_target(&uri);
            if let Some(accept) = accept {
                let value = HeaderValue::from_str(&accept).context("Invalid Accept header value")?;
                request.headers.insert(ACCEPT, value);
            }

            let store = LocalObjectStore::new(root);
            let pipeline = EdgePipeline::new(&config, Arc::new(store));
            let response = pipeline.serve(request).await;

            std::fs::write(&out, &response.body)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("{}", serde_json::to_string_pretty(&response_json(&response))?);

            if let Some(metrics_out) = metrics_out {
                let text = ResizeMetrics::global()
                    .render_text()
                    .context("Failed to encode metrics")?;
                std::fs::write(&metrics_out, text)
                    .with_context(|| format!("Failed to write {}", metrics_out.display()))?;
            }
        }
        None => {
            anyhow::bail!("No command given; see --help");
        }
    }

    Ok(())
}
