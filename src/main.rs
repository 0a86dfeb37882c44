//! Command-line front end: send one request through a configured pipeline.
//!
//! ```text
//! http-pipeline [--config FILE] [-H "Name: value"]... [--json BODY] METHOD TARGET
//! ```
//!
//! `TARGET` is either an absolute URL or a path resolved against the
//! configured environment.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use http::header::{HeaderName, HeaderValue};
use http::Method;
use url::Url;

use http_pipeline::config::{load_config, PipelineConfig};
use http_pipeline::http::JsonBody;
use http_pipeline::observability::logging;
use http_pipeline::{HttpClient, ReqwestTransport, Request, Response};

#[derive(Parser)]
#[command(name = "http-pipeline")]
#[command(about = "Send a request through a configurable HTTP pipeline", long_about = None)]
struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request header as "Name: value"; may be repeated
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// JSON request body
    #[arg(long)]
    json: Option<String>,

    /// HTTP method, e.g. GET or POST
    method: String,

    /// Absolute URL or path relative to the configured environment
    target: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    logging::init(&config.observability.log_level);

    let client = HttpClient::from_config(&config, Arc::new(ReqwestTransport::default()))?;
    let request = build_request(&cli)?;

    match client.send(request).await {
        Ok(response) => {
            print_response(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("Error: {err}");
            if let Some(source) = err.underlying() {
                eprintln!("Caused by: {source}");
            }
            if let Some(response) = err.response() {
                print_response(response)?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build_request(cli: &Cli) -> Result<Request, Box<dyn Error>> {
    let method = Method::from_bytes(cli.method.to_uppercase().as_bytes())?;

    let mut request = match Url::parse(&cli.target) {
        Ok(url) if url.has_host() => {
            let mut request = Request::new(method, url.path()).with_scheme(url.scheme());
            if let Some(host) = url.host_str() {
                request = request.with_host(host);
            }
            if let Some(port) = url.port() {
                request = request.with_port(port);
            }
            if let Some(query) = url.query() {
                request = request.with_query(query);
            }
            request
        }
        _ => match cli.target.split_once('?') {
            Some((path, query)) => Request::new(method, path).with_query(query),
            None => Request::new(method, cli.target.as_str()),
        },
    };

    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("invalid header {header:?}, expected \"Name: value\""))?;
        request.headers_mut().append(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }

    if let Some(json) = &cli.json {
        let value: serde_json::Value = serde_json::from_str(json)?;
        request = request.with_body(JsonBody::new(value));
    }

    Ok(request)
}

fn print_response(response: &Response) -> Result<(), Box<dyn Error>> {
    println!("{}", response.status());
    let Some(body) = response.body() else {
        return Ok(());
    };

    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", String::from_utf8_lossy(body)),
    }
    Ok(())
}
