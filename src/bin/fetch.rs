//! One-shot HTTP client: issue a single request and print the response.

use std::process::ExitCode;

use clap::Parser;
use http::header::{HeaderValue, USER_AGENT};
use http::Method;
use restwire::client::DEFAULT_TIMEOUT_SECS;
use restwire::{observability, HttpClient, HttpRequest};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "fetch", about = "Issue a single HTTP request and print the response")]
struct Args {
    /// URL to fetch (http only).
    url: String,

    /// HTTP method.
    #[arg(long, default_value = "GET")]
    method: String,

    /// Request body; Content-Length is set automatically.
    #[arg(long)]
    body: Option<String>,

    /// Read timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Receive buffer size override in bytes.
    #[arg(long)]
    buffer_size: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    observability::logging::init();
    let args = Args::parse();

    let url = match Url::parse(&args.url) {
        Ok(url) if url.scheme() == "http" => url,
        Ok(url) => {
            eprintln!("unsupported scheme: {}", url.scheme());
            return ExitCode::FAILURE;
        }
        Err(error) => {
            eprintln!("bad URL: {error}");
            return ExitCode::FAILURE;
        }
    };
    let Some(host) = url.host_str().map(str::to_string) else {
        eprintln!("URL has no host");
        return ExitCode::FAILURE;
    };
    let method = match args.method.to_uppercase().parse::<Method>() {
        Ok(method) => method,
        Err(error) => {
            eprintln!("bad method: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target = format!("{target}?{query}");
    }

    let mut request = HttpRequest::new(method, target);
    request.set_host(host, url.port());
    request.set_header(USER_AGENT, HeaderValue::from_static("restwire-fetch"));
    if let Some(body) = args.body {
        request.set_content(body.into_bytes());
    }
    request.make_start_line();

    let mut client = HttpClient::new();
    client.set_timeout(args.timeout);

    match client.request(&request, args.buffer_size).await {
        Ok(response) => {
            println!(
                "{} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("")
            );
            for (name, value) in response.headers() {
                println!("{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
            }
            println!();
            println!("{}", String::from_utf8_lossy(response.content()));
            ExitCode::SUCCESS
        }
        Err(error) if client.timed_out() => {
            eprintln!("request failed: {error} (timed out)");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("request failed: {error}");
            ExitCode::FAILURE
        }
    }
}
