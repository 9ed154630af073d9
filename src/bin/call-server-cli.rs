use clap::{Parser, Subcommand};
use reqwest::{Method, StatusCode};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "call-server-cli")]
#[command(about = "Issue requests against a running call-server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch data through the proxy
    Get,
    /// Create a record from a JSON document
    Post { body: String },
    /// Update a record; the JSON document must carry an `id`
    Put { body: String },
    /// Delete the record with the given id
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}/api/call-server", cli.url.trim_end_matches('/'));

    let request = match cli.command {
        Commands::Get => client.request(Method::GET, &endpoint),
        Commands::Post { body } => {
            let body: Value = serde_json::from_str(&body)?;
            client.request(Method::POST, &endpoint).json(&body)
        }
        Commands::Put { body } => {
            let body: Value = serde_json::from_str(&body)?;
            client.request(Method::PUT, &endpoint).json(&body)
        }
        Commands::Delete { id } => client
            .request(Method::DELETE, &endpoint)
            .query(&[("id", id)]),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match render(status, text) {
        Ok(body) => {
            println!("{}", body);
            Ok(())
        }
        Err(body) => {
            eprintln!("{}", body);
            Err(format!("call-server returned status {}", status).into())
        }
    }
}

/// Pretty-print a JSON body; `Err` carries the body of a non-2xx reply.
fn render(status: StatusCode, text: String) -> Result<String, String> {
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or(text),
        Err(_) => text,
    };

    if status.is_success() {
        Ok(body)
    } else {
        Err(body)
    }
}
