use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "runtime-cli")]
#[command(about = "Management CLI for the HAProxy Runtime API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Shared API token, if the server enforces one.
    #[arg(short, long, env = "API_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the control socket and reload flag exist
    Health,
    /// Run a runtime API command, e.g. `exec show info`
    Exec {
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// Ask the reload watcher to reload HAProxy
    Reload,
    /// Show per-server status from `show stat`
    Stats {
        #[arg(short, long)]
        backend: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", cli.url)).send().await?,
        Commands::Exec { command } => {
            client
                .post(format!("{}/execute", cli.url))
                .json(&json!({ "token": cli.token, "command": command.join(" ") }))
                .send()
                .await?
        }
        Commands::Reload => {
            client
                .post(format!("{}/reload", cli.url))
                .json(&json!({ "token": cli.token }))
                .send()
                .await?
        }
        Commands::Stats { backend } => {
            client
                .post(format!("{}/stats", cli.url))
                .json(&json!({ "token": cli.token, "backend": backend }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Runtime API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    match json.get("output").and_then(Value::as_str) {
        // Raw command output reads better unquoted.
        Some(output) => println!("{}", output),
        None => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}
