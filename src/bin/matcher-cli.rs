//! Developer CLI for the driver matcher gateway.

use clap::{Parser, Subcommand};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use driver_matcher::security::{issue_token, AuthClaims, BEARER_PREFIX};

#[derive(Parser)]
#[command(name = "matcher-cli")]
#[command(about = "Developer CLI for the driver matcher gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint an HS256 token carrying `authenticated: true`
    Token {
        #[arg(short, long, env = "MATCHER_JWT_SECRET")]
        secret: String,

        #[arg(long, default_value = "matcher-cli")]
        subject: String,

        #[arg(long, default_value_t = 3600)]
        ttl_secs: i64,
    },
    /// Search for the nearest driver through the gateway
    Search {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        #[arg(short, long)]
        token: String,

        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        #[arg(long)]
        radius: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Token {
            secret,
            subject,
            ttl_secs,
        } => {
            let now = jsonwebtoken::get_current_timestamp() as i64;
            let claims = AuthClaims::authenticated(subject, now, ttl_secs);
            println!("{}", issue_token(&secret, &claims)?);
        }
        Commands::Search {
            url,
            token,
            latitude,
            longitude,
            radius,
        } => {
            let res = reqwest::Client::new()
                .get(format!("{}/matcher/api/v1/search", url.trim_end_matches('/')))
                .header(AUTHORIZATION, format!("{BEARER_PREFIX}{token}"))
                .query(&[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("radius", radius.to_string()),
                ])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    println!("Status: {status}");
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{text}"),
    }
    Ok(())
}
