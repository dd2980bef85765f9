use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Command-line client for the Explorer Gate API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push a signed transaction
    Push {
        /// Raw transaction hex
        transaction: String,
    },
    /// Estimate the commission of a signed transaction
    Commission {
        /// Raw transaction hex
        transaction: String,
    },
    /// Estimate how much to pay for buying a coin
    Buy {
        coin_to_sell: String,
        coin_to_buy: String,
        value: String,
    },
    /// Estimate how much is received for selling a coin
    Sell {
        coin_to_sell: String,
        coin_to_buy: String,
        value: String,
    },
    /// Next nonce of an address
    Nonce {
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Push { transaction } => {
            client
                .post(format!("{}/api/v1/transaction/push", base))
                .json(&json!({ "transaction": transaction }))
                .send()
                .await?
        }
        Commands::Commission { transaction } => {
            client
                .get(format!("{}/api/v1/estimate/tx-commission", base))
                .query(&[("transaction", transaction)])
                .send()
                .await?
        }
        Commands::Buy { coin_to_sell, coin_to_buy, value } => {
            client
                .get(format!("{}/api/v1/estimate/coin-buy", base))
                .query(&[("coinToSell", coin_to_sell), ("coinToBuy", coin_to_buy), ("value", value)])
                .send()
                .await?
        }
        Commands::Sell { coin_to_sell, coin_to_buy, value } => {
            client
                .get(format!("{}/api/v1/estimate/coin-sell", base))
                .query(&[("coinToSell", coin_to_sell), ("coinToBuy", coin_to_buy), ("value", value)])
                .send()
                .await?
        }
        Commands::Nonce { address } => {
            client
                .get(format!("{}/api/v1/nonce/{}", base, address))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = serde_json::from_str::<Value>(&text)
        .and_then(|json| serde_json::to_string_pretty(&json))
        .unwrap_or(text);

    if status.is_success() {
        println!("{}", body);
    } else {
        eprintln!("Error: gate returned status {}", status);
        eprintln!("{}", body);
    }
    Ok(())
}
