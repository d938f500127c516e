use clap::{Parser, Subcommand};
use nutricart::pricing::{Quote, format_eur};
use nutricart_app::{config::AppConfig, context::AppContext};

mod cart;
mod checkout;
mod orders;
mod products;

#[derive(Debug, Parser)]
#[command(name = "nutricart", about = "Nutrition clinic shop CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Products(products::ProductsCommand),
    Cart(cart::CartCommand),
    Checkout(checkout::CheckoutCommand),
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to initialise: {error}"))?;

        match self.command {
            Commands::Products(command) => products::run(&context, command).await,
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Checkout(command) => checkout::run(&context, command).await,
            Commands::Orders(command) => orders::run(&context, command).await,
        }
    }
}

fn print_quote(quote: &Quote) {
    println!("items: {}", quote.total_quantity());
    println!("subtotal: {}", format_eur(quote.subtotal()));
    println!("shipping: {}", format_eur(quote.shipping()));
    println!("total: {}", format_eur(quote.total()));
}
