use clap::{Args, Subcommand};
use nutricart::{
    cart::CartStore,
    pricing::{Quote, eur, format_eur},
};
use nutricart_app::{context::AppContext, domain::products::fetch_orderable};

use super::print_quote;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show cart contents and totals
    Show,

    /// Add a product, or one more of it
    Add {
        /// Product id
        id: String,
    },

    /// Remove a product line
    Remove {
        /// Product id
        id: String,
    },

    /// Set the quantity of a line; zero or less removes it
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },

    /// Add one unit of a line
    Inc {
        /// Product id
        id: String,
    },

    /// Remove one unit of a line
    Dec {
        /// Product id
        id: String,
    },

    /// Empty the cart
    Clear,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    if let CartSubcommand::Add { id } = &command.command {
        let product = fetch_orderable(context.products.as_ref(), id)
            .await
            .map_err(|error| format!("cannot add {id}: {error}"))?;

        context.cart.lock().await.add_item(&product);
    }

    let mut cart = context.cart.lock().await;

    match command.command {
        CartSubcommand::Show | CartSubcommand::Add { .. } => {}
        CartSubcommand::Remove { id } => cart.remove_item(&id),
        CartSubcommand::Set { id, quantity } => cart.update_quantity(&id, quantity),
        CartSubcommand::Inc { id } => cart.increment(&id),
        CartSubcommand::Dec { id } => cart.decrement(&id),
        CartSubcommand::Clear => cart.clear(),
    }

    if !cart.is_persistent() {
        eprintln!("warning: cart could not be saved, changes last only for this command");
    }

    print_cart(&cart, &Quote::for_items(cart.items(), &context.shipping));

    Ok(())
}

fn print_cart(cart: &CartStore, quote: &Quote) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    for item in cart.items() {
        println!(
            "{}\t{}\t{} x {}\t{}",
            item.id,
            item.name,
            item.quantity,
            format_eur(&eur(item.price)),
            format_eur(&eur(item.line_total()))
        );
    }

    println!();
    print_quote(quote);
}
