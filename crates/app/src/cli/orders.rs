use clap::{Args, Subcommand};
use nutricart::pricing::{eur, format_eur};
use nutricart_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Show a placed order
    Show {
        /// Order id
        id: String,
    },
}

pub(crate) async fn run(context: &AppContext, command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::Show { id } => {
            let order = context
                .orders
                .get_order(&id)
                .await
                .map_err(|error| format!("failed to get order {id}: {error}"))?;

            println!("order_number: {}", order.order_number);
            println!("status: {}", order.status);
            println!("payment: {} ({})", order.payment_method, order.payment_status);
            println!(
                "created_at: {}",
                order
                    .created_at
                    .map_or_else(|| "unknown".to_string(), |value| value.to_string())
            );
            println!(
                "customer: {} {} <{}>",
                order.customer.first_name, order.customer.last_name, order.customer.email
            );
            println!(
                "ship_to: {}, {} {}",
                order.shipping.address, order.shipping.zip_code, order.shipping.city
            );

            for item in &order.items {
                println!(
                    "  {} x{} @ {}",
                    item.name,
                    item.quantity,
                    format_eur(&eur(item.price))
                );
            }

            println!("shipping: {}", format_eur(&eur(order.shipping_cost)));
            println!("total: {}", format_eur(&eur(order.total)));

            Ok(())
        }
    }
}
