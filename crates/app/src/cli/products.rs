use clap::{Args, Subcommand};
use nutricart::{
    pricing::{eur, format_eur},
    products::Product,
};
use nutricart_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the catalog
    List {
        /// Only featured products
        #[arg(long)]
        featured: bool,
    },

    /// Show one product
    Show {
        /// Product id
        id: String,
    },
}

pub(crate) async fn run(context: &AppContext, command: ProductsCommand) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List { featured } => {
            let products = context
                .products
                .list_products(featured.then_some(true))
                .await
                .map_err(|error| format!("failed to list products: {error}"))?;

            if products.is_empty() {
                println!("no products found");
            }

            for product in &products {
                println!(
                    "{}\t{}\t{}{}",
                    product.id,
                    product.name,
                    format_eur(&eur(product.price)),
                    if product.in_stock { "" } else { "\t(out of stock)" }
                );
            }

            Ok(())
        }
        ProductsSubcommand::Show { id } => {
            let product = context
                .products
                .get_product(&id)
                .await
                .map_err(|error| format!("failed to get product {id}: {error}"))?;

            print_product(&product);

            Ok(())
        }
    }
}

fn print_product(product: &Product) {
    println!("id: {}", product.id);
    println!("name: {}", product.name);
    println!("category: {}", product.category);
    println!("price: {}", format_eur(&eur(product.price)));
    println!("in_stock: {}", product.in_stock);
    println!("featured: {}", product.featured);

    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
}
