use clap::{Args, Subcommand};
use nutricart::{
    checkout::{CheckoutEntry, CheckoutForm, FormField, PaymentMethod, session::CART_PATH},
    pricing::{eur, format_eur},
};
use nutricart_app::{
    context::AppContext,
    domain::checkout::{CheckoutCompletion, CheckoutService, CheckoutServiceError},
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::print_quote;

#[derive(Debug, Args)]
pub(crate) struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    /// Show what would be ordered
    Summary,

    /// Place a cash-on-delivery order
    Cash(FormArgs),

    /// Pay with PayPal, then place the order
    Paypal(FormArgs),
}

#[derive(Debug, Args)]
struct FormArgs {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    zip_code: Option<String>,

    /// Delivery notes
    #[arg(long)]
    notes: Option<String>,
}

impl FormArgs {
    fn into_form(self) -> CheckoutForm {
        let mut form = CheckoutForm::default();

        for (field, value) in [
            (FormField::FirstName, self.first_name),
            (FormField::LastName, self.last_name),
            (FormField::Email, self.email),
            (FormField::Phone, self.phone),
            (FormField::Address, self.address),
            (FormField::City, self.city),
            (FormField::ZipCode, self.zip_code),
            (FormField::Notes, self.notes),
        ] {
            if let Some(value) = value {
                form.set(field, value);
            }
        }

        form
    }
}

pub(crate) async fn run(context: &AppContext, command: CheckoutCommand) -> Result<(), String> {
    let checkout = context.checkout();

    if checkout.enter().await == CheckoutEntry::RedirectToCart {
        return Err(format!("cart is empty, add products first ({CART_PATH})"));
    }

    match command.command {
        CheckoutSubcommand::Summary => {
            summary(&checkout).await;

            Ok(())
        }
        CheckoutSubcommand::Cash(form) => {
            prepare(&checkout, form, PaymentMethod::Cash).await?;

            let completion = checkout
                .submit_cash()
                .await
                .map_err(|error| format!("checkout failed: {error}"))?;

            print_completion(&completion);

            Ok(())
        }
        CheckoutSubcommand::Paypal(form) => {
            prepare(&checkout, form, PaymentMethod::PayPal).await?;
            paypal(&checkout).await
        }
    }
}

async fn summary(checkout: &CheckoutService) {
    let summary = checkout.summary().await;

    for item in &summary.items {
        println!(
            "{} x{}\t{}",
            item.name,
            item.quantity,
            format_eur(&eur(item.line_total()))
        );
    }

    println!();
    print_quote(&summary.quote);
}

async fn prepare(
    checkout: &CheckoutService,
    form: FormArgs,
    method: PaymentMethod,
) -> Result<(), String> {
    checkout
        .update_form(form.into_form())
        .await
        .map_err(|error| error.to_string())?;

    checkout
        .select_payment_method(method)
        .await
        .map_err(|error| error.to_string())?;

    summary(checkout).await;
    println!();

    Ok(())
}

async fn paypal(checkout: &CheckoutService) -> Result<(), String> {
    let approval = checkout
        .start_paypal()
        .await
        .map_err(|error| format!("could not start PayPal payment: {error}"))?;

    println!("approve the payment at:");
    println!("{}", approval.approve_url);
    println!();

    let mut stdin = BufReader::new(tokio::io::stdin());

    if !confirm(&mut stdin, "press Enter once approved, or type n to abort: ").await? {
        return Err("payment not approved, no order placed".to_string());
    }

    loop {
        match checkout.approve_paypal(&approval.order_id).await {
            Ok(completion) => {
                print_completion(&completion);

                return Ok(());
            }
            Err(error @ CheckoutServiceError::OrderNotRecorded { .. }) => {
                eprintln!("{error}");

                if !confirm(&mut stdin, "press Enter to retry recording the order: ").await? {
                    return Err(format!(
                        "payment {} was captured but no order exists, contact the shop",
                        approval.order_id
                    ));
                }
            }
            Err(error) => return Err(format!("checkout failed: {error}")),
        }
    }
}

async fn confirm<R>(input: &mut R, prompt: &str) -> Result<bool, String>
where
    R: AsyncBufReadExt + Unpin,
{
    eprint!("{prompt}");

    let mut line = String::new();

    let read = input
        .read_line(&mut line)
        .await
        .map_err(|error| format!("failed to read input: {error}"))?;

    Ok(read > 0 && !line.trim().eq_ignore_ascii_case("n"))
}

fn print_completion(completion: &CheckoutCompletion) {
    let order = &completion.order;

    println!("order {} placed", order.order_number);
    println!("id: {}", order.id);
    println!("payment: {} ({})", order.payment_method, order.payment_status);
    println!("total: {}", format_eur(&eur(order.total)));
}
