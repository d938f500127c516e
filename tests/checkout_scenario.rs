//! End-to-end cart and checkout scenarios against the synchronous core.

use nutricart::prelude::*;
use rust_decimal::Decimal;
use testresult::TestResult;

fn product(id: &str, price: Decimal) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        category: "integratori".to_string(),
        price,
        image: format!("https://example.com/{id}.jpg"),
        description: String::new(),
        in_stock: true,
        featured: false,
    }
}

fn form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Marco".to_string(),
        last_name: "Bianchi".to_string(),
        email: "marco@example.com".to_string(),
        phone: "333 0000000".to_string(),
        address: "Via Emilia 10".to_string(),
        city: "Modena".to_string(),
        zip_code: "41121".to_string(),
        notes: "Suonare due volte".to_string(),
    }
}

fn scenario_cart(storage: Box<dyn CartStorage>) -> CartStore {
    let mut cart = CartStore::load(storage);
    let a = product("A", Decimal::new(10_00, 2));
    let b = product("B", Decimal::new(5_00, 2));

    cart.add_item(&a);
    cart.add_item(&a);
    cart.add_item(&b);

    cart
}

/// Stand-in for the order API: records every creation request.
#[derive(Debug, Default)]
struct OrderLedger {
    created: Vec<NewOrder>,
}

impl OrderLedger {
    fn create(&mut self, order: NewOrder) {
        self.created.push(order);
    }
}

#[test]
fn cash_checkout_creates_one_order_and_clears_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut cart = scenario_cart(Box::new(FileStorage::new(dir.path())));
    let mut session = CheckoutSession::default();
    let mut ledger = OrderLedger::default();

    assert_eq!(cart.count(), 3);
    assert_eq!(session.entry(&cart), CheckoutEntry::Proceed);

    let quote = session.quote(&cart);

    assert_eq!(*quote.subtotal().amount(), Decimal::new(25_00, 2));
    assert_eq!(*quote.shipping().amount(), Decimal::new(8_90, 2));
    assert_eq!(format_eur(quote.total()), "€33.90");

    session.update_form(form())?;
    session.select_payment_method(PaymentMethod::Cash)?;

    let order = session.begin_cash(&cart)?;

    assert!(session.begin_cash(&cart).is_err(), "double submit must be refused");

    ledger.create(order);
    session.complete();
    cart.clear();

    let [order] = ledger.created.as_slice() else {
        return Err("expected exactly one order".into());
    };

    assert_eq!(order.total, Decimal::new(33_90, 2));
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.paypal_order_id, None);
    assert!(cart.is_empty());
    assert_eq!(session.entry(&cart), CheckoutEntry::Confirmation);

    let reloaded = CartStore::load(Box::new(FileStorage::new(dir.path())));

    assert!(reloaded.is_empty(), "cleared cart must be persisted");

    Ok(())
}

#[test]
fn paypal_checkout_captures_before_creating_order() -> TestResult {
    let mut cart = scenario_cart(Box::new(MemoryStorage::new()));
    let mut session = CheckoutSession::default();

    assert_eq!(session.payment_method(), PaymentMethod::PayPal);
    assert!(
        session.payment_request(&cart).is_err(),
        "authorization must wait for a complete form"
    );

    session.update_form(form())?;

    let request = session.payment_request(&cart)?;

    assert_eq!(
        request.amounts(),
        ("25.00".to_string(), "8.90".to_string(), "33.90".to_string())
    );

    let provider_order = ProviderOrderId::new("5O190127TN364715T");

    session.record_authorization(provider_order.clone(), &request)?;

    assert_eq!(session.begin_approval(&provider_order, &cart)?, None);

    let order = session.record_capture(PaymentCapture {
        order_id: provider_order.clone(),
        capture_id: Some("3C679366HH908993F".to_string()),
        status: "COMPLETED".to_string(),
    })?;

    assert_eq!(order.total, *request.total().amount());
    assert_eq!(order.shipping_cost, *request.shipping().amount());
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.paypal_order_id.as_deref(), Some(provider_order.as_str()));

    session.complete();
    cart.clear();

    assert!(matches!(
        session.begin_approval(&provider_order, &cart),
        Err(CheckoutError::AlreadyCompleted)
    ));

    Ok(())
}

#[test]
fn failed_cash_submission_keeps_cart_and_form() -> TestResult {
    let cart = scenario_cart(Box::new(MemoryStorage::new()));
    let mut session = CheckoutSession::default();

    session.update_form(form())?;
    session.select_payment_method(PaymentMethod::Cash)?;
    session.begin_cash(&cart)?;
    session.fail();

    assert_eq!(session.phase(), CheckoutPhase::FormValid);
    assert_eq!(session.form(), &form());
    assert_eq!(cart.count(), 3);

    Ok(())
}
