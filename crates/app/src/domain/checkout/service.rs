//! Checkout service.
//!
//! Drives a [`CheckoutSession`] against the remote order and payment services. Locks are taken
//! session first, then cart, and are never held across a remote call.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use nutricart::{
    cart::{CartStore, items::CartItem},
    checkout::{
        CheckoutEntry, CheckoutError, CheckoutForm, CheckoutPhase, CheckoutSession, FormField,
        PaymentMethod, ProviderOrderId,
        session::{COMPLETION_REDIRECT_DELAY, COMPLETION_REDIRECT_PATH},
    },
    orders::{NewOrder, Order, OrderItem},
    pricing::Quote,
    shipping::ShippingPolicy,
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::{
    checkout::errors::CheckoutServiceError,
    orders::OrdersService,
    payments::{PaymentApproval, PaymentProvider},
};

/// Cart shared between the cart views and checkout.
pub type SharedCart = Arc<Mutex<CartStore>>;

/// What the checkout page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    /// Current cart lines.
    pub items: Vec<CartItem>,

    /// Live subtotal, shipping and total.
    pub quote: Quote,

    /// Selected payment method.
    pub payment_method: PaymentMethod,

    /// Checkout phase.
    pub phase: CheckoutPhase,

    /// Required fields still blank.
    pub missing_fields: Vec<FormField>,
}

/// A placed order and where to send the shopper next.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutCompletion {
    /// The order as recorded by the backend.
    pub order: Order,

    /// Where to navigate once the acknowledgment has been shown.
    pub redirect_path: &'static str,

    /// How long the acknowledgment stays up.
    pub redirect_after: Duration,
}

/// One checkout attempt over the shared cart.
pub struct CheckoutService {
    cart: SharedCart,
    session: Mutex<CheckoutSession>,
    orders: Arc<dyn OrdersService>,
    payments: Option<Arc<dyn PaymentProvider>>,
}

impl Debug for CheckoutService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CheckoutService")
            .field("cart", &self.cart)
            .field("session", &self.session)
            .field("payments", &self.payments.is_some())
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Start a checkout over `cart`. PayPal steps fail when `payments` is `None`.
    #[must_use]
    pub fn new(
        cart: SharedCart,
        orders: Arc<dyn OrdersService>,
        payments: Option<Arc<dyn PaymentProvider>>,
        shipping: ShippingPolicy,
    ) -> Self {
        Self {
            cart,
            session: Mutex::new(CheckoutSession::new(shipping)),
            orders,
            payments,
        }
    }

    /// Decide whether the checkout page can be shown.
    pub async fn enter(&self) -> CheckoutEntry {
        let session = self.session.lock().await;
        let cart = self.cart.lock().await;

        session.entry(&cart)
    }

    /// Items, live totals and form state.
    pub async fn summary(&self) -> CheckoutSummary {
        let session = self.session.lock().await;
        let cart = self.cart.lock().await;

        CheckoutSummary {
            items: cart.items().to_vec(),
            quote: session.quote(&cart),
            payment_method: session.payment_method(),
            phase: session.phase(),
            missing_fields: session.form().missing_fields(),
        }
    }

    /// Replace the whole form.
    ///
    /// # Errors
    ///
    /// Fails while an order is being submitted or after it was placed.
    pub async fn update_form(
        &self,
        form: CheckoutForm,
    ) -> Result<CheckoutPhase, CheckoutServiceError> {
        Ok(self.session.lock().await.update_form(form)?)
    }

    /// Change one form field.
    ///
    /// # Errors
    ///
    /// Fails while an order is being submitted or after it was placed.
    pub async fn set_field(
        &self,
        field: FormField,
        value: impl Into<String> + Send,
    ) -> Result<CheckoutPhase, CheckoutServiceError> {
        Ok(self.session.lock().await.set_field(field, value)?)
    }

    /// Choose how to pay.
    ///
    /// # Errors
    ///
    /// Fails while an order is being submitted, after it was placed, or when leaving PayPal
    /// after the funds were captured.
    pub async fn select_payment_method(
        &self,
        method: PaymentMethod,
    ) -> Result<(), CheckoutServiceError> {
        Ok(self
            .session
            .lock()
            .await
            .select_payment_method(method)?)
    }

    /// Place a cash-on-delivery order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutServiceError::Checkout`] if the checkout cannot be submitted, without
    /// contacting the order service, or [`CheckoutServiceError::Orders`] if order creation failed.
    /// The cart and the form are kept on failure.
    pub async fn submit_cash(&self) -> Result<CheckoutCompletion, CheckoutServiceError> {
        let order = {
            let mut session = self.session.lock().await;
            let cart = self.cart.lock().await;

            session.begin_cash(&cart)?
        };

        let ordered = order.items.clone();

        match self.orders.create_order(order).await {
            Ok(created) => Ok(self.complete(created, &ordered).await),
            Err(source) => {
                warn!(error = %source, "cash order submission failed");

                self.session.lock().await.fail();

                Err(source.into())
            }
        }
    }

    /// Register the cart's amounts with the payment provider.
    ///
    /// # Errors
    ///
    /// Fails if PayPal is not configured or selected, the cart is empty, the form is
    /// incomplete, or the provider refuses the order.
    pub async fn start_paypal(&self) -> Result<PaymentApproval, CheckoutServiceError> {
        let payments = self.payments()?;

        let request = {
            let session = self.session.lock().await;
            let cart = self.cart.lock().await;

            session.payment_request(&cart)?
        };

        let approval = payments.create_order(&request).await?;

        self.session
            .lock()
            .await
            .record_authorization(approval.order_id.clone(), &request)?;

        Ok(approval)
    }

    /// The shopper approved `order_id`: capture the funds, then create the paid order.
    ///
    /// When an earlier attempt already captured the funds, the capture is reused and only the
    /// order is created.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutServiceError::Payment`] when the capture fails, in which case no order
    /// is created, and [`CheckoutServiceError::OrderNotRecorded`] when the funds were captured
    /// but the order could not be created.
    pub async fn approve_paypal(
        &self,
        order_id: &ProviderOrderId,
    ) -> Result<CheckoutCompletion, CheckoutServiceError> {
        let payments = self.payments()?;

        let order = {
            let mut session = self.session.lock().await;
            let cart = self.cart.lock().await;

            match session.begin_approval(order_id, &cart)? {
                Some(capture) => {
                    info!(provider_order = %capture.order_id, "reusing earlier payment capture");

                    let paid = session.paid_order();

                    Some(Self::or_fail(&mut session, paid)?)
                }
                None => None,
            }
        };

        let order = match order {
            Some(order) => order,
            None => self.capture(payments.as_ref(), order_id).await?,
        };

        let ordered = order.items.clone();

        match self.orders.create_order(order).await {
            Ok(created) => Ok(self.complete(created, &ordered).await),
            Err(source) => {
                error!(
                    provider_order = %order_id,
                    error = %source,
                    "payment captured but order not recorded"
                );

                self.session.lock().await.fail();

                Err(CheckoutServiceError::OrderNotRecorded {
                    order_id: order_id.clone(),
                    source,
                })
            }
        }
    }

    async fn capture(
        &self,
        payments: &dyn PaymentProvider,
        order_id: &ProviderOrderId,
    ) -> Result<NewOrder, CheckoutServiceError> {
        let capture = match payments.capture(order_id).await {
            Ok(capture) => capture,
            Err(source) => {
                warn!(provider_order = %order_id, error = %source, "payment capture failed");

                self.session.lock().await.fail();

                return Err(source.into());
            }
        };

        let mut session = self.session.lock().await;
        let recorded = session.record_capture(capture);

        Self::or_fail(&mut session, recorded)
    }

    async fn complete(&self, order: Order, ordered: &[OrderItem]) -> CheckoutCompletion {
        let mut session = self.session.lock().await;
        let mut cart = self.cart.lock().await;

        session.complete();
        cart.remove_ordered(ordered);

        info!(
            order = %order.id,
            order_number = %order.order_number,
            total = %order.total,
            "checkout completed"
        );

        CheckoutCompletion {
            order,
            redirect_path: COMPLETION_REDIRECT_PATH,
            redirect_after: COMPLETION_REDIRECT_DELAY,
        }
    }

    fn payments(&self) -> Result<Arc<dyn PaymentProvider>, CheckoutServiceError> {
        self.payments
            .clone()
            .ok_or(CheckoutServiceError::PaymentUnavailable)
    }

    fn or_fail<T>(
        session: &mut CheckoutSession,
        result: Result<T, CheckoutError>,
    ) -> Result<T, CheckoutServiceError> {
        result.map_err(|error| {
            session.fail();
            error.into()
        })
    }
}
