//! Checkout Session
//!
//! Synchronous state machine behind one checkout attempt. It decides whether a submission may
//! start and builds the order snapshot. The remote calls themselves are made by the caller,
//! which reports their outcome back through [`CheckoutSession::complete`] or
//! [`CheckoutSession::fail`].
//!
//! ```text
//! Idle -> FormIncomplete <-> FormValid -> Submitting -> Completed
//!                                ^             |
//!                                +--- fail ----+
//! ```

use std::time::Duration;

use tracing::debug;

use crate::{
    cart::{CartStore, items::CartItem},
    checkout::{
        CheckoutError,
        form::{CheckoutForm, FormField},
        payment::{PaymentCapture, PaymentMethod, PaymentRequest, ProviderOrderId},
    },
    orders::{NewOrder, OrderItem},
    pricing::Quote,
    shipping::ShippingPolicy,
};

/// Where the shopper is sent when checkout is entered with an empty cart.
pub const CART_PATH: &str = "/carrello";

/// Where the shopper is sent after a completed order.
pub const COMPLETION_REDIRECT_PATH: &str = "/";

/// How long the success acknowledgment stays up before redirecting.
pub const COMPLETION_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Phase of a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Nothing entered yet.
    Idle,

    /// At least one required field is blank.
    FormIncomplete,

    /// All required fields are filled in.
    FormValid,

    /// A payment capture or order creation is in flight.
    Submitting,

    /// The order was created.
    Completed,
}

/// What to do when the shopper opens the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEntry {
    /// Show the checkout form.
    Proceed,

    /// Nothing to check out; send the shopper to [`CART_PATH`].
    RedirectToCart,

    /// The order was just placed; keep showing the acknowledgment.
    Confirmation,
}

#[derive(Debug, Clone, PartialEq)]
struct Authorization {
    order_id: ProviderOrderId,
    quote: Quote,
    items: Vec<CartItem>,
    capture: Option<PaymentCapture>,
}

/// State of one checkout attempt.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    form: CheckoutForm,
    payment_method: PaymentMethod,
    phase: CheckoutPhase,
    shipping: ShippingPolicy,
    authorization: Option<Authorization>,
}

impl CheckoutSession {
    /// Start a checkout priced with `shipping`. PayPal is preselected.
    pub fn new(shipping: ShippingPolicy) -> Self {
        Self {
            form: CheckoutForm::default(),
            payment_method: PaymentMethod::PayPal,
            phase: CheckoutPhase::Idle,
            shipping,
            authorization: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Form as last entered.
    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Selected payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Shipping policy used for every quote in this session.
    pub fn shipping_policy(&self) -> &ShippingPolicy {
        &self.shipping
    }

    /// A capture that succeeded but has no order yet.
    pub fn unrecorded_capture(&self) -> Option<&PaymentCapture> {
        self.authorization
            .as_ref()
            .and_then(|authorization| authorization.capture.as_ref())
    }

    /// Empty-cart guard, suppressed once the order is placed.
    pub fn entry(&self, cart: &CartStore) -> CheckoutEntry {
        if self.phase == CheckoutPhase::Completed {
            CheckoutEntry::Confirmation
        } else if cart.is_empty() {
            CheckoutEntry::RedirectToCart
        } else {
            CheckoutEntry::Proceed
        }
    }

    /// Live subtotal, shipping and total for `cart`.
    pub fn quote(&self, cart: &CartStore) -> Quote {
        Quote::for_items(cart.items(), &self.shipping)
    }

    /// Replace the form and re-derive validity.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight or after completion.
    pub fn update_form(&mut self, form: CheckoutForm) -> Result<CheckoutPhase, CheckoutError> {
        self.ensure_idle()?;

        self.form = form;
        self.phase = self.form_phase();

        Ok(self.phase)
    }

    /// Change one field and re-derive validity.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight or after completion.
    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<CheckoutPhase, CheckoutError> {
        self.ensure_idle()?;

        self.form.set(field, value);
        self.phase = self.form_phase();

        Ok(self.phase)
    }

    /// Switch payment method. Any uncaptured PayPal authorization is dropped.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight, after completion, or when leaving PayPal after
    /// funds were already captured.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.ensure_idle()?;

        if method == self.payment_method {
            return Ok(());
        }

        if self.unrecorded_capture().is_some() {
            return Err(CheckoutError::PaymentAlreadyCaptured);
        }

        self.payment_method = method;
        self.authorization = None;

        Ok(())
    }

    /// Amounts to authorize with the payment provider.
    ///
    /// # Errors
    ///
    /// Fails unless PayPal is selected, the cart has items and the form is valid. Nothing should
    /// be sent to the provider in that case.
    pub fn payment_request(&self, cart: &CartStore) -> Result<PaymentRequest, CheckoutError> {
        self.ensure_idle()?;
        self.ensure_method(PaymentMethod::PayPal)?;
        self.ensure_submittable(cart)?;

        Ok(PaymentRequest::new(self.quote(cart)))
    }

    /// Remember the provider order created for `request`.
    ///
    /// # Errors
    ///
    /// Fails if PayPal is not selected or a previous authorization was already captured.
    pub fn record_authorization(
        &mut self,
        order_id: ProviderOrderId,
        request: &PaymentRequest,
    ) -> Result<(), CheckoutError> {
        self.ensure_idle()?;
        self.ensure_method(PaymentMethod::PayPal)?;

        if self.unrecorded_capture().is_some() {
            return Err(CheckoutError::PaymentAlreadyCaptured);
        }

        debug!(provider_order = %order_id, "payment authorization recorded");

        self.authorization = Some(Authorization {
            order_id,
            quote: *request.quote(),
            items: Vec::new(),
            capture: None,
        });

        Ok(())
    }

    /// Start a cash-on-delivery submission and return the order to create.
    ///
    /// # Errors
    ///
    /// Fails if a submission is already running or done, cash is not selected, the cart is
    /// empty, or the form is incomplete.
    pub fn begin_cash(&mut self, cart: &CartStore) -> Result<NewOrder, CheckoutError> {
        self.ensure_idle()?;
        self.ensure_method(PaymentMethod::Cash)?;
        self.ensure_submittable(cart)?;

        let order = self.draft(cart.items(), &self.quote(cart), None);

        self.phase = CheckoutPhase::Submitting;

        Ok(order)
    }

    /// Start handling the provider's approval of `order_id`.
    ///
    /// The cart is snapshotted here; the paid order carries exactly these lines whatever
    /// happens to the cart while the capture is in flight. Returns the earlier capture when the
    /// funds were already collected, in which case the caller must not capture again and the
    /// live cart is no longer consulted.
    ///
    /// # Errors
    ///
    /// Fails if a submission is already running or done, PayPal is not selected, `order_id` is
    /// not the recorded authorization or the form became invalid. Before any capture it also
    /// fails when the cart is empty or no longer matches the authorized amounts.
    pub fn begin_approval(
        &mut self,
        order_id: &ProviderOrderId,
        cart: &CartStore,
    ) -> Result<Option<PaymentCapture>, CheckoutError> {
        self.ensure_idle()?;
        self.ensure_method(PaymentMethod::PayPal)?;

        let authorization = self.authorization_for(order_id)?;

        if let Some(capture) = authorization.capture.clone() {
            self.ensure_form()?;
            self.phase = CheckoutPhase::Submitting;

            return Ok(Some(capture));
        }

        self.ensure_submittable(cart)?;

        if self.quote(cart) != authorization.quote {
            return Err(CheckoutError::QuoteChanged);
        }

        if let Some(authorization) = self.authorization.as_mut() {
            authorization.items = cart.items().to_vec();
        }

        self.phase = CheckoutPhase::Submitting;

        Ok(None)
    }

    /// Store a successful capture and return the paid order to create.
    ///
    /// # Errors
    ///
    /// Fails unless an approval for the same provider order is in flight.
    pub fn record_capture(&mut self, capture: PaymentCapture) -> Result<NewOrder, CheckoutError> {
        if self.phase != CheckoutPhase::Submitting {
            return Err(CheckoutError::NotSubmitting);
        }

        let authorization = self
            .authorization
            .as_mut()
            .filter(|authorization| authorization.order_id == capture.order_id)
            .ok_or_else(|| CheckoutError::UnknownPaymentOrder(capture.order_id.clone()))?;

        authorization.capture = Some(capture);

        self.paid_order()
    }

    /// The paid order for the captured authorization, built from the lines snapshotted at
    /// approval.
    ///
    /// # Errors
    ///
    /// Fails unless an approval is in flight and its capture has been recorded.
    pub fn paid_order(&self) -> Result<NewOrder, CheckoutError> {
        if self.phase != CheckoutPhase::Submitting {
            return Err(CheckoutError::NotSubmitting);
        }

        let authorization = self
            .authorization
            .as_ref()
            .filter(|authorization| authorization.capture.is_some())
            .ok_or(CheckoutError::PaymentNotCaptured)?;

        Ok(self.draft(
            &authorization.items,
            &authorization.quote,
            Some(authorization.order_id.to_string()),
        ))
    }

    /// The order was created: the session is done.
    pub fn complete(&mut self) {
        self.phase = CheckoutPhase::Completed;
        self.authorization = None;
    }

    /// The submission failed: return to the form with everything kept.
    pub fn fail(&mut self) {
        if self.phase == CheckoutPhase::Submitting {
            self.phase = self.form_phase();
        }
    }

    fn form_phase(&self) -> CheckoutPhase {
        if self.form.is_valid() {
            CheckoutPhase::FormValid
        } else {
            CheckoutPhase::FormIncomplete
        }
    }

    fn ensure_idle(&self) -> Result<(), CheckoutError> {
        match self.phase {
            CheckoutPhase::Submitting => Err(CheckoutError::SubmissionInProgress),
            CheckoutPhase::Completed => Err(CheckoutError::AlreadyCompleted),
            CheckoutPhase::Idle | CheckoutPhase::FormIncomplete | CheckoutPhase::FormValid => {
                Ok(())
            }
        }
    }

    fn ensure_method(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        if self.payment_method == method {
            Ok(())
        } else {
            Err(CheckoutError::WrongPaymentMethod(self.payment_method))
        }
    }

    fn authorization_for(
        &self,
        order_id: &ProviderOrderId,
    ) -> Result<&Authorization, CheckoutError> {
        self.authorization
            .as_ref()
            .filter(|authorization| authorization.order_id == *order_id)
            .ok_or_else(|| CheckoutError::UnknownPaymentOrder(order_id.clone()))
    }

    fn ensure_submittable(&self, cart: &CartStore) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.ensure_form()
    }

    fn ensure_form(&self) -> Result<(), CheckoutError> {
        let missing = self.form.missing_fields();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::IncompleteForm(missing))
        }
    }

    fn draft(
        &self,
        items: &[CartItem],
        quote: &Quote,
        paypal_order_id: Option<String>,
    ) -> NewOrder {
        NewOrder {
            items: items.iter().map(OrderItem::from).collect(),
            customer: self.form.customer(),
            shipping: self.form.shipping(),
            total: *quote.total().amount(),
            payment_method: self.payment_method,
            payment_status: self.payment_method.initial_status(),
            paypal_order_id,
            shipping_cost: *quote.shipping().amount(),
        }
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new(ShippingPolicy::default())
    }
}
