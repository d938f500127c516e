//! Checkout Form

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::orders::{Customer, ShippingAddress};

/// A field of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    ZipCode,
    Notes,
}

impl FormField {
    /// Fields that must be non-blank before payment can start.
    pub const REQUIRED: [FormField; 7] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Phone,
        FormField::Address,
        FormField::City,
        FormField::ZipCode,
    ];

    /// API name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::ZipCode => "zipCode",
            Self::Notes => "notes",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// Customer and shipping details collected at checkout.
///
/// Email and phone are only checked for presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    #[serde(default)]
    pub notes: String,
}

impl CheckoutForm {
    /// Current value of `field`.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Address => &self.address,
            FormField::City => &self.city,
            FormField::ZipCode => &self.zip_code,
            FormField::Notes => &self.notes,
        }
    }

    /// Replace the value of `field`.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Address => &mut self.address,
            FormField::City => &mut self.city,
            FormField::ZipCode => &mut self.zip_code,
            FormField::Notes => &mut self.notes,
        };

        *slot = value.into();
    }

    /// Required fields that are empty once whitespace is trimmed.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Whether every required field is filled in.
    pub fn is_valid(&self) -> bool {
        FormField::REQUIRED
            .iter()
            .all(|field| !self.get(*field).trim().is_empty())
    }

    /// Customer snapshot for an order.
    pub fn customer(&self) -> Customer {
        Customer {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    /// Shipping snapshot for an order.
    pub fn shipping(&self) -> ShippingAddress {
        ShippingAddress {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn filled_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Giulia".to_string(),
            last_name: "Verdi".to_string(),
            email: "giulia@example.com".to_string(),
            phone: "+39 333 1234567".to_string(),
            address: "Via Roma 1".to_string(),
            city: "Bologna".to_string(),
            zip_code: "40121".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn empty_form_misses_every_required_field() {
        let form = CheckoutForm::default();

        assert!(!form.is_valid());
        assert_eq!(form.missing_fields(), FormField::REQUIRED.to_vec());
    }

    #[test]
    fn notes_are_optional() {
        let form = filled_form();

        assert!(form.is_valid());
        assert!(form.missing_fields().is_empty());
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut form = filled_form();

        form.set(FormField::City, "   ");

        assert!(!form.is_valid());
        assert_eq!(form.missing_fields(), vec![FormField::City]);
    }

    #[test]
    fn every_required_field_is_checked() {
        for field in FormField::REQUIRED {
            let mut form = filled_form();

            form.set(field, "");

            assert!(!form.is_valid(), "{field} should be required");
        }
    }

    #[test]
    fn snapshots_are_trimmed() {
        let mut form = filled_form();

        form.set(FormField::ZipCode, " 40121 ");
        form.set(FormField::Notes, " citofono 3 ");

        assert_eq!(form.shipping().zip_code, "40121");
        assert_eq!(form.shipping().notes, "citofono 3");
        assert_eq!(form.customer().first_name, "Giulia");
    }
}
