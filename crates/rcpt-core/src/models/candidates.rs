//! Best-guess receipt fields.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Candidate values inferred from recognized receipt lines.
///
/// Every field is optional. `None` means no confident guess; a detected total
/// of `0.00` is `Some(0.00)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCandidates {
    pub merchant_name: Option<String>,
    pub purchase_date: Option<NaiveDateTime>,
    pub total_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub tip_amount: Option<Decimal>,
    /// ISO 4217 code inferred from a currency symbol.
    pub currency_code: Option<String>,
}

impl FieldCandidates {
    /// True when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.detected_fields().is_empty() && self.currency_code.is_none()
    }

    /// Form fields that have a candidate value, in form order.
    pub fn detected_fields(&self) -> Vec<AutoFillField> {
        let mut fields = Vec::new();
        if self.merchant_name.is_some() {
            fields.push(AutoFillField::MerchantName);
        }
        if self.purchase_date.is_some() {
            fields.push(AutoFillField::PurchaseDate);
        }
        if self.total_amount.is_some() {
            fields.push(AutoFillField::TotalAmount);
        }
        if self.tax_amount.is_some() {
            fields.push(AutoFillField::TaxAmount);
        }
        if self.tip_amount.is_some() {
            fields.push(AutoFillField::TipAmount);
        }
        fields
    }
}

/// Receipt form fields that can carry auto-filled provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoFillField {
    MerchantName,
    PurchaseDate,
    TotalAmount,
    TaxAmount,
    TipAmount,
    PaymentMethod,
}

impl AutoFillField {
    pub fn display_name(&self) -> &'static str {
        match self {
            AutoFillField::MerchantName => "Merchant",
            AutoFillField::PurchaseDate => "Date",
            AutoFillField::TotalAmount => "Total",
            AutoFillField::TaxAmount => "Tax",
            AutoFillField::TipAmount => "Tip",
            AutoFillField::PaymentMethod => "Payment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_candidates() {
        let candidates = FieldCandidates::default();
        assert!(candidates.is_empty());
        assert!(candidates.detected_fields().is_empty());
    }

    #[test]
    fn test_zero_total_is_detected() {
        let candidates = FieldCandidates {
            total_amount: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(!candidates.is_empty());
        assert_eq!(candidates.detected_fields(), vec![AutoFillField::TotalAmount]);
    }

    #[test]
    fn test_serializes_decimals_as_strings() {
        let candidates = FieldCandidates {
            total_amount: Some(Decimal::new(1535, 2)),
            ..Default::default()
        };
        let json = serde_json::to_value(&candidates).unwrap();
        assert_eq!(json["total_amount"], serde_json::json!("15.35"));
        assert!(json["merchant_name"].is_null());
    }
}
