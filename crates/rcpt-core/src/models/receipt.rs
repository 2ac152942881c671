//! Receipt records as kept by the record store.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::candidates::{AutoFillField, FieldCandidates};

/// A confirmed receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub merchant_name: String,
    pub purchase_date: NaiveDateTime,
    pub total_amount: Decimal,
    pub tax_amount: Option<Decimal>,
    pub tip_amount: Option<Decimal>,
    pub currency_code: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    /// Opaque token of the stored receipt image.
    pub image_token: Option<String>,
    pub ocr_text: Option<String>,
    pub ocr_locale_identifier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub line_items: Vec<LineItem>,
    /// Fields whose value was accepted from OCR candidates.
    pub auto_filled_fields: BTreeSet<AutoFillField>,
}

/// One purchased item on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl LineItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            quantity: None,
            unit_price: None,
            total: None,
        }
    }
}

/// An editable receipt form before it is saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDraft {
    pub merchant_name: String,
    pub purchase_date: Option<NaiveDateTime>,
    pub total_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub tip_amount: Option<Decimal>,
    pub currency_code: Option<String>,
    pub payment_method: String,
    pub notes: String,
    pub line_items: Vec<LineItem>,
    pub auto_filled_fields: BTreeSet<AutoFillField>,
}

impl ReceiptDraft {
    /// Pre-fill a draft from OCR candidates.
    ///
    /// Each field taken from `candidates` is recorded as auto-filled.
    pub fn from_candidates(candidates: &FieldCandidates) -> Self {
        let mut draft = Self {
            merchant_name: candidates.merchant_name.clone().unwrap_or_default(),
            purchase_date: candidates.purchase_date,
            total_amount: candidates.total_amount,
            tax_amount: candidates.tax_amount,
            tip_amount: candidates.tip_amount,
            currency_code: candidates.currency_code.clone(),
            ..Default::default()
        };
        draft.auto_filled_fields = candidates.detected_fields().into_iter().collect();
        draft
    }

    /// Drop auto-filled provenance for a field the user changed.
    pub fn mark_edited(&mut self, field: AutoFillField) {
        self.auto_filled_fields.remove(&field);
    }

    pub fn normalized_payment_method(&self) -> Option<String> {
        non_blank(&self.payment_method)
    }

    pub fn normalized_notes(&self) -> Option<String> {
        non_blank(&self.notes)
    }

    /// A draft can be saved once it names a merchant and has a total.
    pub fn is_valid(&self) -> bool {
        self.total_amount.is_some() && !self.merchant_name.trim().is_empty()
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_draft_from_candidates_records_provenance() {
        let candidates = FieldCandidates {
            merchant_name: Some("Blue Bottle Coffee".into()),
            total_amount: Some(Decimal::from_str("15.35").unwrap()),
            currency_code: Some("USD".into()),
            ..Default::default()
        };

        let draft = ReceiptDraft::from_candidates(&candidates);

        assert_eq!(draft.merchant_name, "Blue Bottle Coffee");
        assert_eq!(draft.currency_code.as_deref(), Some("USD"));
        assert!(draft.is_valid());
        assert_eq!(
            draft.auto_filled_fields.iter().copied().collect::<Vec<_>>(),
            vec![AutoFillField::MerchantName, AutoFillField::TotalAmount]
        );
    }

    #[test]
    fn test_mark_edited_removes_provenance() {
        let candidates = FieldCandidates {
            tax_amount: Some(Decimal::ONE),
            ..Default::default()
        };
        let mut draft = ReceiptDraft::from_candidates(&candidates);
        draft.mark_edited(AutoFillField::TaxAmount);
        assert!(draft.auto_filled_fields.is_empty());
    }

    #[test]
    fn test_draft_validity() {
        let mut draft = ReceiptDraft::default();
        assert!(!draft.is_valid());
        draft.merchant_name = "   ".into();
        draft.total_amount = Some(Decimal::ZERO);
        assert!(!draft.is_valid());
        draft.merchant_name = "Corner Shop".into();
        assert!(draft.is_valid());
    }

    #[test]
    fn test_normalized_optionals() {
        let draft = ReceiptDraft {
            payment_method: "  ".into(),
            notes: "Team lunch".into(),
            ..Default::default()
        };
        assert_eq!(draft.normalized_payment_method(), None);
        assert_eq!(draft.normalized_notes().as_deref(), Some("Team lunch"));
    }
}
