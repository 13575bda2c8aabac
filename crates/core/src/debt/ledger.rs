//! Pure debt mutations.
//!
//! Every function here leaves the debt consistent: `total_amount` recomputed
//! from unpaid items and the automatic status transition applied. Nothing is
//! persisted; callers store the mutated debt afterwards.

use hornero_shared::types::UserId;
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;

use super::types::{
    Debt, DebtItem, DebtItemInput, DebtStatus, DebtTotals, DebtType, UpdateDebtInput,
};
use crate::currency::{round2, to_bs, to_usd, validate_rate};
use crate::exchange::{Clock, RateSnapshot};

const MAX_CONCEPT_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_NOTES_LEN: usize = 1000;

/// Debt ledger operations.
pub struct DebtLedger;

impl DebtLedger {
    /// Validates submitted items and converts them to unpaid debt items.
    ///
    /// Concepts are trimmed. Errors name the offending item by its 1-based position.
    pub fn validate_items(items: &[DebtItemInput]) -> AppResult<Vec<DebtItem>> {
        if items.is_empty() {
            return Err(AppError::Validation(
                "At least one item is required".to_string(),
            ));
        }

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let position = idx + 1;
                let concept = item.concept.trim();
                if concept.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Item #{position} requires a concept"
                    )));
                }
                if concept.chars().count() > MAX_CONCEPT_LEN {
                    return Err(AppError::Validation(format!(
                        "Item #{position} concept exceeds {MAX_CONCEPT_LEN} characters"
                    )));
                }
                let quantity = u32::try_from(item.quantity)
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or_else(|| {
                        AppError::Validation(format!("Invalid quantity in item #{position}"))
                    })?;
                if item.unit_amount < Decimal::ZERO {
                    return Err(AppError::Validation(format!(
                        "Invalid unit amount in item #{position}"
                    )));
                }
                Ok(DebtItem {
                    concept: concept.to_string(),
                    quantity,
                    unit_amount: item.unit_amount,
                    is_paid: false,
                    paid_at: None,
                    paid_by: None,
                })
            })
            .collect()
    }

    /// Validates and trims a description.
    pub fn validate_description(description: &str) -> AppResult<String> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::Validation(format!(
                "Description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        Ok(description.to_string())
    }

    /// Validates and trims notes.
    pub fn validate_notes(notes: &str) -> AppResult<String> {
        let notes = notes.trim();
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(AppError::Validation(format!(
                "Notes exceed {MAX_NOTES_LEN} characters"
            )));
        }
        Ok(notes.to_string())
    }

    /// Sets `total_amount` to the USD value of the unpaid items.
    ///
    /// `vale` debts convert through their snapshot; a `vale` debt without one is
    /// an `InvalidState`.
    pub fn recompute_totals(debt: &mut Debt) -> AppResult<()> {
        let unpaid = Self::subtotal(&debt.items, false);
        debt.total_amount = match debt.kind {
            DebtType::Standard => round2(unpaid),
            DebtType::Vale => {
                let snapshot = debt.exchange_rate_snapshot.ok_or_else(|| {
                    AppError::InvalidState(format!("Vale debt {} has no rate snapshot", debt.id))
                })?;
                to_usd(unpaid, snapshot.rate)?
            }
        };
        Ok(())
    }

    /// Derived totals for reporting.
    #[must_use]
    pub fn calculate_totals(debt: &Debt) -> DebtTotals {
        let unpaid = Self::subtotal(&debt.items, false);
        let paid = Self::subtotal(&debt.items, true);
        let rate = debt.exchange_rate_snapshot.map(|s| s.rate);

        let original_usd = debt
            .items
            .iter()
            .map(|item| Self::usd_value(debt.kind, item.subtotal(), rate))
            .sum();

        let item_count = debt.items.len();
        let paid_count = debt.items.iter().filter(|i| i.is_paid).count();

        DebtTotals {
            unpaid_usd: Self::usd_value(debt.kind, unpaid, rate),
            unpaid_bs: Self::bs_value(debt.kind, unpaid, rate),
            paid_usd: Self::usd_value(debt.kind, paid, rate),
            paid_bs: Self::bs_value(debt.kind, paid, rate),
            original_usd,
            payment_percentage: Self::percentage(paid_count, item_count),
            is_fully_paid: item_count > 0 && paid_count == item_count,
        }
    }

    /// Marks the items at `indexes` as paid by `actor`.
    ///
    /// Every index is checked before anything changes. When all items end up
    /// paid the debt becomes `paid` and gets today's payment date if it had none.
    pub fn mark_paid(
        debt: &mut Debt,
        indexes: &[usize],
        actor: UserId,
        clock: &dyn Clock,
    ) -> AppResult<()> {
        Self::check_item_mutation(debt, indexes)?;

        let now = clock.now();
        for &idx in indexes {
            let item = &mut debt.items[idx];
            item.is_paid = true;
            item.paid_at = Some(now);
            item.paid_by = Some(actor);
        }

        Self::recompute_totals(debt)?;
        if Self::is_fully_paid(debt) {
            debt.status = DebtStatus::Paid;
            if debt.payment_date.is_none() {
                debt.payment_date = Some(clock.today());
            }
        }
        debt.updated_at = now;
        Ok(())
    }

    /// Clears the paid flag of the items at `indexes`.
    ///
    /// A `paid` debt that is no longer fully paid reverts to `pending` and
    /// loses its payment date.
    pub fn mark_unpaid(debt: &mut Debt, indexes: &[usize], clock: &dyn Clock) -> AppResult<()> {
        Self::check_item_mutation(debt, indexes)?;

        for &idx in indexes {
            let item = &mut debt.items[idx];
            item.is_paid = false;
            item.paid_at = None;
            item.paid_by = None;
        }

        Self::recompute_totals(debt)?;
        if debt.status == DebtStatus::Paid && !Self::is_fully_paid(debt) {
            debt.status = DebtStatus::Pending;
            debt.payment_date = None;
        }
        debt.updated_at = clock.now();
        Ok(())
    }

    /// Appends validated items to a `pending` debt.
    pub fn add_items(debt: &mut Debt, items: &[DebtItemInput], clock: &dyn Clock) -> AppResult<()> {
        Self::ensure_pending(debt, "add items to")?;
        let items = Self::validate_items(items)?;
        debt.items.extend(items);
        Self::recompute_totals(debt)?;
        debt.updated_at = clock.now();
        Ok(())
    }

    /// Applies a whitelisted patch.
    ///
    /// A manual move to `paid` settles every outstanding item (without a
    /// `paid_by`) so the paid status keeps matching the items.
    pub fn apply_update(
        debt: &mut Debt,
        patch: &UpdateDebtInput,
        clock: &dyn Clock,
    ) -> AppResult<()> {
        if debt.status == DebtStatus::Cancelled {
            return Err(AppError::InvalidState(
                "Cancelled debts cannot be modified".to_string(),
            ));
        }

        if let Some(next) = patch.status {
            if next != debt.status && !debt.status.can_transition_to(next) {
                return Err(AppError::InvalidState(format!(
                    "Cannot change debt status from {} to {next}",
                    debt.status
                )));
            }
        }

        if let Some(snapshot) = patch.exchange_rate_snapshot {
            Self::check_snapshot_change(debt, snapshot)?;
        }

        let description = patch
            .description
            .as_deref()
            .map(Self::validate_description)
            .transpose()?;
        let notes = patch.notes.as_deref().map(Self::validate_notes).transpose()?;

        let now = clock.now();
        if let Some(description) = description {
            debt.description = description;
        }
        if let Some(notes) = notes {
            debt.notes = notes;
        }
        if let Some(snapshot) = patch.exchange_rate_snapshot {
            debt.exchange_rate_snapshot = Some(snapshot);
        }
        if let Some(next) = patch.status {
            if next == DebtStatus::Paid {
                for item in debt.items.iter_mut().filter(|i| !i.is_paid) {
                    item.is_paid = true;
                    item.paid_at = Some(now);
                }
                if debt.payment_date.is_none() {
                    debt.payment_date = Some(clock.today());
                }
            }
            debt.status = next;
        }

        Self::recompute_totals(debt)?;
        debt.updated_at = now;
        Ok(())
    }

    /// Fails with `InvalidState` unless the debt is `pending`.
    pub fn ensure_pending(debt: &Debt, action: &str) -> AppResult<()> {
        if debt.status != DebtStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Cannot {action} a debt that is {}",
                debt.status
            )));
        }
        Ok(())
    }

    fn check_item_mutation(debt: &Debt, indexes: &[usize]) -> AppResult<()> {
        if debt.status == DebtStatus::Cancelled {
            return Err(AppError::InvalidState(
                "Items of a cancelled debt cannot be modified".to_string(),
            ));
        }
        if indexes.is_empty() {
            return Err(AppError::Validation(
                "At least one item index is required".to_string(),
            ));
        }
        if let Some(bad) = indexes.iter().find(|&&i| i >= debt.items.len()) {
            return Err(AppError::Validation(format!("Invalid item index: {bad}")));
        }
        Ok(())
    }

    fn check_snapshot_change(debt: &Debt, snapshot: RateSnapshot) -> AppResult<()> {
        validate_rate(snapshot.rate)?;
        match (debt.kind, debt.exchange_rate_snapshot) {
            (DebtType::Vale, Some(current)) if current != snapshot => Err(AppError::InvalidState(
                "The rate snapshot of a vale debt cannot be changed".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn is_fully_paid(debt: &Debt) -> bool {
        !debt.items.is_empty() && debt.items.iter().all(|i| i.is_paid)
    }

    fn subtotal(items: &[DebtItem], paid: bool) -> Decimal {
        items
            .iter()
            .filter(|i| i.is_paid == paid)
            .map(DebtItem::subtotal)
            .sum()
    }

    fn usd_value(kind: DebtType, raw: Decimal, rate: Option<Decimal>) -> Decimal {
        match kind {
            DebtType::Standard => round2(raw),
            DebtType::Vale => rate
                .and_then(|r| to_usd(raw, r).ok())
                .unwrap_or(Decimal::ZERO),
        }
    }

    fn bs_value(kind: DebtType, raw: Decimal, rate: Option<Decimal>) -> Decimal {
        match kind {
            DebtType::Vale => round2(raw),
            DebtType::Standard => rate
                .and_then(|r| to_bs(raw, r).ok())
                .unwrap_or(Decimal::ZERO),
        }
    }

    /// Whole percent, half rounded up.
    fn percentage(part: usize, whole: usize) -> u32 {
        if whole == 0 {
            return 0;
        }
        let value = (part * 200 + whole) / (whole * 2);
        u32::try_from(value).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::RateOrigin;
    use crate::testing::{fixed_clock, sample_debt};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn vale_snapshot(rate: Decimal) -> RateSnapshot {
        RateSnapshot {
            rate,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            source: RateOrigin::External,
        }
    }

    // ========================================================================
    // validate_items
    // ========================================================================

    #[test]
    fn test_validate_items_trims_concepts() {
        let items = DebtLedger::validate_items(&[DebtItemInput::new("  Harina  ", 2, dec!(5))])
            .unwrap();
        assert_eq!(items[0].concept, "Harina");
        assert_eq!(items[0].quantity, 2);
        assert!(!items[0].is_paid);
    }

    #[test]
    fn test_validate_items_errors_name_position() {
        let err = DebtLedger::validate_items(&[
            DebtItemInput::new("ok", 1, dec!(1)),
            DebtItemInput::new("bad", 0, dec!(1)),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Invalid quantity in item #2");

        let err = DebtLedger::validate_items(&[DebtItemInput::new("   ", 1, dec!(1))]).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Item #1 requires a concept");

        let err = DebtLedger::validate_items(&[DebtItemInput::new("x", 1, dec!(-0.01))]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(DebtLedger::validate_items(&[]).is_err());
        assert!(DebtLedger::validate_items(&[DebtItemInput::new("x", -3, dec!(1))]).is_err());
    }

    // ========================================================================
    // recompute_totals / calculate_totals
    // ========================================================================

    #[test]
    fn test_standard_total_is_unpaid_usd() {
        let mut debt = sample_debt(
            DebtType::Standard,
            &[("Pan", 2, dec!(1.255)), ("Queso", 1, dec!(3))],
        );
        debt.items[1].is_paid = true;
        DebtLedger::recompute_totals(&mut debt).unwrap();
        assert_eq!(debt.total_amount, dec!(2.51));
    }

    #[test]
    fn test_vale_total_converts_through_snapshot() {
        let mut debt = sample_debt(DebtType::Vale, &[("Adelanto", 1, dec!(400))]);
        debt.exchange_rate_snapshot = Some(vale_snapshot(dec!(40)));
        DebtLedger::recompute_totals(&mut debt).unwrap();
        assert_eq!(debt.total_amount, dec!(10.00));
    }

    #[test]
    fn test_vale_without_snapshot_is_invalid_state() {
        let mut debt = sample_debt(DebtType::Vale, &[("Adelanto", 1, dec!(400))]);
        debt.exchange_rate_snapshot = None;
        assert!(matches!(
            DebtLedger::recompute_totals(&mut debt),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_calculate_totals_standard_with_snapshot() {
        let mut debt = sample_debt(
            DebtType::Standard,
            &[("A", 1, dec!(10)), ("B", 2, dec!(2.5)), ("C", 1, dec!(1))],
        );
        debt.exchange_rate_snapshot = Some(vale_snapshot(dec!(36.5)));
        debt.items[0].is_paid = true;

        let totals = DebtLedger::calculate_totals(&debt);
        assert_eq!(totals.unpaid_usd, dec!(6.00));
        assert_eq!(totals.unpaid_bs, dec!(219.00));
        assert_eq!(totals.paid_usd, dec!(10.00));
        assert_eq!(totals.paid_bs, dec!(365.00));
        assert_eq!(totals.original_usd, dec!(16.00));
        assert_eq!(totals.payment_percentage, 33);
        assert!(!totals.is_fully_paid);
    }

    #[test]
    fn test_calculate_totals_standard_without_snapshot_has_zero_bs() {
        let debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(10))]);
        let totals = DebtLedger::calculate_totals(&debt);
        assert_eq!(totals.unpaid_bs, Decimal::ZERO);
        assert_eq!(totals.unpaid_usd, dec!(10.00));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(DebtLedger::percentage(1, 2), 50);
        assert_eq!(DebtLedger::percentage(2, 3), 67);
        assert_eq!(DebtLedger::percentage(1, 8), 13);
        assert_eq!(DebtLedger::percentage(0, 0), 0);
        assert_eq!(DebtLedger::percentage(4, 4), 100);
    }

    // ========================================================================
    // mark_paid / mark_unpaid
    // ========================================================================

    #[test]
    fn test_vale_paid_example() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Vale, &[("Adelanto", 1, dec!(400))]);
        debt.exchange_rate_snapshot = Some(vale_snapshot(dec!(40)));
        DebtLedger::recompute_totals(&mut debt).unwrap();

        let actor = UserId::new();
        DebtLedger::mark_paid(&mut debt, &[0], actor, &clock).unwrap();

        assert_eq!(debt.status, DebtStatus::Paid);
        assert_eq!(debt.payment_date, Some(clock.today()));
        assert_eq!(debt.total_amount, Decimal::ZERO);
        assert_eq!(debt.items[0].paid_by, Some(actor));
        let totals = DebtLedger::calculate_totals(&debt);
        assert_eq!(totals.unpaid_usd, Decimal::ZERO);
        assert_eq!(totals.paid_usd, dec!(10.00));
        assert!(totals.is_fully_paid);
    }

    #[test]
    fn test_partial_payment_keeps_pending() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(5)), ("B", 1, dec!(7))]);
        DebtLedger::mark_paid(&mut debt, &[1], UserId::new(), &clock).unwrap();
        assert_eq!(debt.status, DebtStatus::Pending);
        assert_eq!(debt.total_amount, dec!(5.00));
        assert_eq!(debt.payment_date, None);
    }

    #[test]
    fn test_existing_payment_date_is_kept() {
        let clock = fixed_clock();
        let planned = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(5))]);
        debt.payment_date = Some(planned);
        DebtLedger::mark_paid(&mut debt, &[0], UserId::new(), &clock).unwrap();
        assert_eq!(debt.payment_date, Some(planned));
    }

    #[test]
    fn test_out_of_range_index_changes_nothing() {
        let clock = fixed_clock();
        let mut debt = sample_debt(
            DebtType::Standard,
            &[("A", 1, dec!(1)), ("B", 1, dec!(2)), ("C", 1, dec!(3))],
        );
        let before = debt.clone();

        let err = DebtLedger::mark_paid(&mut debt, &[0, 5], UserId::new(), &clock).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(debt, before);
    }

    #[test]
    fn test_empty_index_list_is_rejected() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(1))]);
        assert!(matches!(
            DebtLedger::mark_paid(&mut debt, &[], UserId::new(), &clock),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            DebtLedger::mark_unpaid(&mut debt, &[], &clock),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_cancelled_rejects_item_changes() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(1))]);
        debt.status = DebtStatus::Cancelled;
        assert!(matches!(
            DebtLedger::mark_paid(&mut debt, &[0], UserId::new(), &clock),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            DebtLedger::mark_unpaid(&mut debt, &[0], &clock),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_unpaying_reverts_to_pending() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 2, dec!(5)), ("B", 1, dec!(1))]);
        DebtLedger::mark_paid(&mut debt, &[0, 1], UserId::new(), &clock).unwrap();
        assert_eq!(debt.status, DebtStatus::Paid);

        DebtLedger::mark_unpaid(&mut debt, &[0], &clock).unwrap();
        assert_eq!(debt.status, DebtStatus::Pending);
        assert_eq!(debt.payment_date, None);
        assert_eq!(debt.total_amount, dec!(10.00));
        assert_eq!(debt.items[0].paid_at, None);
        assert_eq!(debt.items[0].paid_by, None);
    }

    #[test]
    fn test_overdue_becomes_paid_when_settled() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(5))]);
        debt.status = DebtStatus::Overdue;
        DebtLedger::mark_paid(&mut debt, &[0], UserId::new(), &clock).unwrap();
        assert_eq!(debt.status, DebtStatus::Paid);
    }

    // ========================================================================
    // add_items / apply_update
    // ========================================================================

    #[test]
    fn test_add_items_only_while_pending() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(5))]);
        DebtLedger::add_items(&mut debt, &[DebtItemInput::new("B", 3, dec!(2))], &clock).unwrap();
        assert_eq!(debt.items.len(), 2);
        assert_eq!(debt.total_amount, dec!(11.00));

        debt.status = DebtStatus::Overdue;
        let before = debt.items.clone();
        let err = DebtLedger::add_items(&mut debt, &[DebtItemInput::new("C", 1, dec!(1))], &clock)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(debt.items, before);
    }

    #[test]
    fn test_manual_paid_settles_items_and_stamps_date() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(5)), ("B", 1, dec!(5))]);
        let patch = UpdateDebtInput {
            status: Some(DebtStatus::Paid),
            ..Default::default()
        };
        DebtLedger::apply_update(&mut debt, &patch, &clock).unwrap();
        assert_eq!(debt.status, DebtStatus::Paid);
        assert_eq!(debt.payment_date, Some(clock.today()));
        assert!(debt.items.iter().all(|i| i.is_paid && i.paid_by.is_none()));
        assert_eq!(debt.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_update_rejects_illegal_transition() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(5))]);
        debt.status = DebtStatus::Paid;
        let patch = UpdateDebtInput {
            status: Some(DebtStatus::Overdue),
            description: Some("changed".into()),
            ..Default::default()
        };
        assert!(matches!(
            DebtLedger::apply_update(&mut debt, &patch, &clock),
            Err(AppError::InvalidState(_))
        ));
        assert_ne!(debt.description, "changed");
    }

    #[test]
    fn test_vale_snapshot_is_immutable() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Vale, &[("A", 1, dec!(400))]);
        debt.exchange_rate_snapshot = Some(vale_snapshot(dec!(40)));

        let same = UpdateDebtInput {
            exchange_rate_snapshot: Some(vale_snapshot(dec!(40))),
            ..Default::default()
        };
        assert!(DebtLedger::apply_update(&mut debt, &same, &clock).is_ok());

        let other = UpdateDebtInput {
            exchange_rate_snapshot: Some(vale_snapshot(dec!(41))),
            ..Default::default()
        };
        assert!(matches!(
            DebtLedger::apply_update(&mut debt, &other, &clock),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_standard_snapshot_can_be_set() {
        let clock = fixed_clock();
        let mut debt = sample_debt(DebtType::Standard, &[("A", 1, dec!(10))]);
        let patch = UpdateDebtInput {
            exchange_rate_snapshot: Some(vale_snapshot(dec!(36.5))),
            notes: Some("  con tasa  ".into()),
            ..Default::default()
        };
        DebtLedger::apply_update(&mut debt, &patch, &clock).unwrap();
        assert_eq!(debt.notes, "con tasa");
        assert_eq!(DebtLedger::calculate_totals(&debt).unpaid_bs, dec!(365.00));
    }
}
