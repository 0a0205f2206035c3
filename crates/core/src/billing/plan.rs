//! Plan builder: reducer-style mutations and the monetary summary.
//!
//! These operations back the plan form directly. Out-of-range indices are
//! absorbed as no-ops, never panics, and the group `order` values are
//! renumbered to a dense 1..N sequence before the caller can observe the
//! plan again. Validity is advisory: an out-of-balance plan still saves.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{GroupPatch, InstallmentGroup, MoveDirection, PaymentPlan, PlanSummary, UpfrontPayment};

/// Tolerance under which a plan total is considered equal to the contract
/// value (one centavo).
fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

impl PaymentPlan {
    /// Creates an empty plan with no entrada and no groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new empty group at the end of the plan.
    pub fn add_group(&mut self) {
        let order = u32::try_from(self.groups.len()).unwrap_or(u32::MAX).saturating_add(1);
        self.groups.push(InstallmentGroup::empty(order));
    }

    /// Removes the group at `index` and renumbers the remainder.
    ///
    /// Out-of-range indices are a no-op.
    pub fn remove_group(&mut self, index: usize) {
        if index >= self.groups.len() {
            return;
        }
        self.groups.remove(index);
        self.renumber();
    }

    /// Swaps the group at `index` with its immediate neighbor.
    ///
    /// A no-op when the neighbor does not exist (first group moved up, last
    /// group moved down) or when `index` is out of range.
    pub fn move_group(&mut self, index: usize, direction: MoveDirection) {
        if index >= self.groups.len() {
            return;
        }
        let neighbor = match direction {
            MoveDirection::Up => {
                let Some(n) = index.checked_sub(1) else {
                    return;
                };
                n
            }
            MoveDirection::Down => {
                let n = index + 1;
                if n >= self.groups.len() {
                    return;
                }
                n
            }
        };
        self.groups.swap(index, neighbor);
        self.renumber();
    }

    /// Applies a single-field patch to the group at `index`.
    ///
    /// Out-of-range indices are a no-op. No cross-field validation happens
    /// here; inconsistencies surface through [`PaymentPlan::summary`].
    pub fn update_group(&mut self, index: usize, patch: GroupPatch) {
        let Some(group) = self.groups.get_mut(index) else {
            return;
        };
        match patch {
            GroupPatch::Description(description) => group.description = description,
            GroupPatch::Count(count) => group.count = count,
            GroupPatch::InstallmentValue(value) => group.installment_value = value,
            GroupPatch::StartDate(date) => group.start_date = date,
        }
    }

    /// Sets or replaces the entrada.
    pub fn set_upfront(&mut self, value: Decimal, due_date: Option<NaiveDate>) {
        self.upfront = Some(UpfrontPayment { value, due_date });
    }

    /// Removes the entrada.
    pub fn clear_upfront(&mut self) {
        self.upfront = None;
    }

    /// Computes the monetary summary against the contract value.
    ///
    /// `plan_total` is the entrada (when present) plus `count x value` over
    /// every group; the plan is valid when the total matches the contract
    /// value to within one centavo. Group order never affects the totals.
    #[must_use]
    pub fn summary(&self, contract_value: Decimal) -> PlanSummary {
        let total_installments = self.groups.iter().map(|g| g.count).sum();
        let upfront_value = self.upfront.as_ref().map_or(Decimal::ZERO, |u| u.value);
        let plan_total = upfront_value
            + self
                .groups
                .iter()
                .map(InstallmentGroup::total)
                .sum::<Decimal>();
        let difference = (plan_total - contract_value).abs();

        PlanSummary {
            total_installments,
            plan_total,
            is_valid: difference < tolerance(),
            difference,
        }
    }

    fn renumber(&mut self) {
        for (i, group) in self.groups.iter_mut().enumerate() {
            group.order = u32::try_from(i).unwrap_or(u32::MAX).saturating_add(1);
        }
    }
}
