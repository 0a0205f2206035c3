//! Payment-plan construction, late-payment surcharges, and reconciliation.
//!
//! A contract's total value is split into an optional upfront payment
//! (entrada) plus ordered groups of recurring installments (grupos de
//! parcelas). Everything here is in-memory computation; persisting the
//! results is the caller's concern.

pub mod input;
pub mod plan;
pub mod schedule;
pub mod surcharge;
pub mod types;


pub use input::{GroupForm, ParseError, PlanForm, PolicyForm, UpfrontForm};
pub use schedule::{
    Installment, InstallmentStatus, InstallmentView, PlanReconciliation, ScheduleError, generate,
    reconcile, regenerate,
};
pub use surcharge::{
    Surcharge, SurchargePolicy, late_surcharge, monthly_interest_choices, penalty_choices,
    whole_months_between,
};
pub use types::{
    GroupPatch, InstallmentGroup, MoveDirection, PaymentPlan, PlanSummary, UpfrontPayment,
};
