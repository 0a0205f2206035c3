//! Billing computation routes.
//!
//! Stateless endpoints over the core plan builder, surcharge calculator,
//! and reconciliation projection. The caller owns persistence: generated
//! schedules and reconciliations are returned, never stored.

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use advoga_core::billing::{
    Installment, ParseError, PlanForm, PlanReconciliation, PolicyForm, ScheduleError, generate,
    input, late_surcharge, monthly_interest_choices, penalty_choices, reconcile,
};
use advoga_shared::AppError;
use advoga_shared::types::{ClientId, Money};

use super::error_response;

/// Creates the billing routes.
pub fn routes() -> Router {
    Router::new()
        .route("/billing/plan/summary", post(plan_summary))
        .route("/billing/plan/schedule", post(plan_schedule))
        .route("/billing/plan/reconcile", post(plan_reconcile))
        .route("/billing/surcharge/preview", post(surcharge_preview))
        .route("/billing/policy-options", get(policy_options))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for plan summary computation.
#[derive(Debug, Deserialize)]
pub struct PlanSummaryRequest {
    /// Contract value, as the form submits it.
    pub contract_value: String,
    /// Raw plan form state.
    pub plan: PlanForm,
}

/// Response for plan summary computation.
#[derive(Debug, Serialize)]
pub struct PlanSummaryResponse {
    /// Number of recurring installments (the entrada never counts).
    pub total_installments: u32,
    /// Entrada plus the value of every group.
    pub plan_total: Money,
    /// Whether the plan total matches the contract value.
    pub is_valid: bool,
    /// Gap against the contract value, shown when out of balance.
    pub difference: Money,
}

/// Request body for schedule generation.
#[derive(Debug, Deserialize)]
pub struct PlanScheduleRequest {
    /// Owning client record.
    pub client_id: ClientId,
    /// Raw plan form state.
    pub plan: PlanForm,
}

/// Response for schedule generation.
#[derive(Debug, Serialize)]
pub struct PlanScheduleResponse {
    /// Generated installment rows, in schedule order.
    pub installments: Vec<Installment>,
}

/// Request body for plan reconciliation.
#[derive(Debug, Deserialize)]
pub struct PlanReconcileRequest {
    /// Contract value, as the form submits it.
    pub contract_value: String,
    /// Raw plan form state.
    pub plan: PlanForm,
    /// Persisted installment rows, as stored by the caller.
    pub installments: Vec<Installment>,
    /// Raw surcharge policy form state.
    pub policy: PolicyForm,
    /// Reference date, ISO format.
    pub as_of: String,
}

/// Request body for a surcharge preview on a single installment.
#[derive(Debug, Deserialize)]
pub struct SurchargePreviewRequest {
    /// Installment due date, ISO format.
    pub due_date: String,
    /// Installment base value.
    pub base_value: String,
    /// Reference date, ISO format.
    pub as_of: String,
    /// Raw surcharge policy form state.
    pub policy: PolicyForm,
}

/// Response for a surcharge preview.
#[derive(Debug, Serialize)]
pub struct SurchargePreviewResponse {
    /// Accrued compound interest.
    pub interest: Money,
    /// One-time fixed penalty.
    pub penalty: Money,
    /// Base value plus interest and penalty.
    pub total: Money,
}

/// UI rate choices for the surcharge policy selects.
#[derive(Debug, Serialize)]
pub struct PolicyOptionsResponse {
    /// Percent-per-month compound interest choices.
    pub monthly_interest_rates: Vec<Decimal>,
    /// Flat penalty percent choices.
    pub penalty_rates: Vec<Decimal>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_failure(err: &ParseError) -> Response {
    error_response(&AppError::Validation(err.to_string()))
}

fn schedule_failure(err: &ScheduleError) -> Response {
    error_response(&AppError::BusinessRule(err.to_string()))
}

/// Parses a date field that, unlike in the plan form, must be present.
fn parse_required_date(
    raw: &str,
    field: &str,
) -> Result<chrono::NaiveDate, Response> {
    match input::parse_date(raw) {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Err(error_response(&AppError::Validation(format!(
            "{field} is required"
        )))),
        Err(err) => Err(parse_failure(&err)),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Computes the monetary summary of a plan form against a contract value.
async fn plan_summary(Json(req): Json<PlanSummaryRequest>) -> Response {
    let contract_value = match input::parse_amount(&req.contract_value) {
        Ok(value) => value,
        Err(err) => return parse_failure(&err),
    };
    let plan = match req.plan.parse() {
        Ok(plan) => plan,
        Err(err) => return parse_failure(&err),
    };

    let summary = plan.summary(contract_value);
    Json(PlanSummaryResponse {
        total_installments: summary.total_installments,
        plan_total: Money::brl(summary.plan_total),
        is_valid: summary.is_valid,
        difference: Money::brl(summary.difference),
    })
    .into_response()
}

/// Materializes a plan form into dated installment rows.
async fn plan_schedule(Json(req): Json<PlanScheduleRequest>) -> Response {
    let plan = match req.plan.parse() {
        Ok(plan) => plan,
        Err(err) => return parse_failure(&err),
    };

    match generate(&plan, req.client_id) {
        Ok(installments) => {
            info!(
                client_id = %req.client_id,
                rows = installments.len(),
                "Generated installment schedule"
            );
            Json(PlanScheduleResponse { installments }).into_response()
        }
        Err(err) => schedule_failure(&err),
    }
}

/// Projects a plan and its persisted rows into the reconciliation view.
async fn plan_reconcile(Json(req): Json<PlanReconcileRequest>) -> Response {
    let contract_value = match input::parse_amount(&req.contract_value) {
        Ok(value) => value,
        Err(err) => return parse_failure(&err),
    };
    let plan = match req.plan.parse() {
        Ok(plan) => plan,
        Err(err) => return parse_failure(&err),
    };
    let policy = match req.policy.parse() {
        Ok(policy) => policy,
        Err(err) => return parse_failure(&err),
    };
    let as_of = match parse_required_date(&req.as_of, "as_of") {
        Ok(date) => date,
        Err(response) => return response,
    };

    let view: PlanReconciliation =
        reconcile(&plan, contract_value, &req.installments, &policy, as_of);
    Json(view).into_response()
}

/// Previews juros/multa on a single installment as of a reference date.
async fn surcharge_preview(Json(req): Json<SurchargePreviewRequest>) -> Response {
    let due_date = match parse_required_date(&req.due_date, "due_date") {
        Ok(date) => date,
        Err(response) => return response,
    };
    let as_of = match parse_required_date(&req.as_of, "as_of") {
        Ok(date) => date,
        Err(response) => return response,
    };
    let base_value = match input::parse_amount(&req.base_value) {
        Ok(value) => value,
        Err(err) => return parse_failure(&err),
    };
    let policy = match req.policy.parse() {
        Ok(policy) => policy,
        Err(err) => return parse_failure(&err),
    };

    let surcharge = late_surcharge(due_date, base_value, as_of, &policy);
    Json(SurchargePreviewResponse {
        interest: Money::brl(surcharge.interest),
        penalty: Money::brl(surcharge.penalty),
        total: Money::brl(surcharge.total),
    })
    .into_response()
}

/// Lists the fixed rate choices the policy form offers.
async fn policy_options() -> Json<PolicyOptionsResponse> {
    Json(PolicyOptionsResponse {
        monthly_interest_rates: monthly_interest_choices().to_vec(),
        penalty_rates: penalty_choices().to_vec(),
    })
}
