//! AWS Lambda handler for the retirement calculator
//!
//! Accepts calculator form fields as a JSON body and returns the headline
//! estimate, the capital trajectory and the retirement options table.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use chrono::{Datelike, Local, NaiveDate};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;

use pension_projection::input::FieldError;
use pension_projection::{
    Assumptions, CalculatorForm, NormalizedInputs, ProjectionConfig, ProjectionEngine, RetirementEstimate,
    RetirementOption, RetirementOptionsSweeper, SweepConfig,
};

/// Output of a calculation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub current_age: u32,
    pub annual_gross_salary: f64,
    pub estimate: RetirementEstimate,
    pub options: Vec<RetirementOption>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldErrorBody<'a>>,
}

#[derive(Debug, Serialize)]
struct FieldErrorBody<'a> {
    field: &'a str,
    message: String,
}

fn response(status_code: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code,
        headers: Default::default(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status_code: i64, message: String, field_errors: &[FieldError]) -> LambdaFunctionUrlResponse {
    let body = ErrorBody {
        error: message,
        fields: field_errors
            .iter()
            .map(|e| FieldErrorBody {
                field: e.field(),
                message: e.to_string(),
            })
            .collect(),
    };
    let json = serde_json::to_string(&body).unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    response(status_code, Some(json))
}

/// Run the estimate and the options sweep for one form
fn calculate(form: &CalculatorForm, as_of: NaiveDate) -> Result<CalculationResponse, LambdaFunctionUrlResponse> {
    let start = std::time::Instant::now();

    let assumptions = Assumptions::resolve(None)
        .map_err(|e| error_response(500, format!("Failed to load assumptions: {}", e), &[]))?;

    let normalized: NormalizedInputs = form
        .normalize(as_of, &assumptions.salary)
        .map_err(|e| error_response(400, e.to_string(), e.errors()))?;

    let engine = ProjectionEngine::new(assumptions, ProjectionConfig { start_year: as_of.year() });
    let estimate = engine.estimate(
        &normalized.projection,
        normalized.life_expectancy_months,
        normalized.minimal_pension,
    );

    let sweeper = RetirementOptionsSweeper::new(assumptions, SweepConfig { as_of });
    let options = sweeper.sweep(&normalized.sweep);

    Ok(CalculationResponse {
        current_age: normalized.current_age,
        annual_gross_salary: normalized.projection.annual_gross_salary,
        estimate,
        options,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;

    // Preflight; CORS headers come from the function URL configuration
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(response(204, None));
    }

    if request.is_base64_encoded {
        return Ok(error_response(400, "Expected a JSON text body".to_string(), &[]));
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let form: CalculatorForm = match serde_json::from_str(body) {
        Ok(form) => form,
        Err(e) => return Ok(error_response(400, format!("Invalid JSON: {}", e), &[])),
    };

    let as_of = Local::now().date_naive();
    let calculation = match calculate(&form, as_of) {
        Ok(calculation) => calculation,
        Err(response) => return Ok(response),
    };

    log::info!(
        "calculated age {} -> {}: pension {:.0}, {} options in {}ms",
        calculation.current_age,
        form.target_retirement_age,
        calculation.estimate.monthly_pension,
        calculation.options.len(),
        calculation.execution_time_ms
    );

    Ok(response(200, Some(serde_json::to_string(&calculation)?)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_calculate_default_form() {
        let calculation = calculate(&CalculatorForm::default(), as_of()).unwrap();
        assert_eq!(calculation.current_age, 45);
        assert_eq!(calculation.estimate.projection.trajectory.len(), 21);
        assert_eq!(calculation.options.len(), 11);
    }

    #[test]
    fn test_invalid_form_is_bad_request() {
        let form = CalculatorForm {
            birth_month: 13,
            ..CalculatorForm::default()
        };
        let response = calculate(&form, as_of()).unwrap_err();
        assert_eq!(response.status_code, 400);

        let body: serde_json::Value = serde_json::from_str(response.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["fields"][0]["field"], "birthMonth");
    }

    #[test]
    fn test_unbounded_sweep_range_is_bad_request() {
        let form: CalculatorForm =
            serde_json::from_str(r#"{"minRetirementAge":4000000000,"maxRetirementAge":4000000005}"#).unwrap();
        let response = calculate(&form, as_of()).unwrap_err();
        assert_eq!(response.status_code, 400);

        let body: serde_json::Value = serde_json::from_str(response.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["fields"][0]["field"], "minRetirementAge");
    }

    #[test]
    fn test_error_body_without_fields() {
        let response = error_response(400, "Invalid JSON: eof".to_string(), &[]);
        assert_eq!(response.body.as_deref(), Some(r#"{"error":"Invalid JSON: eof"}"#));
    }
}
