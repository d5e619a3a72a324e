//! `calculate_benefit_cost`: annual cost estimate for a plan.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, ToolError};

/// Arguments of `calculate_benefit_cost`.
///
/// Amounts are accepted as JSON numbers or numeric strings.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CostArgs {
    /// Plan type, e.g. PPO or HMO.
    pub plan_type: String,
    /// Monthly premium in dollars.
    #[schemars(with = "f64")]
    pub monthly_premium: Value,
    /// Annual deductible in dollars.
    #[schemars(with = "f64")]
    pub deductible: Value,
}

fn as_amount(field: &str, value: &Value) -> Result<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount
        .filter(|a| a.is_finite())
        .ok_or_else(|| ToolError::InvalidCostInput(format!("{field} is not a number: {value}")))
}

/// `12 * monthly_premium + deductible`, as a sentence with two decimals.
///
/// # Errors
///
/// Returns [`ToolError::InvalidCostInput`] if either amount is not numeric.
pub fn calculate_benefit_cost(plan_type: &str, monthly_premium: &Value, deductible: &Value) -> Result<String> {
    let premium = as_amount("monthly_premium", monthly_premium)?;
    let deductible = as_amount("deductible", deductible)?;
    let annual = 12.0 * premium + deductible;
    Ok(format!("The estimated annual cost for a {plan_type} plan is ${annual:.2}."))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn computes_annual_cost() {
        assert_eq!(
            calculate_benefit_cost("PPO", &json!(350), &json!(1000)).unwrap(),
            "The estimated annual cost for a PPO plan is $5200.00."
        );
        assert_eq!(
            calculate_benefit_cost("HMO", &json!(200), &json!(500)).unwrap(),
            "The estimated annual cost for a HMO plan is $2900.00."
        );
    }

    #[test]
    fn accepts_numeric_strings_and_fractions() {
        assert_eq!(
            calculate_benefit_cost("HDHP", &json!("99.99"), &json!(1500.5)).unwrap(),
            "The estimated annual cost for a HDHP plan is $2700.38."
        );
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = calculate_benefit_cost("PPO", &json!("invalid"), &json!(1000)).unwrap_err();
        assert_eq!(err.user_message(), "Invalid input for benefit calculation.");
        assert!(calculate_benefit_cost("PPO", &json!(350), &json!(null)).is_err());
        assert!(calculate_benefit_cost("PPO", &json!("NaN"), &json!(1)).is_err());
    }
}
