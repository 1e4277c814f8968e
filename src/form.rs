//! Strategy configuration form guard
//!
//! Validates a strategy form before submission, collecting every failed
//! rule instead of stopping at the first. Also fills suggested values
//! derived from the investment amount (never over user input) and
//! normalizes numeric fields on blur.
//!
//! Fields hold raw text: a rule is only evaluated when its operands
//! parse, so malformed numbers trigger no client-side violation and are
//! left for the service to reject.

use crate::error::{DashboardError, Result};

/// Raw form contents, one string per input
#[derive(Debug, Clone, Default)]
pub struct StrategyForm {
    pub strategy_name: String,
    pub coin_type: String,
    pub investment_amount: String,
    pub max_position: String,
    pub take_profit: String,
    pub auto_trade_percent: String,
}

/// Numeric inputs subject to blur normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    InvestmentAmount,
    MaxPosition,
    TakeProfit,
    AutoTradePercent,
}

/// Outcome of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Every rule passed; the submission proceeds
    Accepted,
    /// At least one rule failed; nothing is sent
    Blocked(Vec<String>),
}

impl StrategyForm {
    /// All failed rules, in rule order. Empty means the form may submit.
    pub fn violations(&self) -> Vec<String> {
        let investment = parsed(&self.investment_amount);
        let max_position = parsed(&self.max_position);
        let take_profit = parsed(&self.take_profit);
        let auto_trade_percent = parsed(&self.auto_trade_percent);

        let mut violations = Vec::new();

        if let (Some(investment), Some(max_position)) = (investment, max_position) {
            if max_position > investment {
                violations.push("Max position cannot exceed the investment amount".to_string());
            }
        }

        if let (Some(investment), Some(take_profit)) = (investment, take_profit) {
            if take_profit <= investment {
                violations
                    .push("Take profit must be greater than the investment amount".to_string());
            }
        }

        if let Some(percent) = auto_trade_percent {
            if percent <= 0.0 || percent > 100.0 {
                violations.push("Auto-trade percent must be between 0 and 100".to_string());
            }
        }

        violations
    }

    /// Gate a submit attempt on the validation rules
    pub fn submit(&self) -> Submission {
        let violations = self.violations();
        if violations.is_empty() {
            Submission::Accepted
        } else {
            Submission::Blocked(violations)
        }
    }

    /// Same gate as `submit`, surfaced as a Result
    pub fn validate(&self) -> Result<()> {
        match self.submit() {
            Submission::Accepted => Ok(()),
            Submission::Blocked(violations) => Err(DashboardError::Validation(violations)),
        }
    }

    /// Fill suggested values after the investment amount changed:
    /// max position 20% of investment, take profit 150%, auto-trade 5%.
    /// Only fields the user left empty are touched.
    pub fn apply_investment_defaults(&mut self) {
        let Some(investment) = parsed(&self.investment_amount) else {
            return;
        };

        if self.max_position.is_empty() {
            self.max_position = format!("{}", (investment * 0.2).round());
        }
        if self.take_profit.is_empty() {
            self.take_profit = format!("{}", (investment * 1.5).round());
        }
        if self.auto_trade_percent.is_empty() {
            self.auto_trade_percent = "5.0".to_string();
        }
    }

    /// Round a numeric field after the user leaves it: the percent keeps
    /// one decimal, amounts become whole numbers. Input that does not
    /// parse stays exactly as typed.
    pub fn normalize_field(&mut self, field: NumericField) {
        let target = match field {
            NumericField::InvestmentAmount => &mut self.investment_amount,
            NumericField::MaxPosition => &mut self.max_position,
            NumericField::TakeProfit => &mut self.take_profit,
            NumericField::AutoTradePercent => &mut self.auto_trade_percent,
        };

        let Some(value) = parsed(target) else {
            return;
        };

        *target = if field == NumericField::AutoTradePercent {
            format!("{value:.1}")
        } else {
            format!("{}", value.round())
        };
    }
}

fn parsed(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> StrategyForm {
        StrategyForm {
            strategy_name: "btc-daily".to_string(),
            coin_type: "btctwd".to_string(),
            investment_amount: "2000".to_string(),
            max_position: "400".to_string(),
            take_profit: "3000".to_string(),
            auto_trade_percent: "5.0".to_string(),
        }
    }

    #[test]
    fn test_valid_form_submits() {
        let form = filled_form();
        assert_eq!(form.submit(), Submission::Accepted);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_max_position_above_investment_blocks() {
        let mut form = filled_form();
        form.max_position = "2500".to_string();

        assert_eq!(
            form.submit(),
            Submission::Blocked(vec![
                "Max position cannot exceed the investment amount".to_string()
            ])
        );
    }

    #[test]
    fn test_take_profit_equal_to_investment_blocks() {
        let mut form = filled_form();
        form.investment_amount = "1000".to_string();
        form.max_position = "200".to_string();
        form.take_profit = "1000".to_string();

        let violations = form.violations();
        assert_eq!(
            violations,
            vec!["Take profit must be greater than the investment amount".to_string()]
        );
    }

    #[test]
    fn test_percent_bounds() {
        let mut form = filled_form();

        form.auto_trade_percent = "0".to_string();
        assert_eq!(form.violations().len(), 1);

        form.auto_trade_percent = "0.1".to_string();
        assert!(form.violations().is_empty());

        form.auto_trade_percent = "100".to_string();
        assert!(form.violations().is_empty());

        form.auto_trade_percent = "100.1".to_string();
        assert_eq!(
            form.violations(),
            vec!["Auto-trade percent must be between 0 and 100".to_string()]
        );
    }

    #[test]
    fn test_all_violations_collected_in_rule_order() {
        let form = StrategyForm {
            strategy_name: "bad".to_string(),
            coin_type: "btctwd".to_string(),
            investment_amount: "1000".to_string(),
            max_position: "1200".to_string(),
            take_profit: "500".to_string(),
            auto_trade_percent: "0".to_string(),
        };

        let violations = form.violations();
        assert_eq!(violations.len(), 3);
        assert!(violations[0].contains("Max position"));
        assert!(violations[1].contains("Take profit"));
        assert!(violations[2].contains("Auto-trade percent"));

        // The Result form carries all of them joined
        let err = form.validate().unwrap_err();
        assert!(err.to_string().contains("Max position"));
        assert!(err.to_string().contains("Auto-trade percent"));
    }

    #[test]
    fn test_unparseable_operands_skip_their_rules() {
        let mut form = filled_form();
        form.investment_amount = "lots".to_string();
        form.max_position = "999999".to_string();

        // Without a parsed investment neither amount rule can fire;
        // the service is the authority on malformed numbers
        assert_eq!(form.submit(), Submission::Accepted);
    }

    #[test]
    fn test_defaults_fill_only_empty_fields() {
        let mut form = StrategyForm {
            investment_amount: "2000".to_string(),
            ..StrategyForm::default()
        };
        form.apply_investment_defaults();

        assert_eq!(form.max_position, "400");
        assert_eq!(form.take_profit, "3000");
        assert_eq!(form.auto_trade_percent, "5.0");

        // A pre-filled field is never overwritten
        let mut form = StrategyForm {
            investment_amount: "2000".to_string(),
            max_position: "100".to_string(),
            ..StrategyForm::default()
        };
        form.apply_investment_defaults();

        assert_eq!(form.max_position, "100");
        assert_eq!(form.take_profit, "3000");
    }

    #[test]
    fn test_defaults_require_numeric_investment() {
        let mut form = StrategyForm {
            investment_amount: "soon".to_string(),
            ..StrategyForm::default()
        };
        form.apply_investment_defaults();

        assert!(form.max_position.is_empty());
        assert!(form.take_profit.is_empty());
        assert!(form.auto_trade_percent.is_empty());
    }

    #[test]
    fn test_blur_normalization() {
        let mut form = filled_form();

        form.auto_trade_percent = "12.34".to_string();
        form.normalize_field(NumericField::AutoTradePercent);
        assert_eq!(form.auto_trade_percent, "12.3");

        form.investment_amount = "1500.6".to_string();
        form.normalize_field(NumericField::InvestmentAmount);
        assert_eq!(form.investment_amount, "1501");

        // Non-numeric and empty inputs stay exactly as typed
        form.max_position = "abc".to_string();
        form.normalize_field(NumericField::MaxPosition);
        assert_eq!(form.max_position, "abc");

        form.take_profit = String::new();
        form.normalize_field(NumericField::TakeProfit);
        assert_eq!(form.take_profit, "");
    }
}
