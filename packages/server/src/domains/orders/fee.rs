use serde::{Deserialize, Serialize};

/// Service fee policy configured on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    None,
    Flat,
    Percentage,
}

/// Service fee configuration, matching the serviceFee group on events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFee {
    pub fee_type: FeeType,
    /// Flat amount in minor units, or the percentage (5 means 5%).
    #[serde(default)]
    pub fee_amount: Option<i64>,
}

/// Calculates the service fee for a ticket purchase.
///
/// Pure function, no side effects, never fails. All amounts are integer
/// minor units; percentage fees round down. Missing or negative inputs
/// normalize to zero.
pub fn calculate_service_fee(base_amount: i64, fee: Option<&ServiceFee>) -> i64 {
    let Some(fee) = fee else {
        return 0;
    };

    let base = base_amount.max(0);
    let amount = fee.fee_amount.unwrap_or(0).max(0);

    match fee.fee_type {
        FeeType::None => 0,
        FeeType::Flat => amount,
        FeeType::Percentage => base * amount / 100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentage(amount: i64) -> ServiceFee {
        ServiceFee {
            fee_type: FeeType::Percentage,
            fee_amount: Some(amount),
        }
    }

    #[test]
    fn no_fee_config_means_zero() {
        assert_eq!(calculate_service_fee(10000, None), 0);
    }

    #[test]
    fn none_type_is_zero_for_any_base() {
        let fee = ServiceFee {
            fee_type: FeeType::None,
            fee_amount: Some(500),
        };
        for base in [0, 1, 999, 10000, 1_000_000] {
            assert_eq!(calculate_service_fee(base, Some(&fee)), 0);
        }
    }

    #[test]
    fn flat_fee_is_independent_of_base() {
        let fee = ServiceFee {
            fee_type: FeeType::Flat,
            fee_amount: Some(200),
        };
        for base in [0, 100, 5000, 1_000_000] {
            assert_eq!(calculate_service_fee(base, Some(&fee)), 200);
        }
    }

    #[test]
    fn percentage_rounds_down() {
        assert_eq!(calculate_service_fee(10000, Some(&percentage(3))), 300);
        // floor(1234 * 0.03) = floor(37.02) = 37
        assert_eq!(calculate_service_fee(1234, Some(&percentage(3))), 37);
        assert_eq!(calculate_service_fee(5000, Some(&percentage(5))), 250);
        assert_eq!(calculate_service_fee(99, Some(&percentage(1))), 0);
    }

    #[test]
    fn missing_amount_treated_as_zero() {
        let flat = ServiceFee {
            fee_type: FeeType::Flat,
            fee_amount: None,
        };
        assert_eq!(calculate_service_fee(10000, Some(&flat)), 0);

        let pct = ServiceFee {
            fee_type: FeeType::Percentage,
            fee_amount: None,
        };
        assert_eq!(calculate_service_fee(10000, Some(&pct)), 0);
    }

    #[test]
    fn negative_inputs_normalize_to_zero() {
        assert_eq!(calculate_service_fee(-500, Some(&percentage(3))), 0);

        let negative_flat = ServiceFee {
            fee_type: FeeType::Flat,
            fee_amount: Some(-200),
        };
        assert_eq!(calculate_service_fee(10000, Some(&negative_flat)), 0);
    }
}
