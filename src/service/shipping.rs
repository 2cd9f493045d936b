use bigdecimal::{BigDecimal, Zero};

use crate::config::{PricingOptions, ShippingSurchargeMode};

/// 配送方式是否包含指定标记 (不区分大小写的子串匹配)
///
/// 没有配送方式列的行永远不适用运费附加费。
pub fn is_surcharge_eligible(descriptor: Option<&str>, marker: &str) -> bool {
    match descriptor {
        Some(text) if !marker.is_empty() => text.to_lowercase().contains(&marker.to_lowercase()),
        _ => false,
    }
}

/// 计算运费附加费
///
/// `base` 为加附加费之前的目标金额；百分比模式下大于 1 的值按百分数处理。
pub fn surcharge_for(
    options: &PricingOptions,
    base: &BigDecimal,
    eligible: bool,
) -> BigDecimal {
    if !eligible {
        return BigDecimal::zero();
    }

    let value = &options.shipping_surcharge_value;
    match options.shipping_surcharge_mode {
        ShippingSurchargeMode::None => BigDecimal::zero(),
        ShippingSurchargeMode::Fixed => value.clone(),
        ShippingSurchargeMode::Percentage => {
            let pct = if *value > BigDecimal::from(1) {
                value / &BigDecimal::from(100)
            } else {
                value.clone()
            };
            base * &pct
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SHIPPING_MARKER;
    use std::str::FromStr;

    fn options(mode: ShippingSurchargeMode, value: &str) -> PricingOptions {
        PricingOptions {
            shipping_surcharge_mode: mode,
            shipping_surcharge_value: BigDecimal::from_str(value).unwrap(),
            ..PricingOptions::default()
        }
    }

    #[test]
    fn test_eligibility_is_case_insensitive_substring() {
        assert!(is_surcharge_eligible(
            Some("Mercado Envíos por mi cuenta"),
            DEFAULT_SHIPPING_MARKER
        ));
        assert!(is_surcharge_eligible(
            Some("envío: MERCADO ENVÍOS POR MI CUENTA (custom)"),
            DEFAULT_SHIPPING_MARKER
        ));
        assert!(!is_surcharge_eligible(Some("Mercado Envíos Full"), DEFAULT_SHIPPING_MARKER));
        assert!(!is_surcharge_eligible(Some(""), DEFAULT_SHIPPING_MARKER));
        assert!(!is_surcharge_eligible(None, DEFAULT_SHIPPING_MARKER));
    }

    #[test]
    fn test_percentage_value_above_one_is_percent() {
        let base = BigDecimal::from(10000);
        let five = options(ShippingSurchargeMode::Percentage, "5");
        let fraction = options(ShippingSurchargeMode::Percentage, "0.05");

        assert_eq!(surcharge_for(&five, &base, true), BigDecimal::from(500));
        assert_eq!(surcharge_for(&fraction, &base, true), BigDecimal::from(500));
    }

    #[test]
    fn test_fixed_and_none_modes() {
        let base = BigDecimal::from(10000);
        let fixed = options(ShippingSurchargeMode::Fixed, "1500");
        let none = options(ShippingSurchargeMode::None, "1500");

        assert_eq!(surcharge_for(&fixed, &base, true), BigDecimal::from(1500));
        assert_eq!(surcharge_for(&none, &base, true), BigDecimal::zero());
    }

    #[test]
    fn test_ineligible_rows_never_pay_surcharge() {
        let base = BigDecimal::from(10000);
        for mode in [
            ShippingSurchargeMode::None,
            ShippingSurchargeMode::Fixed,
            ShippingSurchargeMode::Percentage,
        ] {
            assert_eq!(surcharge_for(&options(mode, "5"), &base, false), BigDecimal::zero());
        }
    }
}
