//! 单元格数值解析
//!
//! 无法解析的内容一律回退为 0 (或 None)，不会中断批次。

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

/// 解析金额/数量；空白或无法解析时返回 None
///
/// 支持 `$1,095.00`、`1.095,50`、`$2.500,75` 等写法：
/// 同时出现 `.` 与 `,` 时，靠后的那个是小数点。
/// 去掉 `$` 和 `%` 之后必须只剩一个数字串，科学计数法不接受。
pub fn parse_decimal(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | '%')).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if !is_numeric_token(cleaned) {
        tracing::debug!("Unparseable number '{}'", raw);
        return None;
    }

    let normalized = normalize_separators(cleaned);
    match BigDecimal::from_str(&normalized) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("Unparseable number '{}'", raw);
            None
        }
    }
}

/// 可选的前导负号，其后只有数字和分隔符
fn is_numeric_token(token: &str) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
}

fn normalize_separators(cleaned: &str) -> String {
    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(comma)) => {
            let decimals = cleaned.len() - comma - 1;
            if cleaned.matches(',').count() == 1 && decimals != 3 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned.to_string(),
    }
}

/// 解析金额；无法解析时为 0
pub fn parse_money(raw: &str) -> BigDecimal {
    parse_decimal(raw).unwrap_or_else(BigDecimal::zero)
}

/// 解析百分比为小数：`14.50%` → 0.145，`4` → 0.04，`0.04` → 0.04
pub fn parse_pct(raw: &str) -> BigDecimal {
    let Some(value) = parse_decimal(raw) else {
        return BigDecimal::zero();
    };
    if raw.contains('%') || value > BigDecimal::from(1) {
        value / &BigDecimal::from(100)
    } else {
        value
    }
}

/// 解析佣金表达式 `14.50% + $1095.00` → (0.145, 1095.00)
///
/// 带 `%` 的部分是百分比，其余部分按固定金额处理；任一部分都可以缺失。
pub fn parse_fee_combo(raw: &str) -> (BigDecimal, BigDecimal) {
    let mut pct = BigDecimal::zero();
    let mut fixed = BigDecimal::zero();

    for part in raw.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        if part.contains('%') {
            pct = parse_pct(part);
        } else {
            fixed = parse_money(part);
        }
    }

    (pct, fixed)
}

/// 从税种描述中提取税率：`IVA Ventas 21%` → 0.21
///
/// 优先取紧挨 `%` 之前的数字；没有 `%` 时取最后一个数字。
pub fn extract_tax_percentage(raw: &str) -> BigDecimal {
    let is_numeric = |c: char| c.is_ascii_digit() || c == '.' || c == ',';

    let token = match raw.find('%') {
        Some(pos) => {
            let head = raw[..pos].trim_end();
            let start = head
                .char_indices()
                .rev()
                .take_while(|(_, c)| is_numeric(*c))
                .last()
                .map(|(idx, _)| idx)
                .unwrap_or(head.len());
            head[start..].to_string()
        }
        None => raw
            .split(|c: char| !is_numeric(c))
            .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
            .last()
            .unwrap_or("")
            .to_string(),
    };

    match parse_decimal(&token) {
        Some(value) if raw.contains('%') || value > BigDecimal::from(1) => {
            value / &BigDecimal::from(100)
        }
        Some(value) => value,
        None => BigDecimal::zero(),
    }
}
