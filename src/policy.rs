use crate::storage::{BONUS_BPS, BONUS_WINDOW_SECS, BPS_DENOMINATOR};
use crate::types::SaleError;

// ============================================================================
// RATE & CAP ENFORCER
// ============================================================================
// Funções puras de política, avaliadas antes de qualquer mutação de estado.
// Nenhuma delas toca storage: recebem os valores e devolvem o veredito.

/// `start_time <= now <= end_time`
pub fn within_sale_window(start_time: u64, end_time: u64, now: u64) -> bool {
    now >= start_time && now <= end_time
}

/// Teto de gas price, aplicado apenas dentro da janela de venda.
/// `max_gas_price == 0` desativa a checagem.
pub fn gas_price_ok(max_gas_price: i128, gas_price: i128, in_window: bool) -> bool {
    if !in_window || max_gas_price == 0 {
        return true;
    }
    gas_price <= max_gas_price
}

/// Throttle por investidor: `now - last_call >= min_call_interval`.
/// `min_call_interval == 0` desativa.
pub fn interval_ok(min_call_interval: u64, last_call: u64, now: u64) -> bool {
    if min_call_interval == 0 {
        return true;
    }
    now.saturating_sub(last_call) >= min_call_interval
}

/// `min_invest <= amount` e `new_cumulative <= max_cumulative_invest`
pub fn invest_limit_ok(
    min_invest: i128,
    max_cumulative_invest: i128,
    amount: i128,
    new_cumulative: i128,
) -> Result<(), SaleError> {
    if amount < min_invest {
        return Err(SaleError::BelowMinInvestment);
    }
    if new_cumulative > max_cumulative_invest {
        return Err(SaleError::AboveMaxInvestment);
    }
    Ok(())
}

/// Headroom restante do cap. `committed` = wei_raised + escrow_total, de
/// modo que o invariante `wei_raised <= cap` sobreviva a qualquer ordem de
/// liquidação do KYC.
pub fn cap_headroom(cap: i128, committed: i128) -> i128 {
    cap.saturating_sub(committed).max(0)
}

/// Clipping de cap: se a contribuição excede o headroom, aceita apenas
/// `cap - committed` (aceitação parcial). Se o headroom é zero a chamada
/// falha de vez. Este é o único ponto onde um valor monetário é alterado
/// silenciosamente: o valor aceito é ecoado de volta ao chamador.
pub fn clip_to_cap(cap: i128, committed: i128, amount: i128) -> Result<i128, SaleError> {
    let headroom = cap_headroom(cap, committed);
    if headroom == 0 {
        return Err(SaleError::CapReached);
    }
    Ok(amount.min(headroom))
}

/// Contribuições validadas com `now <= start_time + 7 dias` recebem bônus.
pub fn bonus_window_ok(start_time: u64, now: u64) -> bool {
    now <= start_time.saturating_add(BONUS_WINDOW_SECS)
}

/// Aplica o bônus fixo de 5% (uma única vez por release do vault,
/// nunca composto entre liquidações parciais).
pub fn apply_bonus(tokens: i128) -> Result<i128, SaleError> {
    let bonus = tokens
        .checked_mul(BONUS_BPS)
        .ok_or(SaleError::MathOverflow)?
        / BPS_DENOMINATOR;
    tokens.checked_add(bonus).ok_or(SaleError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_window_is_inclusive() {
        assert!(!within_sale_window(100, 200, 99));
        assert!(within_sale_window(100, 200, 100));
        assert!(within_sale_window(100, 200, 200));
        assert!(!within_sale_window(100, 200, 201));
    }

    #[test]
    fn test_gas_price_only_inside_window() {
        assert!(gas_price_ok(50, 100, false)); // fora da janela não se aplica
        assert!(!gas_price_ok(50, 100, true));
        assert!(gas_price_ok(50, 50, true));
        assert!(gas_price_ok(0, 999, true)); // 0 desativa
    }

    #[test]
    fn test_interval_throttle() {
        assert!(interval_ok(0, 100, 100)); // desativado
        assert!(!interval_ok(60, 100, 100));
        assert!(!interval_ok(60, 100, 159));
        assert!(interval_ok(60, 100, 160));
        assert!(interval_ok(60, 0, 10)); // primeira chamada: last_call = 0
    }

    #[test]
    fn test_invest_limits() {
        assert_eq!(
            invest_limit_ok(6_000, 48_000, 5_999, 5_999),
            Err(SaleError::BelowMinInvestment)
        );
        assert_eq!(
            invest_limit_ok(6_000, 48_000, 6_000, 48_001),
            Err(SaleError::AboveMaxInvestment)
        );
        assert_eq!(invest_limit_ok(6_000, 48_000, 6_000, 48_000), Ok(()));
    }

    #[test]
    fn test_cap_clipping() {
        // headroom cheio: passa inteiro
        assert_eq!(clip_to_cap(1_000, 0, 400), Ok(400));
        // clipping parcial exato em cap - committed
        assert_eq!(clip_to_cap(1_000, 900, 400), Ok(100));
        // cap já atingido: falha de vez
        assert_eq!(clip_to_cap(1_000, 1_000, 1), Err(SaleError::CapReached));
    }

    #[test]
    fn test_bonus_window_and_amount() {
        let start = 1_000;
        let seven_days = 7 * 24 * 60 * 60;
        assert!(bonus_window_ok(start, start + seven_days));
        assert!(!bonus_window_ok(start, start + seven_days + 1));

        // 5% fixo, sem composição
        assert_eq!(apply_bonus(6_000).unwrap(), 6_300);
        assert_eq!(apply_bonus(0).unwrap(), 0);
    }
}
