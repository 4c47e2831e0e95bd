use soroban_sdk::{Address, Env};

use crate::storage;
use crate::types::{SaleError, TokenGrant};
use crate::validation;

// ============================================================================
// VESTING GRANT LEDGER
// ============================================================================

/// Quantidade vestida de um grant no instante `now`:
/// 0 antes do cliff, `amount` a partir do vesting_end, reta linear
/// ancorada no start entre os dois. O caso `cliff == 0 && vesting_end == 0`
/// é totalmente transferível de imediato (grant degenerado, sem vesting).
pub fn vested_amount(grant: &TokenGrant, now: u64) -> i128 {
    if grant.cliff == 0 && grant.vesting_end == 0 {
        return grant.amount;
    }

    if now < grant.cliff {
        return 0;
    }

    if now >= grant.vesting_end {
        return grant.amount;
    }

    // vested = amount * (now - start) / (vesting_end - start)
    let elapsed = now.saturating_sub(grant.start);
    let duration = grant.vesting_end.saturating_sub(grant.start);
    if duration == 0 {
        return grant.amount;
    }

    grant
        .amount
        .checked_mul(elapsed as i128)
        .unwrap_or(0)
        .checked_div(duration as i128)
        .unwrap_or(0)
}

/// Fração ainda não vestida de um grant
pub fn non_vested_amount(grant: &TokenGrant, now: u64) -> i128 {
    grant.amount.saturating_sub(vested_amount(grant, now)).max(0)
}

/// Soma não vestida de todos os grants de um beneficiário. Cada grant é
/// independente e aditivo; qualquer saldo fora de grants é sempre
/// totalmente transferível.
pub fn non_vested_total(env: &Env, beneficiary: &Address, now: u64) -> i128 {
    let count = storage::get_grant_count(env, beneficiary);
    let mut total: i128 = 0;

    for id in 0..count {
        if let Some(grant) = storage::get_grant(env, beneficiary, id) {
            total = total.saturating_add(non_vested_amount(&grant, now));
        }
    }

    total
}

/// Cria um novo grant para o beneficiário.
/// Falha se `cliff < start`, `vesting_end < cliff`, ou se o beneficiário já
/// detém o número máximo de grants concorrentes (20).
pub fn create_grant(
    env: &Env,
    beneficiary: &Address,
    amount: i128,
    start: u64,
    cliff: u64,
    vesting_end: u64,
    revokable: bool,
    burns_on_revoke: bool,
) -> Result<u32, SaleError> {
    validation::require_valid_grant_params(amount, start, cliff, vesting_end)?;

    // Valida o teto da arena e incrementa
    let new_count = storage::increment_grant_count(env, beneficiary)?;

    let grant = TokenGrant {
        amount,
        start,
        cliff,
        vesting_end,
        revokable,
        burns_on_revoke,
    };

    storage::set_grant(env, beneficiary, new_count - 1, &grant);

    Ok(new_count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(amount: i128, start: u64, cliff: u64, end: u64) -> TokenGrant {
        TokenGrant {
            amount,
            start,
            cliff,
            vesting_end: end,
            revokable: false,
            burns_on_revoke: false,
        }
    }

    #[test]
    fn test_zero_before_cliff() {
        let g = grant(1_000, 100, 200, 1_100);
        assert_eq!(vested_amount(&g, 0), 0);
        assert_eq!(vested_amount(&g, 199), 0);
    }

    #[test]
    fn test_full_at_vesting_end() {
        let g = grant(1_000, 100, 200, 1_100);
        assert_eq!(vested_amount(&g, 1_100), 1_000);
        assert_eq!(vested_amount(&g, u64::MAX), 1_000);
    }

    #[test]
    fn test_linear_between() {
        // start=0, end=1000: em t=500 metade vestida
        let g = grant(1_000, 0, 100, 1_000);
        assert_eq!(vested_amount(&g, 500), 500);
        assert_eq!(non_vested_amount(&g, 500), 500);
        // no cliff a reta já acumulou a fração desde o start
        assert_eq!(vested_amount(&g, 100), 100);
    }

    #[test]
    fn test_degenerate_grant_fully_transferable() {
        let g = grant(777, 50, 0, 0);
        assert_eq!(vested_amount(&g, 0), 777);
        assert_eq!(non_vested_amount(&g, 0), 0);
    }

    #[test]
    fn test_monotonic_in_time() {
        let g = grant(999, 10, 60, 700);
        let mut last = 0;
        for t in 0..800u64 {
            let v = vested_amount(&g, t);
            assert!(v >= last, "vesting regrediu em t={}", t);
            assert!(v <= g.amount);
            last = v;
        }
        assert_eq!(last, 999);
    }
}
