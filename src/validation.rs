use soroban_sdk::Env;

use crate::storage;
use crate::types::{SaleConfig, SaleError};

// ============================================================================
// VALIDAÇÕES (pré-condições, padrão CEI: tudo checado antes de mutar)
// ============================================================================

/// Valida se a venda não está pausada
pub fn require_not_paused(env: &Env) -> Result<(), SaleError> {
    if storage::is_paused(env) {
        return Err(SaleError::SalePaused);
    }
    Ok(())
}

/// Valida se a venda está pausada (para unpause; transição no-op falha)
pub fn require_paused(env: &Env) -> Result<(), SaleError> {
    if !storage::is_paused(env) {
        return Err(SaleError::SaleNotPaused);
    }
    Ok(())
}

/// Valida se a venda ainda não foi finalizada
pub fn require_not_finalized(env: &Env) -> Result<(), SaleError> {
    if storage::is_finalized(env) {
        return Err(SaleError::AlreadyFinalized);
    }
    Ok(())
}

/// Valida se o amount é válido (> 0)
pub fn require_positive_amount(amount: i128) -> Result<(), SaleError> {
    if amount <= 0 {
        return Err(SaleError::InvalidAmount);
    }
    Ok(())
}

/// Valida se o balance é suficiente
pub fn require_sufficient_balance(
    env: &Env,
    addr: &soroban_sdk::Address,
    required: i128,
) -> Result<(), SaleError> {
    let balance = storage::get_balance(env, addr);
    if balance < required {
        return Err(SaleError::InsufficientBalance);
    }
    Ok(())
}

/// Valida os invariantes da configuração da venda:
/// `0 < min_invest <= max_cumulative_invest`, `cap > 0`, `rate > 0`,
/// `start_time < end_time`.
pub fn require_valid_config(config: &SaleConfig) -> Result<(), SaleError> {
    if config.min_invest <= 0 || config.min_invest > config.max_cumulative_invest {
        return Err(SaleError::InvalidConfig);
    }
    if config.cap <= 0 || config.rate <= 0 {
        return Err(SaleError::InvalidConfig);
    }
    if config.start_time >= config.end_time {
        return Err(SaleError::InvalidConfig);
    }
    if config.max_gas_price < 0 || config.distribution_cap < 0 {
        return Err(SaleError::InvalidConfig);
    }
    Ok(())
}

/// Valida parâmetros de um grant: `cliff >= start`, `vesting_end >= cliff`.
/// `cliff == 0 && vesting_end == 0` é o caso degenerado sem vesting.
pub fn require_valid_grant_params(
    amount: i128,
    start: u64,
    cliff: u64,
    vesting_end: u64,
) -> Result<(), SaleError> {
    if amount <= 0 {
        return Err(SaleError::InvalidAmount);
    }
    if cliff == 0 && vesting_end == 0 {
        return Ok(());
    }
    if cliff < start || vesting_end < cliff {
        return Err(SaleError::InvalidGrantParams);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Address, Env};

    fn base_config(env: &Env) -> SaleConfig {
        SaleConfig {
            start_time: 100,
            end_time: 1_000,
            rate: 6_000,
            cap: 240_000,
            min_invest: 6_000,
            max_cumulative_invest: 48_000,
            max_gas_price: 0,
            min_call_interval: 0,
            wallet: Address::generate(env),
            bonus_fixed_at_first: false,
            sweep_on_finalize: false,
            accredited_only: false,
            distribution_cap: 0,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let env = Env::default();
        assert_eq!(require_valid_config(&base_config(&env)), Ok(()));
    }

    #[test]
    fn test_config_rejects_min_above_max() {
        let env = Env::default();
        let mut cfg = base_config(&env);
        cfg.min_invest = 50_000;
        assert_eq!(require_valid_config(&cfg), Err(SaleError::InvalidConfig));
    }

    #[test]
    fn test_config_rejects_inverted_window() {
        let env = Env::default();
        let mut cfg = base_config(&env);
        cfg.start_time = cfg.end_time;
        assert_eq!(require_valid_config(&cfg), Err(SaleError::InvalidConfig));
    }

    #[test]
    fn test_config_rejects_zero_cap_and_rate() {
        let env = Env::default();
        let mut cfg = base_config(&env);
        cfg.cap = 0;
        assert_eq!(require_valid_config(&cfg), Err(SaleError::InvalidConfig));

        let mut cfg = base_config(&env);
        cfg.rate = 0;
        assert_eq!(require_valid_config(&cfg), Err(SaleError::InvalidConfig));
    }

    #[test]
    fn test_grant_params() {
        // cliff antes do start
        assert_eq!(
            require_valid_grant_params(100, 50, 10, 200),
            Err(SaleError::InvalidGrantParams)
        );
        // vesting_end antes do cliff
        assert_eq!(
            require_valid_grant_params(100, 10, 50, 20),
            Err(SaleError::InvalidGrantParams)
        );
        // caso degenerado 0/0: sem vesting
        assert_eq!(require_valid_grant_params(100, 10, 0, 0), Ok(()));
        // válido
        assert_eq!(require_valid_grant_params(100, 10, 50, 200), Ok(()));
    }

    #[test]
    fn test_positive_amount() {
        assert_eq!(require_positive_amount(0), Err(SaleError::InvalidAmount));
        assert_eq!(require_positive_amount(-5), Err(SaleError::InvalidAmount));
        assert_eq!(require_positive_amount(1), Ok(()));
    }
}
