use soroban_sdk::{Address, Env, Vec};

use crate::storage;
use crate::types::SaleError;

// ============================================================================
// ESCROW VAULT
// ============================================================================
// Guarda fundos contribuídos por investidor antes da validação de KYC.
// Escritor único: apenas buy_tokens deposita e apenas a resolução de KYC
// (ou o sweep do finalize) libera — a soma dos saldos do vault é sempre
// igual ao escrow total não liquidado.

/// Deposita no vault do investidor. Falha se `amount <= 0`.
pub fn deposit(env: &Env, investor: &Address, amount: i128) -> Result<(), SaleError> {
    if amount <= 0 {
        return Err(SaleError::InvalidAmount);
    }

    let balance = storage::get_vault_balance(env, investor);
    let new_balance = balance.checked_add(amount).ok_or(SaleError::MathOverflow)?;
    storage::set_vault_balance(env, investor, new_balance);

    let escrow = storage::get_escrow_total(env);
    let new_escrow = escrow.checked_add(amount).ok_or(SaleError::MathOverflow)?;
    storage::set_escrow_total(env, new_escrow);

    let mut pending = storage::get_pending_investors(env);
    if !pending.contains(investor) {
        pending.push_back(investor.clone());
        storage::set_pending_investors(env, &pending);
    }

    Ok(())
}

/// Zera e devolve o saldo integral do vault do investidor. Usado tanto na
/// aceitação de KYC (fundos viram tokens) quanto na rejeição (reembolso).
/// Liberar um vault vazio devolve 0 e não muda nada (idempotência).
pub fn release(env: &Env, investor: &Address) -> i128 {
    let balance = storage::get_vault_balance(env, investor);
    if balance == 0 {
        return 0;
    }

    storage::set_vault_balance(env, investor, 0);

    let escrow = storage::get_escrow_total(env);
    storage::set_escrow_total(env, escrow.saturating_sub(balance));

    let pending = storage::get_pending_investors(env);
    if let Some(index) = pending.first_index_of(investor) {
        let mut pending = pending;
        pending.remove(index);
        storage::set_pending_investors(env, &pending);
    }

    balance
}

pub fn balance_of(env: &Env, investor: &Address) -> i128 {
    storage::get_vault_balance(env, investor)
}

/// Investidores com saldo pendente em escrow (para o sweep do finalize)
pub fn pending_investors(env: &Env) -> Vec<Address> {
    storage::get_pending_investors(env)
}
