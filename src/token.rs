#![allow(unused_imports)]
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Vec};

use crate::events;
use crate::storage;
use crate::types::{SaleError, TokenGrant, TokenMetadata};
use crate::validation;
use crate::vesting;

//
// SAFRA TOKEN - LEDGER MÍNIMO (capability interface)
//
// O motor de venda consome este ledger através de uma interface estreita:
// mint, burn de migração, balance, transferência de posse, trava/destrava.
// Não há transfer/approve genérico aqui (fora de escopo); a trava existe
// porque o finalize precisa destravar o token e entregar a posse ao wallet.
//

#[contract]
pub struct SafraToken;

#[contractimpl]
impl SafraToken {
    //
    // INICIALIZAÇÃO
    //

    /// Inicializa o token. Chamada uma única vez; o token nasce travado
    /// para transferência e o migration master começa igual ao owner.
    pub fn initialize(
        env: Env,
        owner: Address,
        name: String,
        symbol: String,
        decimals: u32,
    ) -> Result<(), SaleError> {
        // === CHECKS ===
        if storage::has_owner(&env) {
            return Err(SaleError::AlreadyInitialized);
        }

        // === EFFECTS ===
        storage::set_owner(&env, &owner);
        storage::set_migration_master(&env, &owner);
        storage::set_locked(&env, true);
        storage::set_total_supply(&env, 0);

        let metadata = TokenMetadata {
            name,
            symbol,
            decimals,
        };
        storage::set_metadata(&env, &metadata);

        Ok(())
    }

    //
    // LEITURA
    //

    pub fn name(env: Env) -> String {
        storage::bump_critical_storage(&env);
        storage::get_metadata(&env).name
    }

    pub fn symbol(env: Env) -> String {
        storage::bump_critical_storage(&env);
        storage::get_metadata(&env).symbol
    }

    pub fn decimals(env: Env) -> u32 {
        storage::bump_critical_storage(&env);
        storage::get_metadata(&env).decimals
    }

    pub fn balance(env: Env, holder: Address) -> i128 {
        storage::get_balance(&env, &holder)
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::bump_critical_storage(&env);
        storage::get_total_supply(&env)
    }

    /// Fração transferível do saldo no instante atual: saldo menos a soma
    /// não vestida de todos os grants. Saldo fora de grants é sempre
    /// integralmente transferível.
    pub fn transferable_balance(env: Env, holder: Address) -> i128 {
        let now = env.ledger().timestamp();
        let balance = storage::get_balance(&env, &holder);
        let non_vested = vesting::non_vested_total(&env, &holder, now);
        balance.saturating_sub(non_vested).max(0)
    }

    pub fn get_owner(env: Env) -> Address {
        storage::bump_critical_storage(&env);
        storage::get_owner(&env)
    }

    pub fn is_locked(env: Env) -> bool {
        storage::bump_critical_storage(&env);
        storage::is_locked(&env)
    }

    pub fn grant_count(env: Env, beneficiary: Address) -> u32 {
        storage::get_grant_count(&env, &beneficiary)
    }

    pub fn get_grants(env: Env, beneficiary: Address) -> Vec<TokenGrant> {
        storage::get_all_grants(&env, &beneficiary)
    }

    //
    // MINT (apenas owner — durante a venda, o contrato de venda)
    //

    pub fn mint(env: Env, to: Address, amount: i128) -> Result<(), SaleError> {
        // === CHECKS ===
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_positive_amount(amount)?;

        // === EFFECTS ===
        let balance = storage::get_balance(&env, &to);
        let new_balance = balance.checked_add(amount).ok_or(SaleError::MathOverflow)?;

        let supply = storage::get_total_supply(&env);
        let new_supply = supply.checked_add(amount).ok_or(SaleError::MathOverflow)?;

        storage::set_balance(&env, &to, new_balance);
        storage::set_total_supply(&env, new_supply);

        // === INTERACTIONS ===
        events::emit_mint(&env, &to, amount);

        Ok(())
    }

    /// Mint acompanhado de um grant de vesting: o saldo entra de imediato
    /// mas a fração não vestida fica intransferível até vestir.
    /// Falha se `cliff < start`, `vesting_end < cliff`, ou se o
    /// beneficiário já detém 20 grants.
    pub fn mint_granted(
        env: Env,
        to: Address,
        amount: i128,
        start: u64,
        cliff: u64,
        vesting_end: u64,
        revokable: bool,
        burns_on_revoke: bool,
    ) -> Result<u32, SaleError> {
        // === CHECKS ===
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_valid_grant_params(amount, start, cliff, vesting_end)?;

        // === EFFECTS ===
        let grant_id = vesting::create_grant(
            &env,
            &to,
            amount,
            start,
            cliff,
            vesting_end,
            revokable,
            burns_on_revoke,
        )?;

        let balance = storage::get_balance(&env, &to);
        let new_balance = balance.checked_add(amount).ok_or(SaleError::MathOverflow)?;

        let supply = storage::get_total_supply(&env);
        let new_supply = supply.checked_add(amount).ok_or(SaleError::MathOverflow)?;

        storage::set_balance(&env, &to, new_balance);
        storage::set_total_supply(&env, new_supply);

        // === INTERACTIONS ===
        events::emit_grant_created(&env, &to, grant_id, amount);
        events::emit_mint(&env, &to, amount);

        Ok(grant_id)
    }

    //
    // POSSE E TRAVA (apenas owner)
    //

    /// Transfere a posse do token (o finalize entrega ao wallet da fundação)
    pub fn set_owner(env: Env, new_owner: Address) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        storage::set_owner(&env, &new_owner);
        events::emit_owner_changed(&env, &new_owner);

        Ok(())
    }

    /// Trava transferências. Transição no-op (travar já travado) falha.
    pub fn lock(env: Env) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        if storage::is_locked(&env) {
            return Err(SaleError::TokenLocked);
        }

        storage::set_locked(&env, true);
        Ok(())
    }

    /// Destrava transferências (chamado pelo finalize)
    pub fn unlock(env: Env) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        if !storage::is_locked(&env) {
            return Err(SaleError::TokenNotLocked);
        }

        storage::set_locked(&env, false);
        events::emit_unlocked(&env);
        Ok(())
    }

    //
    // MIGRAÇÃO (papéis separados: master configura, agente executa)
    //

    pub fn get_migration_master(env: Env) -> Address {
        storage::bump_critical_storage(&env);
        storage::get_migration_master(&env)
    }

    pub fn get_migration_agent(env: Env) -> Option<Address> {
        storage::bump_critical_storage(&env);
        storage::get_migration_agent(&env)
    }

    /// Troca o migration master (papel distinto do owner da venda)
    pub fn set_migration_master(env: Env, new_master: Address) -> Result<(), SaleError> {
        let master = storage::get_migration_master(&env);
        master.require_auth();
        storage::bump_critical_storage(&env);

        storage::set_migration_master(&env, &new_master);
        events::emit_migration_master_set(&env, &new_master);

        Ok(())
    }

    /// Aponta o agente de migração autorizado a queimar/mintar
    pub fn set_migration_agent(env: Env, agent: Address) -> Result<(), SaleError> {
        let master = storage::get_migration_master(&env);
        master.require_auth();
        storage::bump_critical_storage(&env);

        storage::set_migration_agent(&env, &agent);
        events::emit_migration_agent_set(&env, &agent);

        Ok(())
    }

    /// Queima `amount` do holder durante a migração (apenas o agente).
    /// O valor não pode exceder a fração transferível do saldo.
    pub fn migrate_burn(env: Env, holder: Address, amount: i128) -> Result<(), SaleError> {
        // === CHECKS ===
        let agent = storage::get_migration_agent(&env).ok_or(SaleError::MigrationAgentNotSet)?;
        agent.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_positive_amount(amount)?;
        validation::require_sufficient_balance(&env, &holder, amount)?;

        let now = env.ledger().timestamp();
        let balance = storage::get_balance(&env, &holder);
        let non_vested = vesting::non_vested_total(&env, &holder, now);
        let transferable = balance.saturating_sub(non_vested).max(0);
        if amount > transferable {
            return Err(SaleError::TransferableExceeded);
        }

        // === EFFECTS ===
        let new_balance = balance.checked_sub(amount).ok_or(SaleError::InsufficientBalance)?;
        let supply = storage::get_total_supply(&env);
        let new_supply = supply.checked_sub(amount).ok_or(SaleError::MathOverflow)?;

        storage::set_balance(&env, &holder, new_balance);
        storage::set_total_supply(&env, new_supply);

        // === INTERACTIONS ===
        events::emit_burn(&env, &holder, amount);

        Ok(())
    }

    /// Minta `amount` para o holder no token de destino (apenas o agente)
    pub fn migrate_mint(env: Env, holder: Address, amount: i128) -> Result<(), SaleError> {
        // === CHECKS ===
        let agent = storage::get_migration_agent(&env).ok_or(SaleError::MigrationAgentNotSet)?;
        agent.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_positive_amount(amount)?;

        // === EFFECTS ===
        let balance = storage::get_balance(&env, &holder);
        let new_balance = balance.checked_add(amount).ok_or(SaleError::MathOverflow)?;
        let supply = storage::get_total_supply(&env);
        let new_supply = supply.checked_add(amount).ok_or(SaleError::MathOverflow)?;

        storage::set_balance(&env, &holder, new_balance);
        storage::set_total_supply(&env, new_supply);

        // === INTERACTIONS ===
        events::emit_mint(&env, &holder, amount);

        Ok(())
    }
}

//
// TESTES UNITÁRIOS
//
