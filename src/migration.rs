use soroban_sdk::{contract, contractimpl, Address, Env};

use crate::events;
use crate::storage;
use crate::token::SafraTokenClient;
use crate::types::SaleError;
use crate::validation;

//
// MIGRATION AGENT
//
// Protocolo em duas fases movendo o supply total conservado de um token de
// origem para um sucessor, um investidor por vez. O supply é congelado na
// criação do agente; finalize_migration só passa quando a soma de todas as
// migrações individuais bate exatamente com o snapshot — depois disso o
// agente fica permanentemente inerte.
//

#[contract]
pub struct MigrationAgent;

#[contractimpl]
impl MigrationAgent {
    //
    // INICIALIZAÇÃO
    //

    /// Cria o agente apontando para o token de origem e congela o supply
    /// total como prova de conservação.
    pub fn initialize(env: Env, master: Address, source: Address) -> Result<(), SaleError> {
        // === CHECKS ===
        if storage::has_master(&env) {
            return Err(SaleError::AlreadyInitialized);
        }

        let snapshot = SafraTokenClient::new(&env, &source).total_supply();

        // === EFFECTS ===
        storage::set_master(&env, &master);
        storage::set_source(&env, &source);
        storage::set_supply_snapshot(&env, snapshot);
        storage::set_migrated_total(&env, 0);

        Ok(())
    }

    /// Aponta o token de destino (apenas master). Sem destino configurado,
    /// nenhuma migração é aceita.
    pub fn set_target(env: Env, target: Address) -> Result<(), SaleError> {
        let master = storage::get_master(&env);
        master.require_auth();
        storage::bump_critical_storage(&env);

        if storage::is_migration_done(&env) {
            return Err(SaleError::MigrationFinished);
        }

        storage::set_target(&env, &target);

        Ok(())
    }

    //
    // MIGRAÇÃO
    //

    /// Migra `amount` do holder: queima na origem, minta no destino, soma ao
    /// total migrado. Falha se amount <= 0, se o destino não foi
    /// configurado, se o agente já foi finalizado ou se o valor excede a
    /// fração transferível do saldo do holder.
    pub fn migrate(env: Env, holder: Address, amount: i128) -> Result<(), SaleError> {
        // === CHECKS ===
        holder.require_auth();
        storage::bump_critical_storage(&env);

        if storage::is_migration_done(&env) {
            return Err(SaleError::MigrationFinished);
        }
        validation::require_positive_amount(amount)?;

        let source = storage::get_source(&env).ok_or(SaleError::MigrationAgentNotSet)?;
        let target = storage::get_target(&env).ok_or(SaleError::MigrationAgentNotSet)?;

        let source_token = SafraTokenClient::new(&env, &source);
        if amount > source_token.transferable_balance(&holder) {
            return Err(SaleError::TransferableExceeded);
        }

        // === EFFECTS ===
        // A origem revalida transferibilidade e autoriza apenas este agente
        source_token.migrate_burn(&holder, &amount);
        SafraTokenClient::new(&env, &target).migrate_mint(&holder, &amount);

        let migrated = storage::get_migrated_total(&env);
        let new_migrated = migrated.checked_add(amount).ok_or(SaleError::MathOverflow)?;
        storage::set_migrated_total(&env, new_migrated);

        // === INTERACTIONS ===
        events::emit_migrated(&env, &holder, amount);

        Ok(())
    }

    /// Finaliza a migração (apenas master), uma única vez: só passa quando
    /// o total migrado é exatamente igual ao supply congelado. Zera as
    /// referências de origem/destino e o supply rastreado, tornando o
    /// agente permanentemente inerte.
    pub fn finalize_migration(env: Env) -> Result<(), SaleError> {
        // === CHECKS ===
        let master = storage::get_master(&env);
        master.require_auth();
        storage::bump_critical_storage(&env);

        if storage::is_migration_done(&env) {
            return Err(SaleError::MigrationFinished);
        }

        let migrated = storage::get_migrated_total(&env);
        let snapshot = storage::get_supply_snapshot(&env);
        if migrated != snapshot {
            return Err(SaleError::MigrationNotComplete);
        }

        // === EFFECTS ===
        storage::clear_source(&env);
        storage::clear_target(&env);
        storage::set_supply_snapshot(&env, 0);
        storage::set_migration_done(&env);

        // === INTERACTIONS ===
        events::emit_migration_finished(&env, migrated);

        Ok(())
    }

    //
    // LEITURA
    //

    pub fn get_master(env: Env) -> Address {
        storage::bump_critical_storage(&env);
        storage::get_master(&env)
    }

    pub fn get_source(env: Env) -> Option<Address> {
        storage::get_source(&env)
    }

    pub fn get_target(env: Env) -> Option<Address> {
        storage::get_target(&env)
    }

    pub fn supply_snapshot(env: Env) -> i128 {
        storage::get_supply_snapshot(&env)
    }

    pub fn migrated_total(env: Env) -> i128 {
        storage::get_migrated_total(&env)
    }

    pub fn is_finished(env: Env) -> bool {
        storage::is_migration_done(&env)
    }
}
