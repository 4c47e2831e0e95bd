use soroban_sdk::{symbol_short, Address, Env, Vec};

use crate::types::{AccreditedTerms, InvestorRecord, SaleConfig, SaleError, TokenGrant, TokenMetadata};

// ============================================================================
// CONSTANTES
// ============================================================================

/// Limite máximo de grants concorrentes por beneficiário (arena fixa)
pub const MAX_GRANTS_PER_HOLDER: u32 = 20;

/// Janela de bônus: primeiros 7 dias da venda
pub const BONUS_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Bônus fixo de 5% em basis points
pub const BONUS_BPS: i128 = 500;

/// Denominador de basis points (10000 = 100%)
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Alocação da fundação: supply_antes × 49/51, de modo que após o mint
/// a fundação detenha 49% do supply total.
pub const FOUNDATION_NUMERATOR: i128 = 49;
pub const FOUNDATION_DENOMINATOR: i128 = 51;

/// TTL para storage crítico (1 ano em ledgers ~= 6.3M ledgers)
const CRITICAL_STORAGE_TTL: u32 = 6_307_200;

/// TTL threshold para bump (30 dias ~= 518K ledgers)
const CRITICAL_STORAGE_THRESHOLD: u32 = 518_400;

// ============================================================================
// FUNÇÕES DE BUMP (TTL)
// ============================================================================

/// Faz bump do TTL de storage crítico (owner, config, contadores)
pub fn bump_critical_storage(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(CRITICAL_STORAGE_THRESHOLD, CRITICAL_STORAGE_TTL);
}

fn bump_persistent<K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, key: &K) {
    env.storage()
        .persistent()
        .extend_ttl(key, CRITICAL_STORAGE_THRESHOLD, CRITICAL_STORAGE_TTL);
}

// ============================================================================
// OWNER / PAPÉIS
// ============================================================================

pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&symbol_short!("owner"))
}

pub fn get_owner(env: &Env) -> Address {
    env.storage().instance().get(&symbol_short!("owner")).unwrap()
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&symbol_short!("owner"), owner);
}

// ============================================================================
// CONFIGURAÇÃO DA VENDA
// ============================================================================

pub fn get_config(env: &Env) -> SaleConfig {
    env.storage().instance().get(&symbol_short!("config")).unwrap()
}

pub fn set_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&symbol_short!("config"), config);
}

/// Endereço do contrato do token que a venda controla
pub fn get_token(env: &Env) -> Address {
    env.storage().instance().get(&symbol_short!("token")).unwrap()
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&symbol_short!("token"), token);
}

// ============================================================================
// ESTADO DA VENDA
// ============================================================================

pub fn get_wei_raised(env: &Env) -> i128 {
    env.storage().instance().get(&symbol_short!("raised")).unwrap_or(0)
}

pub fn set_wei_raised(env: &Env, amount: i128) {
    env.storage().instance().set(&symbol_short!("raised"), &amount);
}

pub fn get_tokens_sold(env: &Env) -> i128 {
    env.storage().instance().get(&symbol_short!("sold")).unwrap_or(0)
}

pub fn set_tokens_sold(env: &Env, amount: i128) {
    env.storage().instance().set(&symbol_short!("sold"), &amount);
}

/// Soma de todos os saldos em escrow ainda não validados
pub fn get_escrow_total(env: &Env) -> i128 {
    env.storage().instance().get(&symbol_short!("escrow")).unwrap_or(0)
}

pub fn set_escrow_total(env: &Env, amount: i128) {
    env.storage().instance().set(&symbol_short!("escrow"), &amount);
}

pub fn get_tokens_distributed(env: &Env) -> i128 {
    env.storage().instance().get(&symbol_short!("distrib")).unwrap_or(0)
}

pub fn set_tokens_distributed(env: &Env, amount: i128) {
    env.storage().instance().set(&symbol_short!("distrib"), &amount);
}

/// Flag monotônica false -> true
pub fn is_finalized(env: &Env) -> bool {
    env.storage().instance().get(&symbol_short!("final")).unwrap_or(false)
}

pub fn set_finalized(env: &Env) {
    env.storage().instance().set(&symbol_short!("final"), &true);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&symbol_short!("paused")).unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&symbol_short!("paused"), &paused);
}

// ============================================================================
// REGISTROS DE INVESTIDOR
// ============================================================================

pub fn get_investor(env: &Env, addr: &Address) -> Option<InvestorRecord> {
    let key = (symbol_short!("investor"), addr);
    env.storage().persistent().get(&key)
}

pub fn set_investor(env: &Env, addr: &Address, record: &InvestorRecord) {
    let key = (symbol_short!("investor"), addr);
    env.storage().persistent().set(&key, record);
    bump_persistent(env, &key);
}

pub fn get_vault_balance(env: &Env, addr: &Address) -> i128 {
    let key = (symbol_short!("vault"), addr);
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_vault_balance(env: &Env, addr: &Address, amount: i128) {
    let key = (symbol_short!("vault"), addr);
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

/// Lista de investidores com saldo pendente em escrow (para o sweep)
pub fn get_pending_investors(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&symbol_short!("pending"))
        .unwrap_or(Vec::new(env))
}

pub fn set_pending_investors(env: &Env, investors: &Vec<Address>) {
    env.storage().instance().set(&symbol_short!("pending"), investors);
}

// ============================================================================
// INVESTIDORES CREDENCIADOS (presale)
// ============================================================================

pub fn get_accredited(env: &Env, addr: &Address) -> Option<AccreditedTerms> {
    let key = (symbol_short!("accred"), addr);
    env.storage().persistent().get(&key)
}

pub fn set_accredited(env: &Env, addr: &Address, terms: &AccreditedTerms) {
    let key = (symbol_short!("accred"), addr);
    env.storage().persistent().set(&key, terms);
    bump_persistent(env, &key);
}

pub fn remove_accredited(env: &Env, addr: &Address) {
    let key = (symbol_short!("accred"), addr);
    env.storage().persistent().remove(&key);
}

// ============================================================================
// LEDGER DO TOKEN
// ============================================================================

pub fn get_total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&symbol_short!("supply")).unwrap_or(0)
}

pub fn set_total_supply(env: &Env, amount: i128) {
    env.storage().instance().set(&symbol_short!("supply"), &amount);
}

pub fn get_balance(env: &Env, addr: &Address) -> i128 {
    let key = (symbol_short!("balance"), addr);
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_balance(env: &Env, addr: &Address, amount: i128) {
    let key = (symbol_short!("balance"), addr);
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn get_metadata(env: &Env) -> TokenMetadata {
    env.storage().instance().get(&symbol_short!("metadata")).unwrap()
}

pub fn set_metadata(env: &Env, metadata: &TokenMetadata) {
    env.storage().instance().set(&symbol_short!("metadata"), metadata);
}

/// Trava de transferência: o token nasce travado e só é destravado na
/// finalização da venda.
pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().get(&symbol_short!("locked")).unwrap_or(false)
}

pub fn set_locked(env: &Env, locked: bool) {
    env.storage().instance().set(&symbol_short!("locked"), &locked);
}

// ============================================================================
// GRANTS (arena fixa, indexada por beneficiário)
// ============================================================================

pub fn get_grant_count(env: &Env, beneficiary: &Address) -> u32 {
    let key = (symbol_short!("grant_cnt"), beneficiary);
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn increment_grant_count(env: &Env, beneficiary: &Address) -> Result<u32, SaleError> {
    let current = get_grant_count(env, beneficiary);

    if current >= MAX_GRANTS_PER_HOLDER {
        return Err(SaleError::GrantLimitExceeded);
    }

    let new_count = current + 1;
    let key = (symbol_short!("grant_cnt"), beneficiary);
    env.storage().persistent().set(&key, &new_count);
    bump_persistent(env, &key);

    Ok(new_count)
}

pub fn get_grant(env: &Env, beneficiary: &Address, id: u32) -> Option<TokenGrant> {
    let key = (symbol_short!("grant"), beneficiary, id);
    env.storage().persistent().get(&key)
}

pub fn set_grant(env: &Env, beneficiary: &Address, id: u32, grant: &TokenGrant) {
    let key = (symbol_short!("grant"), beneficiary, id);
    env.storage().persistent().set(&key, grant);
    bump_persistent(env, &key);
}

pub fn get_all_grants(env: &Env, beneficiary: &Address) -> Vec<TokenGrant> {
    let count = get_grant_count(env, beneficiary);
    let mut grants = Vec::new(env);

    for id in 0..count {
        if let Some(grant) = get_grant(env, beneficiary, id) {
            grants.push_back(grant);
        }
    }

    grants
}

// ============================================================================
// MIGRAÇÃO (lado do token)
// ============================================================================

pub fn get_migration_master(env: &Env) -> Address {
    env.storage().instance().get(&symbol_short!("mig_mstr")).unwrap()
}

pub fn set_migration_master(env: &Env, master: &Address) {
    env.storage().instance().set(&symbol_short!("mig_mstr"), master);
}

pub fn get_migration_agent(env: &Env) -> Option<Address> {
    env.storage().instance().get(&symbol_short!("mig_agnt"))
}

pub fn set_migration_agent(env: &Env, agent: &Address) {
    env.storage().instance().set(&symbol_short!("mig_agnt"), agent);
}

// ============================================================================
// MIGRAÇÃO (lado do agente)
// ============================================================================

pub fn has_master(env: &Env) -> bool {
    env.storage().instance().has(&symbol_short!("master"))
}

pub fn get_master(env: &Env) -> Address {
    env.storage().instance().get(&symbol_short!("master")).unwrap()
}

pub fn set_master(env: &Env, master: &Address) {
    env.storage().instance().set(&symbol_short!("master"), master);
}

pub fn get_source(env: &Env) -> Option<Address> {
    env.storage().instance().get(&symbol_short!("source"))
}

pub fn set_source(env: &Env, source: &Address) {
    env.storage().instance().set(&symbol_short!("source"), source);
}

pub fn clear_source(env: &Env) {
    env.storage().instance().remove(&symbol_short!("source"));
}

pub fn get_target(env: &Env) -> Option<Address> {
    env.storage().instance().get(&symbol_short!("target"))
}

pub fn set_target(env: &Env, target: &Address) {
    env.storage().instance().set(&symbol_short!("target"), target);
}

pub fn clear_target(env: &Env) {
    env.storage().instance().remove(&symbol_short!("target"));
}

/// Supply total congelado na criação do agente (prova de conservação)
pub fn get_supply_snapshot(env: &Env) -> i128 {
    env.storage().instance().get(&symbol_short!("snapshot")).unwrap_or(0)
}

pub fn set_supply_snapshot(env: &Env, amount: i128) {
    env.storage().instance().set(&symbol_short!("snapshot"), &amount);
}

pub fn get_migrated_total(env: &Env) -> i128 {
    env.storage().instance().get(&symbol_short!("migrated")).unwrap_or(0)
}

pub fn set_migrated_total(env: &Env, amount: i128) {
    env.storage().instance().set(&symbol_short!("migrated"), &amount);
}

pub fn is_migration_done(env: &Env) -> bool {
    env.storage().instance().get(&symbol_short!("mig_done")).unwrap_or(false)
}

pub fn set_migration_done(env: &Env) {
    env.storage().instance().set(&symbol_short!("mig_done"), &true);
}
