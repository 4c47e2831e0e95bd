#![cfg(test)]
#![cfg(not(tarpaulin_include))]
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String};

use safra_sale::{
    MigrationAgent, MigrationAgentClient, SafraToken, SafraTokenClient, SaleError,
};

struct MigrationEnv<'a> {
    env: Env,
    source: SafraTokenClient<'a>,
    target: SafraTokenClient<'a>,
    agent: MigrationAgentClient<'a>,
    master: Address,
}

fn register_token<'a>(env: &Env, name: &str, symbol: &str, owner: &Address) -> SafraTokenClient<'a> {
    let id = env.register_contract(None, SafraToken);
    let client = SafraTokenClient::new(env, &id);
    client.initialize(
        owner,
        &String::from_str(env, name),
        &String::from_str(env, symbol),
        &18,
    );
    client
}

/// Origem com saldos mintados, agente apontando origem -> destino,
/// agente registrado como migration agent em ambos os tokens.
fn setup_migration<'a>(holders: &[(&Address, i128)], env: &Env) -> MigrationEnv<'a> {
    env.mock_all_auths();

    let master = Address::generate(env);
    let source = register_token(env, "Safra Token", "SFR", &master);
    let target = register_token(env, "Safra Token v2", "SFR2", &master);

    for (holder, amount) in holders {
        source.mint(holder, amount);
    }

    let agent_id = env.register_contract(None, MigrationAgent);
    let agent = MigrationAgentClient::new(env, &agent_id);
    agent.initialize(&master, &source.address);

    source.set_migration_agent(&agent_id);
    target.set_migration_agent(&agent_id);
    agent.set_target(&target.address);

    MigrationEnv {
        env: env.clone(),
        source,
        target,
        agent,
        master,
    }
}

// ============================================================================
// SNAPSHOT E CONSERVAÇÃO DO SUPPLY
// ============================================================================

#[test]
fn test_snapshot_freezes_source_supply() {
    let env = Env::default();
    let a = Address::generate(&env);
    let b = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000), (&b, 500)], &env);

    assert_eq!(m.agent.supply_snapshot(), 1_500);
    assert_eq!(m.agent.migrated_total(), 0);
    assert!(!m.agent.is_finished());
    assert_eq!(m.agent.get_master(), m.master);
    assert_eq!(m.agent.get_source(), Some(m.source.address.clone()));
    assert_eq!(m.agent.get_target(), Some(m.target.address.clone()));
}

#[test]
fn test_migrate_moves_balance_and_conserves_supply() {
    let env = Env::default();
    let a = Address::generate(&env);
    let b = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000), (&b, 500)], &env);

    m.agent.migrate(&a, &1_000);

    assert_eq!(m.source.balance(&a), 0);
    assert_eq!(m.target.balance(&a), 1_000);
    assert_eq!(m.agent.migrated_total(), 1_000);

    // Supply combinado inalterado em qualquer ponto da migração
    assert_eq!(m.source.total_supply() + m.target.total_supply(), 1_500);

    m.agent.migrate(&b, &500);
    assert_eq!(m.source.total_supply() + m.target.total_supply(), 1_500);
    assert_eq!(m.source.total_supply(), 0);
}

#[test]
fn test_partial_migration_in_steps() {
    let env = Env::default();
    let a = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000)], &env);

    m.agent.migrate(&a, &300);
    m.agent.migrate(&a, &200);

    assert_eq!(m.source.balance(&a), 500);
    assert_eq!(m.target.balance(&a), 500);
    assert_eq!(m.agent.migrated_total(), 500);
}

// ============================================================================
// PRÉ-CONDIÇÕES DO MIGRATE
// ============================================================================

#[test]
fn test_migrate_without_target_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let master = Address::generate(&env);
    let holder = Address::generate(&env);
    let source = register_token(&env, "Safra Token", "SFR", &master);
    source.mint(&holder, &100);

    let agent_id = env.register_contract(None, MigrationAgent);
    let agent = MigrationAgentClient::new(&env, &agent_id);
    agent.initialize(&master, &source.address);
    source.set_migration_agent(&agent_id);

    let res = agent.try_migrate(&holder, &100);
    assert_eq!(res.unwrap_err().unwrap(), SaleError::MigrationAgentNotSet);
}

#[test]
fn test_migrate_zero_amount_fails() {
    let env = Env::default();
    let a = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000)], &env);

    let res = m.agent.try_migrate(&a, &0);
    assert_eq!(res.unwrap_err().unwrap(), SaleError::InvalidAmount);
}

#[test]
fn test_migrate_above_balance_fails() {
    let env = Env::default();
    let a = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000)], &env);

    let res = m.agent.try_migrate(&a, &1_001);
    assert_eq!(res.unwrap_err().unwrap(), SaleError::TransferableExceeded);
}

#[test]
fn test_migrate_respects_vesting() {
    let env = Env::default();
    let a = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000)], &env);

    // Grant extra ainda não vestido: só a parte livre migra
    m.env.ledger().with_mut(|li| li.timestamp = 100);
    m.source
        .mint_granted(&a, &500, &100, &1_000, &10_000, &false, &false);

    let res = m.agent.try_migrate(&a, &1_001);
    assert_eq!(res.unwrap_err().unwrap(), SaleError::TransferableExceeded);

    m.agent.migrate(&a, &1_000);
    assert_eq!(m.source.balance(&a), 500);
}

// ============================================================================
// FINALIZAÇÃO: migrado == snapshot, depois inerte
// ============================================================================

#[test]
fn test_finalize_requires_exact_snapshot() {
    let env = Env::default();
    let a = Address::generate(&env);
    let b = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000), (&b, 500)], &env);

    m.agent.migrate(&a, &1_000);

    // 1000 de 1500: ainda incompleta
    let res = m.agent.try_finalize_migration();
    assert_eq!(res.unwrap_err().unwrap(), SaleError::MigrationNotComplete);

    m.agent.migrate(&b, &500);
    m.agent.finalize_migration();
    assert!(m.agent.is_finished());
}

#[test]
fn test_finished_agent_is_inert() {
    let env = Env::default();
    let a = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000)], &env);

    m.agent.migrate(&a, &1_000);
    m.agent.finalize_migration();

    // Referências zeradas
    assert_eq!(m.agent.get_source(), None);
    assert_eq!(m.agent.get_target(), None);
    assert_eq!(m.agent.supply_snapshot(), 0);

    // Nenhuma operação passa depois do finalize
    let res = m.agent.try_migrate(&a, &1);
    assert_eq!(res.unwrap_err().unwrap(), SaleError::MigrationFinished);

    let res = m.agent.try_finalize_migration();
    assert_eq!(res.unwrap_err().unwrap(), SaleError::MigrationFinished);

    let res = m.agent.try_set_target(&m.target.address);
    assert_eq!(res.unwrap_err().unwrap(), SaleError::MigrationFinished);
}

#[test]
fn test_agent_initialize_twice_fails() {
    let env = Env::default();
    let a = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000)], &env);

    let res = m.agent.try_initialize(&m.master, &m.source.address);
    assert_eq!(res.unwrap_err().unwrap(), SaleError::AlreadyInitialized);
}

#[test]
fn test_master_and_holder_gated_ops_require_auth() {
    let env = Env::default();
    let a = Address::generate(&env);
    let m = setup_migration(&[(&a, 1_000)], &env);

    // Sem nenhuma autorização mockada, todo require_auth falha
    m.env.mock_auths(&[]);

    let res = m.agent.try_set_target(&m.target.address);
    assert!(res.is_err(), "set_target sem autorização deveria falhar");

    let res = m.agent.try_migrate(&a, &100);
    assert!(res.is_err(), "migrate sem autorização do holder deveria falhar");

    let res = m.agent.try_finalize_migration();
    assert!(res.is_err(), "finalize sem autorização deveria falhar");

    // Lado do token: owner e master também são exigidos
    let res = m.source.try_mint(&a, &1);
    assert!(res.is_err(), "mint sem autorização deveria falhar");

    let res = m.source.try_set_migration_agent(&m.agent.address);
    assert!(res.is_err(), "set_migration_agent sem autorização deveria falhar");

    let res = m.source.try_unlock();
    assert!(res.is_err(), "unlock sem autorização deveria falhar");

    assert_eq!(m.source.balance(&a), 1_000);
    assert_eq!(m.agent.migrated_total(), 0);
}

#[test]
fn test_empty_source_finalizes_immediately() {
    // Snapshot zero: nada a migrar, o finalize já passa
    let env = Env::default();
    let m = setup_migration(&[], &env);

    assert_eq!(m.agent.supply_snapshot(), 0);
    m.agent.finalize_migration();
    assert!(m.agent.is_finished());
}
