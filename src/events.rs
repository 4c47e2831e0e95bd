use soroban_sdk::{symbol_short, Address, Env};

//
// EVENTOS DA VENDA E DO TOKEN
//

// Contribuição depositada no vault (aguardando KYC)
pub fn emit_vaulted(env: &Env, investor: &Address, amount: i128) {
    env.events().publish((symbol_short!("vaulted"), investor), amount);
}

// Compra liquidada (wei aceito, tokens emitidos)
pub fn emit_settled(env: &Env, investor: &Address, wei: i128, tokens: i128) {
    env.events().publish((symbol_short!("settled"), investor), (wei, tokens));
}

// Resolução de KYC (true = aceito, false = rejeitado)
pub fn emit_validated(env: &Env, investor: &Address, accepted: bool) {
    env.events().publish((symbol_short!("validate"), investor), accepted);
}

// Reembolso de vault (rejeição ou sweep do finalize)
pub fn emit_refund(env: &Env, investor: &Address, amount: i128) {
    env.events().publish((symbol_short!("refund"), investor), amount);
}

// Distribuição direta (presale, pós-janela)
pub fn emit_distributed(env: &Env, beneficiary: &Address, amount: i128) {
    env.events().publish((symbol_short!("distrib"), beneficiary), amount);
}

// Investidor credenciado adicionado/removido
pub fn emit_accredited(env: &Env, investor: &Address, accredited: bool) {
    env.events().publish((symbol_short!("accred"), investor), accredited);
}

// Venda finalizada (alocação mintada para a fundação)
pub fn emit_finalized(env: &Env, wallet: &Address, allocation: i128) {
    env.events().publish((symbol_short!("finalized"), wallet), allocation);
}

// Pausa / despausa
pub fn emit_pause(env: &Env) {
    env.events().publish((symbol_short!("pause"),), true);
}

pub fn emit_unpause(env: &Env) {
    env.events().publish((symbol_short!("unpause"),), true);
}

// Carteira da fundação alterada
pub fn emit_wallet_changed(env: &Env, new_wallet: &Address) {
    env.events().publish((symbol_short!("wallet"),), new_wallet.clone());
}

// Mint / burn do ledger
pub fn emit_mint(env: &Env, to: &Address, amount: i128) {
    env.events().publish((symbol_short!("mint"), to), amount);
}

pub fn emit_burn(env: &Env, from: &Address, amount: i128) {
    env.events().publish((symbol_short!("burn"), from), amount);
}

// Grant de vesting criado
pub fn emit_grant_created(env: &Env, beneficiary: &Address, grant_id: u32, amount: i128) {
    env.events().publish((symbol_short!("grant"), beneficiary, grant_id), amount);
}

// Posse do token transferida (finalize entrega ao wallet)
pub fn emit_owner_changed(env: &Env, new_owner: &Address) {
    env.events().publish((symbol_short!("own_xfer"),), new_owner.clone());
}

// Token destravado para transferência
pub fn emit_unlocked(env: &Env) {
    env.events().publish((symbol_short!("unlocked"),), true);
}

// Migração: uma parcela movida para o sucessor
pub fn emit_migrated(env: &Env, holder: &Address, amount: i128) {
    env.events().publish((symbol_short!("migrate"), holder), amount);
}

// Migração finalizada (conservação provada, agente inerte)
pub fn emit_migration_finished(env: &Env, total: i128) {
    env.events().publish((symbol_short!("mig_fin"),), total);
}

// Agente / master de migração configurados
pub fn emit_migration_agent_set(env: &Env, agent: &Address) {
    env.events().publish((symbol_short!("agent_set"),), agent.clone());
}

pub fn emit_migration_master_set(env: &Env, master: &Address) {
    env.events().publish((symbol_short!("mstr_set"),), master.clone());
}

//
// TESTES
//
