#![allow(dead_code)]
use soroban_sdk::{contracterror, contracttype, Address, String};

// ============================================================================
// ERROS DO CONTRATO
// ============================================================================
// Agrupados por classe de falha: autorização, timing/estado, validação de
// entrada, violação de política, violação de invariante.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SaleError {
    AlreadyInitialized = 1,

    // Autorização (falhas de require_auth abortam no host; aqui só entra
    // a autorização de nível de contrato)
    NotAccredited = 3,

    // Timing / estado
    SaleNotOpen = 4,
    SalePaused = 5,
    SaleNotPaused = 6,
    AlreadyFinalized = 7,
    FinalizeNotAllowed = 8,
    RaiseStillOpen = 9,
    TokenLocked = 10,
    TokenNotLocked = 11,

    // Validação de entrada
    InvalidAmount = 12,
    InvalidConfig = 13,
    InvalidGrantParams = 14,
    GrantLimitExceeded = 15,
    InvestorNotFound = 16,

    // Violação de política
    BelowMinInvestment = 17,
    AboveMaxInvestment = 18,
    CapReached = 19,
    GasPriceTooHigh = 20,
    CallTooFrequent = 21,
    DistributionCapExceeded = 22,

    // Violação de invariante / migração
    InsufficientBalance = 23,
    TransferableExceeded = 24,
    MigrationAgentNotSet = 25,
    MigrationNotComplete = 26,
    MigrationFinished = 27,
    MathOverflow = 28,
}

// ============================================================================
// METADADOS DO TOKEN
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

// ============================================================================
// CONFIGURAÇÃO DA VENDA (imutável após initialize, exceto wallet)
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    pub start_time: u64,
    pub end_time: u64,
    /// Tokens por unidade de moeda base
    pub rate: i128,
    /// Máximo arrecadado (wei). Invariante: wei_raised <= cap, sempre.
    pub cap: i128,
    pub min_invest: i128,
    pub max_cumulative_invest: i128,
    /// Teto de gas price dentro da janela de venda. 0 desativa.
    pub max_gas_price: i128,
    /// Intervalo mínimo entre chamadas do mesmo investidor. 0 desativa.
    pub min_call_interval: u64,
    /// Carteira da fundação (recebe alocação 49/51 e a posse do token)
    pub wallet: Address,
    /// true: elegibilidade ao bônus fixada na primeira contribuição;
    /// false: reavaliada a cada ciclo de escrow
    pub bonus_fixed_at_first: bool,
    /// true: finalize devolve todos os vaults pendentes;
    /// false: finaliza ao redor deles (reembolsáveis via validate_purchase)
    pub sweep_on_finalize: bool,
    /// Modo presale: apenas investidores credenciados podem contribuir
    pub accredited_only: bool,
    /// Teto de distribuição direta (distribute_tokens), separado do cap
    pub distribution_cap: i128,
}

// ============================================================================
// REGISTRO DO INVESTIDOR
// ============================================================================

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KycStatus {
    Unknown,
    Accepted,
    Rejected,
}

/// Criado lazy na primeira contribuição; nunca é deletado.
/// O saldo em escrow fica em chave própria (ver vault.rs).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorRecord {
    /// Contribuição cumulativa já validada
    pub invested: i128,
    pub kyc: KycStatus,
    pub bonus_eligible: bool,
    pub last_call_time: u64,
}

impl InvestorRecord {
    pub fn new() -> Self {
        InvestorRecord {
            invested: 0,
            kyc: KycStatus::Unknown,
            bonus_eligible: false,
            last_call_time: 0,
        }
    }
}

// ============================================================================
// TERMOS DE INVESTIDOR CREDENCIADO (presale)
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccreditedTerms {
    pub min_invest: i128,
    pub max_cumulative_invest: i128,
    /// Cliff e vesting aplicados na liquidação; 0/0 = mint direto
    pub cliff_secs: u64,
    pub vesting_secs: u64,
}

// ============================================================================
// TOKEN GRANT (vesting)
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenGrant {
    pub amount: i128,
    pub start: u64,
    pub cliff: u64,
    pub vesting_end: u64,
    pub revokable: bool,
    pub burns_on_revoke: bool,
}

// ============================================================================
// FASE DA VENDA
// ============================================================================

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SalePhase {
    NotStarted,
    Open,
    Paused,
    Ended,
    Finalized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_values() {
        assert_eq!(SaleError::AlreadyInitialized as u32, 1);
        assert_eq!(SaleError::NotAccredited as u32, 3);
        assert_eq!(SaleError::CapReached as u32, 19);
        assert_eq!(SaleError::MathOverflow as u32, 28);
    }

    #[test]
    fn test_error_ordering() {
        assert!(SaleError::NotAccredited < SaleError::SaleNotOpen);
        assert!(SaleError::InvalidAmount < SaleError::BelowMinInvestment);
    }

    #[test]
    fn test_investor_record_default() {
        let rec = InvestorRecord::new();
        assert_eq!(rec.invested, 0);
        assert_eq!(rec.kyc, KycStatus::Unknown);
        assert!(!rec.bonus_eligible);
        assert_eq!(rec.last_call_time, 0);
    }

    #[test]
    fn test_grant_clone() {
        let g = TokenGrant {
            amount: 1000,
            start: 10,
            cliff: 20,
            vesting_end: 110,
            revokable: true,
            burns_on_revoke: false,
        };
        assert_eq!(g.clone(), g);
    }
}
