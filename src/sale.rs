use soroban_sdk::{contract, contractimpl, Address, Env};

use crate::events;
use crate::policy;
use crate::storage;
use crate::token::SafraTokenClient;
use crate::types::{
    AccreditedTerms, InvestorRecord, KycStatus, SaleConfig, SaleError, SalePhase,
};
use crate::validation;
use crate::vault;

//
// SAFRA SALE - MÁQUINA DE ESTADOS DA VENDA
//
// NotStarted -> Open -> (Paused <-> Open) -> Ended -> Finalized
//
// Orquestra a entrada de contribuições, invoca o enforcer de política,
// deposita no vault de escrow ou minta via o ledger do token, e conduz a
// finalização. O token é consumido cross-contract pelo client gerado.
//

#[contract]
pub struct SafraSale;

#[contractimpl]
impl SafraSale {
    //
    // INICIALIZAÇÃO
    //

    /// Inicializa a venda. `token` é o contrato SafraToken cuja posse este
    /// contrato detém até o finalize.
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        config: SaleConfig,
    ) -> Result<(), SaleError> {
        // === CHECKS ===
        if storage::has_owner(&env) {
            return Err(SaleError::AlreadyInitialized);
        }
        validation::require_valid_config(&config)?;

        // === EFFECTS ===
        storage::set_owner(&env, &owner);
        storage::set_token(&env, &token);
        storage::set_config(&env, &config);
        storage::set_paused(&env, false);

        Ok(())
    }

    //
    // COMPRA
    //

    /// Contribuição de `amount` (wei) pelo beneficiário. Válida apenas com a
    /// venda aberta e dentro da janela. Roda a cadeia do enforcer (janela,
    /// gas price, intervalo, limites por investidor, headroom do cap).
    ///
    /// Se o beneficiário já tem KYC aceito, o valor vira tokens na hora.
    /// Caso contrário o valor (após clipping de cap) vai para o vault de
    /// escrow aguardando KYC. Devolve o valor efetivamente aceito — o
    /// clipping é ecoado de volta para que as somas do ledger fechem.
    pub fn buy_tokens(
        env: Env,
        beneficiary: Address,
        amount: i128,
        gas_price: i128,
    ) -> Result<i128, SaleError> {
        // === CHECKS ===
        beneficiary.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_not_finalized(&env)?;
        validation::require_not_paused(&env)?;
        validation::require_positive_amount(amount)?;

        let config = storage::get_config(&env);
        let now = env.ledger().timestamp();

        if !policy::within_sale_window(config.start_time, config.end_time, now) {
            return Err(SaleError::SaleNotOpen);
        }
        if !policy::gas_price_ok(config.max_gas_price, gas_price, true) {
            return Err(SaleError::GasPriceTooHigh);
        }

        let existing = storage::get_investor(&env, &beneficiary);
        let first_contribution = existing.is_none();
        let mut record = existing.unwrap_or_else(InvestorRecord::new);

        if !policy::interval_ok(config.min_call_interval, record.last_call_time, now) {
            return Err(SaleError::CallTooFrequent);
        }

        // No modo presale os termos do credenciamento substituem os limites
        // globais; investidor fora da lista sempre falha.
        let terms = if config.accredited_only {
            Some(
                storage::get_accredited(&env, &beneficiary).ok_or(SaleError::NotAccredited)?,
            )
        } else {
            None
        };
        let (min_invest, max_cumulative) = match &terms {
            Some(t) => (t.min_invest, t.max_cumulative_invest),
            None => (config.min_invest, config.max_cumulative_invest),
        };

        // Clipping contra os fundos comprometidos (raised + escrow), para
        // que wei_raised <= cap sobreviva a qualquer ordem de liquidação.
        let raised = storage::get_wei_raised(&env);
        let escrow = storage::get_escrow_total(&env);
        let committed = raised.checked_add(escrow).ok_or(SaleError::MathOverflow)?;
        let accepted = policy::clip_to_cap(config.cap, committed, amount)?;

        // min_invest aplica ao valor submetido; o teto cumulativo inclui o
        // que já está no vault aguardando KYC.
        let vaulted = vault::balance_of(&env, &beneficiary);
        let new_cumulative = record
            .invested
            .checked_add(vaulted)
            .ok_or(SaleError::MathOverflow)?
            .checked_add(accepted)
            .ok_or(SaleError::MathOverflow)?;
        policy::invest_limit_ok(min_invest, max_cumulative, amount, new_cumulative)?;

        // === EFFECTS ===
        record.last_call_time = now;

        if record.kyc == KycStatus::Accepted {
            // KYC já resolvido: liquidação imediata. Na política fixada a
            // decisão tomada na primeira contribuição vale aqui também; na
            // reavaliada o bônus depende da janela neste instante.
            let bonus = if config.bonus_fixed_at_first {
                record.bonus_eligible
            } else {
                policy::bonus_window_ok(config.start_time, now)
            };
            settle_purchase(&env, &config, &beneficiary, accepted, bonus, terms.as_ref())?;
            record.invested = record
                .invested
                .checked_add(accepted)
                .ok_or(SaleError::MathOverflow)?;
            storage::set_investor(&env, &beneficiary, &record);
        } else {
            // Elegibilidade ao bônus conforme a política configurada:
            // fixada na primeira contribuição, ou reavaliada a cada ciclo
            // de escrow.
            if config.bonus_fixed_at_first {
                if first_contribution {
                    record.bonus_eligible = policy::bonus_window_ok(config.start_time, now);
                }
            } else {
                record.bonus_eligible = policy::bonus_window_ok(config.start_time, now);
            }

            vault::deposit(&env, &beneficiary, accepted)?;
            storage::set_investor(&env, &beneficiary, &record);

            // === INTERACTIONS ===
            events::emit_vaulted(&env, &beneficiary, accepted);
        }

        Ok(accepted)
    }

    //
    // KYC VALIDATION GATE
    //

    /// Resolve o KYC de um investidor (apenas owner, sem limite de janela).
    ///
    /// Aceito: libera o vault, converte em tokens com bônus se a
    /// contribuição original caiu na janela de bônus, marca aceito.
    /// Rejeitado: libera o vault como reembolso, marca rejeitado.
    ///
    /// Após o finalize a posse do token já foi entregue ao wallet, então só
    /// o caminho de rejeição/reembolso permanece disponível; a aceitação
    /// falha com AlreadyFinalized.
    ///
    /// Revalidar um investidor já validado é idempotente quanto aos fundos
    /// já liquidados: apenas o incremento recém-depositado desde a última
    /// validação é processado (vault vazio = nenhuma mudança de saldo).
    pub fn validate_purchase(
        env: Env,
        investor: Address,
        accepted: bool,
    ) -> Result<i128, SaleError> {
        // === CHECKS ===
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        if accepted {
            validation::require_not_finalized(&env)?;
        }

        let mut record =
            storage::get_investor(&env, &investor).ok_or(SaleError::InvestorNotFound)?;

        // === EFFECTS ===
        let amount = vault::release(&env, &investor);

        if accepted {
            if amount > 0 {
                let config = storage::get_config(&env);
                let terms = if config.accredited_only {
                    storage::get_accredited(&env, &investor)
                } else {
                    None
                };

                // O bônus usa a flag capturada no momento da contribuição,
                // nunca composta entre liquidações parciais. Na política
                // reavaliada a flag é consumida aqui (re-setável no próximo
                // ciclo de escrow); na fixada a decisão é permanente.
                let bonus = record.bonus_eligible;
                settle_purchase(&env, &config, &investor, amount, bonus, terms.as_ref())?;

                record.invested = record
                    .invested
                    .checked_add(amount)
                    .ok_or(SaleError::MathOverflow)?;
                if !config.bonus_fixed_at_first {
                    record.bonus_eligible = false;
                }
            }
            record.kyc = KycStatus::Accepted;
        } else {
            record.kyc = KycStatus::Rejected;
            if amount > 0 {
                events::emit_refund(&env, &investor, amount);
            }
        }

        storage::set_investor(&env, &investor, &record);

        // === INTERACTIONS ===
        events::emit_validated(&env, &investor, accepted);

        Ok(amount)
    }

    //
    // DISTRIBUIÇÃO DIRETA (presale)
    //

    /// Emissão direta de grant após o fechamento da janela de captação (ou
    /// cap atingido), limitada pelo distribution_cap — separado do cap de
    /// captação. `cliff_secs == 0 && vesting_secs == 0` minta sem vesting.
    pub fn distribute_tokens(
        env: Env,
        beneficiary: Address,
        amount: i128,
        cliff_secs: u64,
        vesting_secs: u64,
        revokable: bool,
        burns_on_revoke: bool,
    ) -> Result<(), SaleError> {
        // === CHECKS ===
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_not_finalized(&env)?;
        validation::require_not_paused(&env)?;
        validation::require_positive_amount(amount)?;

        if vesting_secs < cliff_secs {
            return Err(SaleError::InvalidGrantParams);
        }

        let config = storage::get_config(&env);
        let now = env.ledger().timestamp();
        let raised = storage::get_wei_raised(&env);

        if now <= config.end_time && raised < config.cap {
            return Err(SaleError::RaiseStillOpen);
        }

        let distributed = storage::get_tokens_distributed(&env);
        let new_distributed = distributed
            .checked_add(amount)
            .ok_or(SaleError::MathOverflow)?;
        if new_distributed > config.distribution_cap {
            return Err(SaleError::DistributionCapExceeded);
        }

        // === EFFECTS ===
        let token = SafraTokenClient::new(&env, &storage::get_token(&env));
        if cliff_secs == 0 && vesting_secs == 0 {
            token.mint(&beneficiary, &amount);
        } else {
            let cliff = now.checked_add(cliff_secs).ok_or(SaleError::MathOverflow)?;
            let vesting_end = now.checked_add(vesting_secs).ok_or(SaleError::MathOverflow)?;
            token.mint_granted(
                &beneficiary,
                &amount,
                &now,
                &cliff,
                &vesting_end,
                &revokable,
                &burns_on_revoke,
            );
        }

        storage::set_tokens_distributed(&env, new_distributed);

        // === INTERACTIONS ===
        events::emit_distributed(&env, &beneficiary, amount);

        Ok(())
    }

    //
    // REGISTRO DE CREDENCIADOS (presale)
    //

    /// Credencia um investidor com termos próprios de min/max e vesting
    pub fn add_accredited_investor(
        env: Env,
        investor: Address,
        terms: AccreditedTerms,
    ) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        if terms.min_invest <= 0 || terms.min_invest > terms.max_cumulative_invest {
            return Err(SaleError::InvalidConfig);
        }
        if terms.vesting_secs < terms.cliff_secs {
            return Err(SaleError::InvalidGrantParams);
        }

        storage::set_accredited(&env, &investor, &terms);
        events::emit_accredited(&env, &investor, true);

        Ok(())
    }

    pub fn remove_accredited_investor(env: Env, investor: Address) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        storage::remove_accredited(&env, &investor);
        events::emit_accredited(&env, &investor, false);

        Ok(())
    }

    //
    // FINALIZAÇÃO (one-shot)
    //

    /// Fecha a venda, uma única vez: permitida apenas com a venda não
    /// pausada e `now >= end_time` ou cap atingido. Minta a alocação da
    /// fundação (supply × 49/51, de modo que a fundação fique com 49% do
    /// supply final), destrava o token, transfere a posse do token para o
    /// wallet e marca finalized.
    ///
    /// Vaults ainda pendentes: com `sweep_on_finalize` todos são
    /// reembolsados aqui; sem a flag permanecem reembolsáveis via
    /// validate_purchase(_, false).
    pub fn finalize(env: Env) -> Result<(), SaleError> {
        // === CHECKS ===
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_not_finalized(&env)?;
        validation::require_not_paused(&env)?;

        let config = storage::get_config(&env);
        let now = env.ledger().timestamp();
        let raised = storage::get_wei_raised(&env);

        if now < config.end_time && raised < config.cap {
            return Err(SaleError::FinalizeNotAllowed);
        }

        // === EFFECTS ===
        if config.sweep_on_finalize {
            let pending = vault::pending_investors(&env);
            for investor in pending.iter() {
                let amount = vault::release(&env, &investor);
                if amount > 0 {
                    events::emit_refund(&env, &investor, amount);
                }
            }
        }

        let token = SafraTokenClient::new(&env, &storage::get_token(&env));
        let supply = token.total_supply();
        let allocation = supply
            .checked_mul(storage::FOUNDATION_NUMERATOR)
            .ok_or(SaleError::MathOverflow)?
            / storage::FOUNDATION_DENOMINATOR;

        if allocation > 0 {
            token.mint(&config.wallet, &allocation);
        }
        token.unlock();
        token.set_owner(&config.wallet);

        storage::set_finalized(&env);

        // === INTERACTIONS ===
        events::emit_finalized(&env, &config.wallet, allocation);

        Ok(())
    }

    //
    // ADMINISTRAÇÃO
    //

    /// Pausa a venda. Transição no-op (pausar já pausado) falha.
    pub fn pause(env: Env) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_not_finalized(&env)?;
        validation::require_not_paused(&env)?;

        storage::set_paused(&env, true);
        events::emit_pause(&env);

        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        validation::require_paused(&env)?;

        storage::set_paused(&env, false);
        events::emit_unpause(&env);

        Ok(())
    }

    /// Troca a carteira da fundação
    pub fn set_wallet(env: Env, new_wallet: Address) -> Result<(), SaleError> {
        let owner = storage::get_owner(&env);
        owner.require_auth();
        storage::bump_critical_storage(&env);

        let mut config = storage::get_config(&env);
        config.wallet = new_wallet.clone();
        storage::set_config(&env, &config);

        events::emit_wallet_changed(&env, &new_wallet);

        Ok(())
    }

    //
    // LEITURA
    //

    pub fn get_config(env: Env) -> SaleConfig {
        storage::bump_critical_storage(&env);
        storage::get_config(&env)
    }

    pub fn get_owner(env: Env) -> Address {
        storage::bump_critical_storage(&env);
        storage::get_owner(&env)
    }

    pub fn wei_raised(env: Env) -> i128 {
        storage::get_wei_raised(&env)
    }

    pub fn tokens_sold(env: Env) -> i128 {
        storage::get_tokens_sold(&env)
    }

    pub fn escrow_total(env: Env) -> i128 {
        storage::get_escrow_total(&env)
    }

    pub fn tokens_distributed(env: Env) -> i128 {
        storage::get_tokens_distributed(&env)
    }

    pub fn vault_balance(env: Env, investor: Address) -> i128 {
        vault::balance_of(&env, &investor)
    }

    pub fn get_investor(env: Env, investor: Address) -> Option<InvestorRecord> {
        storage::get_investor(&env, &investor)
    }

    pub fn accredited_terms(env: Env, investor: Address) -> Option<AccreditedTerms> {
        storage::get_accredited(&env, &investor)
    }

    pub fn is_finalized(env: Env) -> bool {
        storage::is_finalized(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    /// Fase atual: NotStarted -> Open -> (Paused) -> Ended -> Finalized
    pub fn phase(env: Env) -> SalePhase {
        if storage::is_finalized(&env) {
            return SalePhase::Finalized;
        }
        if storage::is_paused(&env) {
            return SalePhase::Paused;
        }

        let config = storage::get_config(&env);
        let now = env.ledger().timestamp();

        if now < config.start_time {
            SalePhase::NotStarted
        } else if now > config.end_time {
            SalePhase::Ended
        } else {
            SalePhase::Open
        }
    }
}

// ============================================================================
// LIQUIDAÇÃO
// ============================================================================

/// Converte `amount` (wei) em tokens a `rate × amount`, aplica o bônus de 5%
/// quando elegível e minta — via grant quando os termos de credenciamento
/// trazem vesting. Incrementa wei_raised e tokens_sold.
fn settle_purchase(
    env: &Env,
    config: &SaleConfig,
    investor: &Address,
    amount: i128,
    bonus: bool,
    terms: Option<&AccreditedTerms>,
) -> Result<i128, SaleError> {
    let mut tokens = amount
        .checked_mul(config.rate)
        .ok_or(SaleError::MathOverflow)?;
    if bonus {
        tokens = policy::apply_bonus(tokens)?;
    }

    let token = SafraTokenClient::new(env, &storage::get_token(env));
    let now = env.ledger().timestamp();

    match terms {
        Some(t) if t.vesting_secs > 0 => {
            let cliff = now.checked_add(t.cliff_secs).ok_or(SaleError::MathOverflow)?;
            let vesting_end = now
                .checked_add(t.vesting_secs)
                .ok_or(SaleError::MathOverflow)?;
            token.mint_granted(
                investor,
                &tokens,
                &now,
                &cliff,
                &vesting_end,
                &false,
                &false,
            );
        }
        _ => {
            token.mint(investor, &tokens);
        }
    }

    let raised = storage::get_wei_raised(env);
    let new_raised = raised.checked_add(amount).ok_or(SaleError::MathOverflow)?;
    storage::set_wei_raised(env, new_raised);

    let sold = storage::get_tokens_sold(env);
    let new_sold = sold.checked_add(tokens).ok_or(SaleError::MathOverflow)?;
    storage::set_tokens_sold(env, new_sold);

    events::emit_settled(env, investor, amount, tokens);

    Ok(tokens)
}
