use anyhow::Result;
use freequidity_reader::{
    balances,
    config::{self, AppConfig},
    dex::{ChainReader, PublicRpcClient},
    diagnostics::DiagnosticsCollector,
    models::{DiagnosticReport, QuoteResult},
    quote::{PriceResult, QuoteReconciler},
    swap::{self, SwapSubmitter, TxHandle},
    utils,
    wallet::{LocalWalletProvider, WalletSession},
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct Summary<'a> {
    chain_id: u64,
    chain_name: &'a str,
    native_symbol: &'a str,
    contract: String,
    wallet: &'a WalletSession,
    wallet_native: Option<String>,
    contract_available_tp: Option<String>,
    price: &'a PriceResult,
    quote: &'a QuoteResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a DiagnosticReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx: Option<TxHandle>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    let opts = config::load_run_options();
    let network = &config.network;

    info!(
        chain_id = network.chain_id,
        chain_name = %network.chain_name,
        native_symbol = %network.native_symbol,
        contract = ?config.contracts.swap_contract,
        contract_from_env = config.contract_from_env,
        "[INIT] freequidity-reader starting"
    );

    let public_rpc = PublicRpcClient::connect(&network.rpc_url, config.probe_timeout)?;

    // Wallet (optional) ----------------------------------------------------
    let wallet = match &config.private_key {
        Some(key) => {
            match LocalWalletProvider::connect(&config.wallet_rpc_url, key, config.probe_timeout)
                .await
            {
                Ok(w) => Some(w),
                Err(e) => {
                    warn!(error = %e, "[WALLET] connection failed; continuing read-only");
                    None
                }
            }
        }
        None => {
            info!("[WALLET] PRIVATE_KEY not set; read-only run");
            None
        }
    };

    let mut session = WalletSession::disconnected();
    if let Some(w) = &wallet {
        session = WalletSession::connect(w).await?;
        if let Err(e) = session.ensure_network(w, network.chain_id).await {
            warn!(error = %e, "[WALLET] you are on the wrong network");
        }
    }

    let primary: Option<&dyn ChainReader> =
        wallet.as_ref().map(|w| w.reader() as &dyn ChainReader);
    let fallback: Option<&dyn ChainReader> = Some(&public_rpc);
    let read_conn: &dyn ChainReader = primary.unwrap_or(&public_rpc);

    // Balances -------------------------------------------------------------
    let (contract_tp, wallet_native) = futures::join!(
        balances::contract_available_tp(read_conn, &config.contracts, config.token_decimals),
        async {
            match session.address {
                Some(addr) => Some(balances::wallet_native_balance(read_conn, addr).await),
                None => None,
            }
        }
    );
    let contract_tp = contract_tp
        .map_err(|e| warn!(error = %e, "[BALANCE] contract TP balance unavailable"))
        .ok();
    let wallet_native = wallet_native.and_then(|res| {
        res.map_err(|e| warn!(error = %e, "[BALANCE] wallet balance unavailable"))
            .ok()
    });
    info!(
        contract_available_tp = ?contract_tp,
        wallet_native = ?wallet_native,
        native_symbol = %network.native_symbol,
        "[BALANCE] balances"
    );

    // Price and quote ------------------------------------------------------
    let reconciler = QuoteReconciler::new(&config);
    let price = reconciler.get_price(primary, fallback).await;
    match &price {
        PriceResult::Ok { .. } => info!(
            price = %price.display().unwrap_or_default(),
            "[PRICE] {} per 1 TP",
            network.native_symbol
        ),
        PriceResult::Unavailable { reason } => warn!(?reason, "[PRICE] {reason}"),
    }

    let quote = reconciler
        .get_quote(&opts.quote_amount, primary, fallback)
        .await?;
    match &quote {
        QuoteResult::Ok(q) => info!(
            amount_in = %opts.quote_amount,
            tp_out = %q.display(),
            path = ?q.path,
            "[QUOTE] got quote"
        ),
        QuoteResult::Unavailable { reason } => warn!(?reason, "[QUOTE] {reason}"),
    }

    // Diagnostics ----------------------------------------------------------
    let report = if opts.run_diagnostics {
        let report = DiagnosticsCollector::new(&config)
            .run(&opts.quote_amount, &public_rpc)
            .await;
        for line in report.lines() {
            info!("[DIAG] {line}");
        }
        Some(report)
    } else {
        None
    };

    // Swap -----------------------------------------------------------------
    let mut tx = None;
    if opts.submit_swap {
        let Some(w) = &wallet else {
            anyhow::bail!("SUBMIT_SWAP=1 needs PRIVATE_KEY for a wallet connection");
        };
        let bps = swap::slippage_percent_to_bps(&opts.slippage_percent)?;
        let handle = SwapSubmitter::new(&config)
            .submit(
                w,
                &session,
                &quote,
                &opts.quote_amount,
                bps,
                config.deadline_offset_secs,
            )
            .await?;
        swap::await_confirmation(w, &handle, config.confirmation_timeout).await?;
        tx = Some(handle);
    }

    if opts.json_output {
        let summary = Summary {
            chain_id: network.chain_id,
            chain_name: &network.chain_name,
            native_symbol: &network.native_symbol,
            contract: format!("{:?}", config.contracts.swap_contract),
            wallet: &session,
            wallet_native,
            contract_available_tp: contract_tp,
            price: &price,
            quote: &quote,
            diagnostics: report.as_ref(),
            tx,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
