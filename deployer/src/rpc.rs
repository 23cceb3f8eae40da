// deployer/src/rpc.rs
// The RPC capabilities the deployment pipeline calls into, and the ethers-backed implementation.

use crate::error::BoxError;
use crate::gas::GasPlan;
use ethers::{
    abi::Abi,
    providers::Middleware,
    types::{Address, BlockNumber, Bytes, TransactionReceipt, TransactionRequest, TxHash, U256},
};
use std::{sync::Arc, time::Duration};
use tokio::time::{sleep, timeout};
use tracing::{debug, instrument, trace, warn};

/// Latest-block fields the gas planner needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlock {
    pub number: u64,
    pub gas_limit: U256,
}

/// Connected RPC client as seen by the pipeline.
///
/// Transport, JSON-RPC encoding and signing all live behind this trait.
#[allow(async_fn_in_trait)]
pub trait DeploymentRpc {
    async fn get_chain_id(&self) -> Result<U256, BoxError>;

    async fn get_balance(&self, account: Address) -> Result<U256, BoxError>;

    async fn get_transaction_count(&self, account: Address) -> Result<U256, BoxError>;

    async fn get_latest_block(&self) -> Result<LatestBlock, BoxError>;

    async fn get_gas_price(&self) -> Result<U256, BoxError>;

    /// Signs and broadcasts a contract-creation transaction. Returns as soon as
    /// the node has accepted it; does not wait for inclusion.
    async fn deploy_contract(
        &self,
        abi: &Abi,
        bytecode: &Bytes,
        plan: &GasPlan,
        nonce: U256,
        account: Address,
    ) -> Result<TxHash, BoxError>;

    /// Waits up to `wait` for a receipt. `Ok(None)` means the wait elapsed.
    async fn wait_for_transaction_receipt(
        &self,
        tx_hash: TxHash,
        wait: Duration,
    ) -> Result<Option<TransactionReceipt>, BoxError>;
}

/// [`DeploymentRpc`] over any ethers middleware stack. In the binary this is a
/// `SignerMiddleware<Provider<Http>, LocalWallet>`, which signs locally.
#[derive(Debug)]
pub struct EthersRpc<M> {
    client: Arc<M>,
    poll_interval: Duration,
}

impl<M> EthersRpc<M> {
    pub fn new(client: Arc<M>, poll_interval: Duration) -> Self {
        Self { client, poll_interval }
    }

    pub fn client(&self) -> &Arc<M> {
        &self.client
    }
}

impl<M> DeploymentRpc for EthersRpc<M>
where
    M: Middleware + 'static,
    <M as Middleware>::Error: 'static,
{
    async fn get_chain_id(&self) -> Result<U256, BoxError> {
        Ok(self.client.get_chainid().await?)
    }

    async fn get_balance(&self, account: Address) -> Result<U256, BoxError> {
        Ok(self.client.get_balance(account, None).await?)
    }

    async fn get_transaction_count(&self, account: Address) -> Result<U256, BoxError> {
        Ok(self.client.get_transaction_count(account, None).await?)
    }

    async fn get_latest_block(&self) -> Result<LatestBlock, BoxError> {
        let block = self
            .client
            .get_block(BlockNumber::Latest)
            .await?
            .ok_or("node returned no latest block")?;
        Ok(LatestBlock {
            number: block.number.map(|n| n.as_u64()).unwrap_or_default(),
            gas_limit: block.gas_limit,
        })
    }

    async fn get_gas_price(&self) -> Result<U256, BoxError> {
        Ok(self.client.get_gas_price().await?)
    }

    #[instrument(skip(self, abi, bytecode), level = "debug", fields(code_len = bytecode.len()))]
    async fn deploy_contract(
        &self,
        abi: &Abi,
        bytecode: &Bytes,
        plan: &GasPlan,
        nonce: U256,
        account: Address,
    ) -> Result<TxHash, BoxError> {
        if abi.constructor().is_some_and(|c| !c.inputs.is_empty()) {
            return Err("constructor arguments are not supported".into());
        }
        // No `to`: contract creation. Legacy pricing so the planned price is exactly what is paid per unit.
        let tx = TransactionRequest::new()
            .from(account)
            .data(bytecode.clone())
            .gas(plan.limit)
            .gas_price(plan.price)
            .nonce(nonce);
        let pending = self.client.send_transaction(tx, None).await?;
        let tx_hash = pending.tx_hash();
        debug!(?tx_hash, "Deployment transaction accepted by node.");
        Ok(tx_hash)
    }

    #[instrument(skip(self), level = "debug")]
    async fn wait_for_transaction_receipt(
        &self,
        tx_hash: TxHash,
        wait: Duration,
    ) -> Result<Option<TransactionReceipt>, BoxError> {
        let poll = async {
            loop {
                match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => trace!(?tx_hash, "Receipt not available yet."),
                    // The transaction may still be pending; keep polling until the deadline.
                    Err(e) => warn!(?tx_hash, error = %e, "Receipt poll failed; retrying."),
                }
                sleep(self.poll_interval).await;
            }
        };
        Ok(timeout(wait, poll).await.ok())
    }
}
