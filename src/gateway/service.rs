//! Gateway operations.
//!
//! Each operation is one remote call plus classification, executed through
//! the failover dispatcher. Transaction pushes additionally wait for the
//! explorer to observe the transaction when running against the registry.

use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::{classify, CoinEstimate, NodeApi, PushOutcome, PushStatus, TransactionHash};
use crate::config::GateConfig;
use crate::confirmation::{ConfirmationWaiter, NotificationBus};
use crate::error::GatewayResult;
use crate::load_balancer::NodeSource;
use crate::resilience::{FailoverDispatcher, OperationMode};

pub struct Gateway {
    api: Arc<dyn NodeApi>,
    dispatcher: FailoverDispatcher,
    waiter: Option<ConfirmationWaiter>,
    confirmation_timeout: Duration,
}

impl Gateway {
    /// Assemble a gateway. `waiter` is only consulted in multi-node mode.
    pub fn new(
        api: Arc<dyn NodeApi>,
        dispatcher: FailoverDispatcher,
        waiter: Option<ConfirmationWaiter>,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            api,
            dispatcher,
            waiter,
            confirmation_timeout,
        }
    }

    /// Build from validated configuration. Mode and scheme are fixed here.
    pub fn from_config(
        config: &GateConfig,
        api: Arc<dyn NodeApi>,
        nodes: Option<Arc<dyn NodeSource>>,
        bus: Arc<NotificationBus>,
    ) -> Result<Self, url::ParseError> {
        let dispatcher = FailoverDispatcher::new(
            config.mode(),
            config.primary_url()?,
            config.node.secure,
            nodes,
        );
        let waiter = match dispatcher.mode() {
            OperationMode::MultiNode => Some(ConfirmationWaiter::new(bus)),
            OperationMode::SingleNode => None,
        };
        Ok(Self::new(api, dispatcher, waiter, config.confirmation.timeout()))
    }

    pub fn mode(&self) -> OperationMode {
        self.dispatcher.mode()
    }

    /// Submit a signed transaction.
    ///
    /// In multi-node mode the call returns only once the transaction is
    /// confirmed, or fails with `Timeout` carrying the hash.
    pub async fn push_transaction(&self, raw_tx: &str) -> GatewayResult<PushOutcome> {
        let result = self
            .dispatcher
            .dispatch("push_transaction", |url| async move {
                classify(self.api.push_transaction(&url, raw_tx).await?)
            })
            .await?;
        let hash = TransactionHash::from_node_hash(&result.hash);
        tracing::info!(hash = %hash, "Transaction accepted by node");

        match (self.mode(), &self.waiter) {
            (OperationMode::MultiNode, Some(waiter)) => {
                let confirmed = waiter.await_confirmation(&hash, self.confirmation_timeout).await?;
                Ok(PushOutcome {
                    hash: confirmed.hash,
                    status: PushStatus::Confirmed,
                })
            }
            _ => Ok(PushOutcome {
                hash,
                status: PushStatus::Submitted,
            }),
        }
    }

    /// Commission for a signed transaction.
    pub async fn estimate_fee(&self, raw_tx: &str) -> GatewayResult<String> {
        let result = self
            .dispatcher
            .dispatch("estimate_tx", |url| async move {
                classify(self.api.estimate_tx(&url, raw_tx).await?)
            })
            .await?;
        Ok(result.commission)
    }

    /// Amount of `coin_to_sell` needed to buy `value` of `coin_to_buy`.
    pub async fn estimate_coin_buy(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GatewayResult<CoinEstimate> {
        let result = self
            .dispatcher
            .dispatch("estimate_coin_buy", |url| async move {
                classify(
                    self.api
                        .estimate_coin_buy(&url, coin_to_sell, coin_to_buy, value)
                        .await?,
                )
            })
            .await?;
        Ok(result.into())
    }

    /// Amount of `coin_to_buy` received for selling `value` of `coin_to_sell`.
    pub async fn estimate_coin_sell(
        &self,
        coin_to_sell: &str,
        coin_to_buy: &str,
        value: &str,
    ) -> GatewayResult<CoinEstimate> {
        let result = self
            .dispatcher
            .dispatch("estimate_coin_sell", |url| async move {
                classify(
                    self.api
                        .estimate_coin_sell(&url, coin_to_sell, coin_to_buy, value)
                        .await?,
                )
            })
            .await?;
        Ok(result.into())
    }

    /// Transaction count of `address`, used as its next nonce.
    pub async fn get_nonce(&self, address: &str) -> GatewayResult<String> {
        let result = self
            .dispatcher
            .dispatch("get_address", |url| async move {
                classify(self.api.get_address(&url, address).await?)
            })
            .await?;
        Ok(result.transaction_count)
    }
}
