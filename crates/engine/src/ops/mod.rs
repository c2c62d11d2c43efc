use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod characters;
mod downtime;
mod exchange;
mod items;
mod market;

pub use market::{AdvertListing, OfferListing};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Prices that are fixed by the campaign rather than chosen by players.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EconomyConfig {
    /// Downtime each side pays when a trade is accepted.
    pub trade_fee: i64,
    /// Downtime spent by one catching-up activity.
    pub catching_up_cost: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            trade_fee: 5,
            catching_up_cost: 10,
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    economy: EconomyConfig,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn economy(&self) -> EconomyConfig {
        self.economy
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    economy: EconomyConfig,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn economy(mut self, economy: EconomyConfig) -> EngineBuilder {
        self.economy = economy;
        self
    }

    pub fn trade_fee(mut self, trade_fee: i64) -> EngineBuilder {
        self.economy.trade_fee = trade_fee;
        self
    }

    pub fn catching_up_cost(mut self, catching_up_cost: i64) -> EngineBuilder {
        self.economy.catching_up_cost = catching_up_cost;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.economy.trade_fee < 0 || self.economy.catching_up_cost < 0 {
            return Err(EngineError::InvalidAmount(
                "economy prices must be >= 0".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            economy: self.economy,
        })
    }
}
