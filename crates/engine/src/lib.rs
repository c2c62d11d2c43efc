//! Economy and trading engine for a tabletop campaign.
//!
//! Characters hold gold and downtime, own magic items with an auditable
//! provenance, barter those items through adverts and offers, and spend their
//! balances on downtime activities. All writes go through [`Engine`], which
//! runs each operation inside one database transaction.

pub use activities::{
    ActivityKind, CatchingUp, DowntimeActivity, FreeForm, MundaneTrade, SpellbookUpdate,
};
pub use adverts::Advert;
pub use characters::Character;
pub use commands::{
    AdvertFilter, CatchingUpCmd, Direction, FreeFormCmd, ItemPatch, MundaneTradeCmd, NewItemCmd,
    OfferFilter, SpellbookUpdateCmd,
};
pub use edits::Edit;
pub use error::EngineError;
pub use items::{Item, Rarity};
pub use offers::Offer;
pub use ops::{AdvertListing, EconomyConfig, Engine, EngineBuilder, OfferListing};
pub use origins::{DmRewardOrigin, GameOrigin, ItemOrigin, ManualCreation};
pub use provenance::ItemHistory;
pub use rejections::Rejection;
pub use resource::{Delta, Ledger, Resource};
pub use trades::{Trade, TradeLeg};

mod activities;
mod adverts;
mod characters;
mod commands;
mod edits;
mod error;
mod items;
pub mod ledger;
mod offers;
mod ops;
mod origins;
pub mod provenance;
mod rejections;
mod resource;
mod trades;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
