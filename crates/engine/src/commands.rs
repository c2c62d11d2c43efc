//! Command structs for engine operations.
//!
//! These types group parameters for write operations (item creation, item
//! updates, downtime activities) and the listing filters, keeping call sites
//! readable and avoiding long argument lists.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ItemOrigin, Rarity};

/// Create an item owned by `character_id`.
#[derive(Clone, Debug)]
pub struct NewItemCmd {
    pub character_id: Uuid,
    pub name: String,
    pub rarity: Rarity,
    pub description: String,
    pub flavour: String,
    pub origin: ItemOrigin,
    pub user_id: String,
}

impl NewItemCmd {
    #[must_use]
    pub fn new(
        character_id: Uuid,
        user_id: impl Into<String>,
        name: impl Into<String>,
        rarity: Rarity,
        origin: ItemOrigin,
    ) -> Self {
        Self {
            character_id,
            name: name.into(),
            rarity,
            description: String::new(),
            flavour: String::new(),
            origin,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn flavour(mut self, flavour: impl Into<String>) -> Self {
        self.flavour = flavour.into();
        self
    }
}

/// Partial update of an item's mutable fields. `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub rarity: Option<Rarity>,
    pub description: Option<String>,
    pub flavour: Option<String>,
}

impl ItemPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn flavour(mut self, flavour: impl Into<String>) -> Self {
        self.flavour = Some(flavour.into());
        self
    }
}

/// Filters for [`crate::Engine::list_adverts`]. All set fields must match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertFilter {
    /// Username owning the advertised item.
    pub owner: Option<String>,
    pub character_id: Option<Uuid>,
    /// Case-insensitive prefix of the item name.
    pub search: Option<String>,
    pub rarity: Option<Rarity>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Offers made against the requester's adverts.
    In,
    /// Offers the requester made.
    Out,
    #[default]
    Both,
}

/// Filters for [`crate::Engine::list_offers`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferFilter {
    pub direction: Direction,
    pub character_id: Option<Uuid>,
    pub advert_id: Option<Uuid>,
}

/// Spend downtime to catch up on levels.
#[derive(Clone, Debug)]
pub struct CatchingUpCmd {
    pub character_id: Uuid,
    pub levels: Option<i32>,
    pub details: Option<String>,
    pub user_id: String,
}

impl CatchingUpCmd {
    #[must_use]
    pub fn new(character_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            character_id,
            levels: None,
            details: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn levels(mut self, levels: i32) -> Self {
        self.levels = Some(levels);
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Buy or sell mundane gear. Negative `gold_change_minor` is a purchase.
#[derive(Clone, Debug)]
pub struct MundaneTradeCmd {
    pub character_id: Uuid,
    pub purchased: Option<String>,
    pub sold: Option<String>,
    pub gold_change_minor: i64,
    pub user_id: String,
}

impl MundaneTradeCmd {
    #[must_use]
    pub fn new(character_id: Uuid, user_id: impl Into<String>, gold_change_minor: i64) -> Self {
        Self {
            character_id,
            purchased: None,
            sold: None,
            gold_change_minor,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn purchased(mut self, purchased: impl Into<String>) -> Self {
        self.purchased = Some(purchased.into());
        self
    }

    #[must_use]
    pub fn sold(mut self, sold: impl Into<String>) -> Self {
        self.sold = Some(sold.into());
        self
    }
}

/// Copy spells into a spellbook for a gold and downtime cost.
#[derive(Clone, Debug)]
pub struct SpellbookUpdateCmd {
    pub character_id: Uuid,
    pub gold_cost_minor: i64,
    pub downtime_cost: i64,
    pub dm: Option<String>,
    pub source: Option<String>,
    pub spells: Option<String>,
    pub user_id: String,
}

impl SpellbookUpdateCmd {
    #[must_use]
    pub fn new(
        character_id: Uuid,
        user_id: impl Into<String>,
        gold_cost_minor: i64,
        downtime_cost: i64,
    ) -> Self {
        Self {
            character_id,
            gold_cost_minor,
            downtime_cost,
            dm: None,
            source: None,
            spells: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn dm(mut self, dm: impl Into<String>) -> Self {
        self.dm = Some(dm.into());
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn spells(mut self, spells: impl Into<String>) -> Self {
        self.spells = Some(spells.into());
        self
    }
}

/// Free-form downtime entry with optional balance changes.
#[derive(Clone, Debug)]
pub struct FreeFormCmd {
    pub character_id: Uuid,
    pub title: String,
    pub details: Option<String>,
    pub gold_change_minor: i64,
    pub downtime_change: i64,
    pub auto_apply: bool,
    pub user_id: String,
}

impl FreeFormCmd {
    #[must_use]
    pub fn new(character_id: Uuid, user_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            character_id,
            title: title.into(),
            details: None,
            gold_change_minor: 0,
            downtime_change: 0,
            auto_apply: true,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn gold_change(mut self, gold_change_minor: i64) -> Self {
        self.gold_change_minor = gold_change_minor;
        self
    }

    #[must_use]
    pub fn downtime_change(mut self, downtime_change: i64) -> Self {
        self.downtime_change = downtime_change;
        self
    }

    #[must_use]
    pub fn auto_apply(mut self, auto_apply: bool) -> Self {
        self.auto_apply = auto_apply;
        self
    }
}
