use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    #[default]
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
}

pub mod item {
    use super::*;

    /// Where a new item comes from.
    ///
    /// Timestamps default to the time of the request when omitted.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "event_type", rename_all = "snake_case")]
    pub enum OriginNew {
        Game {
            module: String,
            dm: String,
            played_at: Option<DateTime<Utc>>,
        },
        DmReward {
            name: String,
            hours: i32,
            awarded_at: Option<DateTime<Utc>>,
        },
        /// Created by the requesting user.
        ManualCreation,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub character_id: Uuid,
        pub name: String,
        pub rarity: Rarity,
        pub description: Option<String>,
        pub flavour: Option<String>,
        pub origin: OriginNew,
    }

    /// Fields left out are not changed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemUpdate {
        pub name: Option<String>,
        pub rarity: Option<Rarity>,
        pub description: Option<String>,
        pub flavour: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: Uuid,
        pub character_id: Uuid,
        pub name: String,
        pub rarity: Rarity,
        pub description: String,
        pub flavour: String,
        pub version: i32,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "event_type", rename_all = "snake_case")]
    pub enum OriginView {
        Game {
            module: String,
            dm: String,
            played_at: DateTime<Utc>,
        },
        DmReward {
            name: String,
            hours: i32,
            awarded_at: DateTime<Utc>,
        },
        ManualCreation {
            created_by: String,
            created_at: DateTime<Utc>,
        },
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EditView {
        pub actor: String,
        pub summary: String,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RejectionView {
        pub advert_item_id: Uuid,
        pub offered_item_id: Uuid,
        pub rejected_by: String,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemHistory {
        pub item_id: Uuid,
        pub origin: OriginView,
        pub edits: Vec<EditView>,
        pub trades: Vec<super::trade::TradeView>,
        pub rejections: Vec<RejectionView>,
    }
}

pub mod advert {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdvertNew {
        pub item_id: Uuid,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AdvertUpdate {
        pub description: Option<String>,
    }

    /// Query string of `GET /adverts`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AdvertQuery {
        pub owner: Option<String>,
        pub character: Option<Uuid>,
        pub search: Option<String>,
        pub rarity: Option<Rarity>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AdvertView {
        pub id: Uuid,
        pub item_id: Uuid,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AdvertListing {
        pub advert: AdvertView,
        pub item: super::item::ItemView,
        pub owner: String,
        pub character_name: String,
    }
}

pub mod offer {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Direction {
        In,
        Out,
        #[default]
        Both,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferNew {
        pub advert_id: Uuid,
        pub item_id: Uuid,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OfferUpdate {
        pub description: Option<String>,
    }

    /// Query string of `GET /offers`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OfferQuery {
        pub direction: Option<Direction>,
        pub character: Option<Uuid>,
        pub advert: Option<Uuid>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OfferView {
        pub id: Uuid,
        pub advert_id: Uuid,
        pub item_id: Uuid,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OfferListing {
        pub offer: OfferView,
        pub item: super::item::ItemView,
        pub advert_item: super::item::ItemView,
    }
}

pub mod trade {
    use super::*;

    /// Last path segment of `POST /trade-action/{offer_id}/{action}`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TradeAction {
        Accept,
        Reject,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TradeView {
        pub id: Uuid,
        pub item_id: Uuid,
        pub sender_id: Uuid,
        pub recipient_id: Uuid,
        pub associated_id: Uuid,
        pub occurred_at: DateTime<Utc>,
    }

    /// Outcome of a trade action. `trades` is empty for a rejection.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TradeActionResult {
        pub action: TradeAction,
        pub trades: Vec<TradeView>,
    }
}

pub mod character {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LedgerView {
        pub character_id: Uuid,
        pub name: String,
        pub player: String,
        /// Gold in hundredths of a gold piece.
        pub gold_minor: i64,
        pub downtime: i64,
    }
}

pub mod downtime {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatchingUpNew {
        pub character_id: Uuid,
        pub levels: Option<i32>,
        pub details: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MundaneTradeNew {
        pub character_id: Uuid,
        pub purchased: Option<String>,
        pub sold: Option<String>,
        /// Signed: negative for purchases.
        pub gold_change_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpellbookUpdateNew {
        pub character_id: Uuid,
        pub gold_cost_minor: i64,
        pub downtime_cost: i64,
        pub dm: Option<String>,
        pub source: Option<String>,
        pub spells: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FreeFormNew {
        pub character_id: Uuid,
        pub title: String,
        pub details: Option<String>,
        pub gold_change_minor: Option<i64>,
        pub downtime_change: Option<i64>,
        /// Defaults to `true`.
        pub auto_apply: Option<bool>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "lowercase")]
    pub enum ActivityView {
        CatchingUp {
            id: Uuid,
            character_id: Uuid,
            occurred_at: DateTime<Utc>,
            levels: i32,
            details: Option<String>,
            downtime_cost: i64,
        },
        MundaneTrade {
            id: Uuid,
            character_id: Uuid,
            occurred_at: DateTime<Utc>,
            purchased: Option<String>,
            sold: Option<String>,
            gold_change_minor: i64,
        },
        #[serde(rename = "spellbook")]
        SpellbookUpdate {
            id: Uuid,
            character_id: Uuid,
            occurred_at: DateTime<Utc>,
            gold_cost_minor: i64,
            downtime_cost: i64,
            dm: Option<String>,
            source: Option<String>,
            spells: Option<String>,
        },
        FreeForm {
            id: Uuid,
            character_id: Uuid,
            occurred_at: DateTime<Utc>,
            title: String,
            details: Option<String>,
            gold_change_minor: i64,
            downtime_change: i64,
            auto_apply: bool,
        },
    }
}
