//! Board entities as served by the remote board API

use super::ids::{BoardId, ItemId};
use super::item::OrderedItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A list (column) on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardList {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    pub pos: f64,
    pub id_board: BoardId,
}

/// A card inside a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub pos: f64,
    pub id_list: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_complete: bool,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badges: Option<Badges>,
    #[serde(default)]
    pub id_members: Vec<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub date_last_activity: DateTime<Utc>,
}

/// A coloured card label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Card counters; only the checklist ones are used here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badges {
    #[serde(default)]
    pub check_items: u32,
    #[serde(default)]
    pub check_items_checked: u32,
}

/// A board member assigned to a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub username: String,
}

impl Member {
    /// Full name when present, username otherwise
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

impl From<&BoardList> for OrderedItem {
    fn from(list: &BoardList) -> Self {
        OrderedItem::new(list.id.clone(), list.pos)
    }
}

impl From<&Card> for OrderedItem {
    fn from(card: &Card) -> Self {
        OrderedItem::new(card.id.clone(), card.pos)
    }
}
