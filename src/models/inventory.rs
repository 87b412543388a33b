// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Permanent,
    Staples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Middle,
    High,
}

// Lifecycle status. Only the checkout/checkin state machine may move an item
// in or out of CheckedOut; NeedsRepair is flagged through the administrative
// update and has no automatic way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    CheckedOut,
    NeedsRepair,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub side: Side,
    pub level: Level,
    pub status: ItemStatus,
    // Assigned once at creation, globally unique, never reused.
    pub qr_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Shelf position, written on the wire as "side-level" (e.g. "left-high").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfLocation {
    pub side: Side,
    pub level: Level,
}

impl FromStr for ShelfLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, level) = s
            .split_once('-')
            .ok_or_else(|| format!("'{s}' is not a 'side-level' location"))?;
        let side = match side {
            "left" => Side::Left,
            "right" => Side::Right,
            other => return Err(format!("'{other}' is not a valid side")),
        };
        let level = match level {
            "low" => Level::Low,
            "middle" => Level::Middle,
            "high" => Level::High,
            other => return Err(format!("'{other}' is not a valid level")),
        };
        Ok(ShelfLocation { side, level })
    }
}

impl fmt::Display for ShelfLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::Left => "left",
            Side::Right => "right",
        };
        let level = match self.level {
            Level::Low => "low",
            Level::Middle => "middle",
            Level::High => "high",
        };
        write!(f, "{side}-{level}")
    }
}

// Optional list filters, combined with AND when several are present.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<Category>,
    pub status: Option<ItemStatus>,
    pub location: Option<ShelfLocation>,
    pub search: Option<String>,
}
