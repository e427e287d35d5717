//! Inventory movement rules and low-stock detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Default minimum quantity for a new inventory row.
pub const DEFAULT_MINIMUM_QUANTITY: i32 = 5;

/// Largest quantity, in either direction, a single movement may carry.
pub const MAX_MOVEMENT_QUANTITY: i32 = 1_000_000;

/// Kind of stock movement. Stored as the upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Stock received into a warehouse.
    Entry,
    /// Stock leaving a warehouse.
    Exit,
    /// Stock moved from one warehouse to another.
    Transfer,
    /// Manual correction, positive or negative.
    Adjustment,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "ENTRY",
            Self::Exit => "EXIT",
            Self::Transfer => "TRANSFER",
            Self::Adjustment => "ADJUSTMENT",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTRY" => Ok(Self::Entry),
            "EXIT" => Ok(Self::Exit),
            "TRANSFER" => Ok(Self::Transfer),
            "ADJUSTMENT" => Ok(Self::Adjustment),
            other => Err(format!("Unknown movement kind: {other}")),
        }
    }
}

/// Stock deltas produced by a valid movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    /// Applied to the source warehouse row.
    pub source_delta: i32,
    /// Applied to the destination warehouse row (transfers only).
    pub destination_delta: i32,
}

/// Validate a movement against the current stock of the source row.
///
/// `quantity` is signed only for adjustments; every other kind requires a
/// positive quantity. Exits, transfers and negative adjustments may not take
/// stock below zero, and no movement may push a row past `i32::MAX`.
pub fn plan_movement(
    kind: MovementKind,
    quantity: i32,
    current_stock: i32,
    source_warehouse: DbId,
    destination_warehouse: Option<DbId>,
) -> Result<StockChange, String> {
    if quantity.unsigned_abs() > MAX_MOVEMENT_QUANTITY.unsigned_abs() {
        return Err(format!("A movement cannot exceed {MAX_MOVEMENT_QUANTITY} units"));
    }

    match kind {
        MovementKind::Entry => {
            require_positive(kind, quantity)?;
            require_room(quantity, current_stock)?;
            Ok(StockChange {
                source_delta: quantity,
                destination_delta: 0,
            })
        }
        MovementKind::Exit => {
            require_positive(kind, quantity)?;
            require_available(quantity, current_stock)?;
            Ok(StockChange {
                source_delta: -quantity,
                destination_delta: 0,
            })
        }
        MovementKind::Transfer => {
            require_positive(kind, quantity)?;
            match destination_warehouse {
                None => return Err("A transfer requires a destination warehouse".to_string()),
                Some(dest) if dest == source_warehouse => {
                    return Err(
                        "Destination warehouse must differ from the source warehouse".to_string(),
                    )
                }
                Some(_) => {}
            }
            require_available(quantity, current_stock)?;
            Ok(StockChange {
                source_delta: -quantity,
                destination_delta: quantity,
            })
        }
        MovementKind::Adjustment => {
            if quantity == 0 {
                return Err("An adjustment quantity cannot be zero".to_string());
            }
            // Bounded above, so the negation cannot overflow.
            if quantity < 0 {
                require_available(-quantity, current_stock)?;
            } else {
                require_room(quantity, current_stock)?;
            }
            Ok(StockChange {
                source_delta: quantity,
                destination_delta: 0,
            })
        }
    }
}

fn require_positive(kind: MovementKind, quantity: i32) -> Result<(), String> {
    if quantity <= 0 {
        return Err(format!("{kind} quantity must be greater than 0"));
    }
    Ok(())
}

fn require_available(requested: i32, current_stock: i32) -> Result<(), String> {
    if requested > current_stock {
        return Err(format!(
            "Insufficient stock: {current_stock} available, {requested} requested"
        ));
    }
    Ok(())
}

fn require_room(added: i32, current_stock: i32) -> Result<(), String> {
    if current_stock.checked_add(added).is_none() {
        return Err(format!(
            "Stock cannot exceed {} units in one warehouse",
            i32::MAX
        ));
    }
    Ok(())
}

/// A row is low on stock once its quantity reaches the minimum.
pub fn is_low_stock(quantity: i32, minimum_quantity: i32) -> bool {
    quantity <= minimum_quantity
}
