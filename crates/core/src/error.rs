use thiserror::Error;

use crate::types::{MapId, Pos};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HallwayError {
    #[error("no wall on the border can be opened into a hallway")]
    NoOpening,
    #[error("map already has a hallway back to its parent")]
    ParentAlreadySet,
    #[error("hallway at {pos:?} does not exist on map {map:?}")]
    Missing { map: MapId, pos: Pos },
    #[error("hallways do not point at each other or share a side")]
    PairingMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("lock `{0}` is already on this hallway")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyPlacementError {
    #[error("keys only gate hallways that lead away from the root")]
    NotParentSide,
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("no free tile far enough from this map's child hallways")]
    NoCandidate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    #[error("hallway is not on the active map")]
    NotOnActiveMap,
    #[error("hallway is locked")]
    Locked,
    #[error("arrival tile {0:?} is occupied")]
    ArrivalBlocked(Pos),
}
