//! Game rules for Conquid.
//!
//! Each move kind is a pure function over a [`Board`](super::Board). Every
//! rule validates fully before touching a cell, so a rejected move leaves the
//! board exactly as it was.

mod capture;
mod claim;
mod conquest;
mod erase;

pub use capture::capture;
pub use claim::claim;
pub use conquest::{Breach, conquest, find_breach};
pub use erase::{check_erase, erase, erase_spots};
