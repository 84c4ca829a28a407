//! Z-index component for layer render ordering.
//!
//! Members of a [`Layer`](super::layer::Layer) render list are drawn sorted by
//! [`ZIndex`]; nodes without one count as 0 and ties keep list order.

use bevy_ecs::prelude::Component;

/// Higher values are drawn later (on top).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
