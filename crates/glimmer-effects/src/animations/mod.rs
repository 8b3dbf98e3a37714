//! Stateful renderers.

pub mod particles;
pub mod rain;
