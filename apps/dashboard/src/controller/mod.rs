//! Controller layer: list state, response normalization, reducer transitions and command dispatch.

pub mod events;
pub mod normalize;
pub mod orchestration;
pub mod reducer;
pub mod state;
