//! SeaORM entity definitions

pub mod drama;
pub mod user;
