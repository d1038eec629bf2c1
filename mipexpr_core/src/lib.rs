//! Core rust implementation of mipexpr, a polynomial expression algebra for building
//! mixed integer programming models.

pub mod configuration;
pub mod expr;
pub mod optimize;
