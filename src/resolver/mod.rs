// src/resolver/mod.rs
pub mod account;
pub mod origin;

pub use account::AccountResolver;
pub use origin::OriginResolver;
