//! Core data structures for the Ganadero engines.

pub mod animal;
pub mod breed;
pub mod climate;
pub mod feed;
pub mod record;
pub mod scale;
