// src/lib.rs

pub mod export;
pub mod inspect;
pub mod normalize;
pub mod pipeline;
pub mod sample;
pub mod schema;
