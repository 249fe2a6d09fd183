//! # tripsim API
//!
//! actix-web REST endpoints over a shared [`Recommender`](tripsim_similarity::Recommender).

pub mod rest;

pub use rest::{RecommendLimits, RestApi};
