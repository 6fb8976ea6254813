//! Identity gate, accounts, profiles, and onboarding.

pub mod gate;
pub mod hasher;
pub mod onboarding;
pub mod profile;
pub mod repository;
pub mod service;
