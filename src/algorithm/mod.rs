/// Room definitions, pass catalogs and generation groups
pub mod catalog;
/// Multi-pass generation driver
pub mod generator;
/// Pass engine: frontier search, tiers and anti-stall
pub mod pass;
/// Room queue building with subordinate-linked count limits
pub mod queue;
/// Neighbour rulesets mapping contact counts to probabilities
pub mod ruleset;
