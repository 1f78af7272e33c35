//! Tests for the Undercover game engine, organised by area of the rules.

#![cfg(test)]

pub mod initialization;
pub mod scenarios;
pub mod voting;
