//! Tour planner server.
//!
//! Keeps a catalogue of lodging and attractions in a B-tree keyed by id,
//! connects every pair of places in a distance-weighted graph, and answers:
//! "starting here, with this much money and time, which places should I
//! visit?"

pub mod catalog;
pub mod config;
pub mod domain;
pub mod export;
pub mod graph;
pub mod index;
pub mod planner;
pub mod web;
