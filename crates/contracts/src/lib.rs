//! Data contracts shared between the category tree engine and its hosts.

pub mod domain;
