//! # Exploit Simulations
//!
//! Attacks that try to fill the routing table with peers one operator
//! controls. Each test asserts the filter caps the attacker's share.
