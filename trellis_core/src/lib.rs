//! Core types shared by the trellis shape runtime.
//!
//! This crate provides:
//! - Interned property names with canonical identity
//! - A pluggable name hash, so hosts and tests can control collisions

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod intern;

pub use intern::{InternedString, Interner, intern};
