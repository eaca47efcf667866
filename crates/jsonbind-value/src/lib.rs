//! # jsonbind-value
//!
//! The in-memory JSON value tree shared by the `jsonbind` parser and
//! conversion engine.
//!
//! A [`Value`] is a tagged union over the six JSON shapes. Numbers are
//! arbitrary-precision decimals ([`BigDecimal`]), never binary floats, so
//! literals such as `0.1` carry no representation error. Objects keep their
//! members in insertion order, which is significant for rendering and for
//! structural equality.
//!
//! The [`render`] module turns a tree back into JSON text. Both rendering
//! and the structural operations on [`Value`] (equality, drop) are
//! implemented iteratively, so arbitrarily deep trees are bounded by heap
//! rather than by the native call stack.

pub mod render;
mod value;

pub use bigdecimal::BigDecimal;
pub use render::{render, render_into, render_pretty, RenderStyle};
pub use value::{Member, Object, Value};
