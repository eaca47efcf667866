//! A streaming JSON text processor and object-mapping engine.
//!
//! The crate has two halves:
//!
//! - [`parse`] turns JSON text into [`Value`] trees with an explicit-stack
//!   state machine, so document depth is limited by memory rather than the
//!   native call stack.
//! - [`convert`] maps [`Value`] trees to and from host object graphs through
//!   ordered chains of pluggable capabilities, backed by compiled property
//!   bindings registered up front.
//!
//! # Example
//!
//! ```
//! use jsonbind::convert::ConversionContext;
//! use jsonbind::{parse_str, render};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! let ctx = ConversionContext::builder().install_defaults().build();
//! ctx.bindings().register::<Point, _>("Point", |set| {
//!     set.required("x", |p: &Point| p.x, |p, v| p.x = v)
//!         .required("y", |p: &Point| p.y, |p, v| p.y = v)
//!         .instantiate_default()
//! });
//!
//! let value = parse_str(r#"{"x":1,"y":2}"#)?;
//! let point: Point = ctx.deserialize(&value)?;
//! assert_eq!((point.x, point.y), (1, 2));
//! assert_eq!(render(&ctx.serialize(&point)?), r#"{"x":1,"y":2}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod convert;
mod error;
pub mod parse;

pub use error::{ConversionError, ConversionErrorKind, ParseError, ParseErrorKind};
pub use jsonbind_value::{
    render, render_into, render_pretty, BigDecimal, Member, Object, RenderStyle, Value,
};
pub use parse::{
    parse_reader, parse_reader_with_encoding, parse_str, ParseOptions, Parser, TextEncoding,
};
