//! `librtiny` is the library that powers the rtiny interpreter.
//!
//! `rtiny` is a front end for a small `let ... in ... end` expression
//! language. It scans source into tokens and then parses with a recursive
//! descent parser that can run in one of two modes:
//! - the evaluating mode computes each block's value while parsing, looking
//!   identifiers up in a symbol table as they are consumed
//! - the tree-building mode consumes the same grammar but produces `Block`
//!   syntax trees, which `Interpreter` evaluates afterwards
//!
//! Both modes accept and reject exactly the same programs; they differ only
//! in when evaluation errors (undefined identifiers, division by zero)
//! surface.
#![warn(clippy::pedantic)]

pub mod core;
