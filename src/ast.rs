//! # SQI Expression Language - Syntax and Evaluation Trees
//!
//! This module defines the data structures an expression passes through on
//! its way from text to something that can be evaluated.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Token kinds, the static binding-power table and keywords
//! - **[syntax]** - Arena-backed parse tree produced by the parser
//! - **[expressions]** - Immutable evaluation tree ([`Ast`]) and literals
//! - **[operators]** - Binary operators
//!
//! ## Quick Start
//!
//! ```text
//! /Children/(/Name == "c")
//! ```
//!
//! Navigates to `Children` and keeps only the elements whose `Name` is `"c"`.
//!
//! ## Core Concepts
//!
//! ### Paths
//!
//! A `/` followed by a segment reads a field of the current value. Segments
//! chain left to right:
//!
//! ```text
//! /Mom/Name
//! /"a/b"        // quoted: a single field named `a/b`
//! ```
//!
//! ### Indexing
//!
//! ```text
//! /Children[1]/Name
//! [0]           // index the current value directly
//! ```
//!
//! ### Comparisons
//!
//! `==`, `!=`, `&&` and `||`. When a comparison is the last segment of a path
//! it becomes a filter over the collection that path produced:
//!
//! ```text
//! /Age == 22 && /Name == "Ana"      // boolean
//! /Children/(/Age == 3)              // filtered collection
//! ```
//!
//! ### Bare words
//!
//! Unquoted words and numbers are field names inside paths and constants
//! everywhere else:
//!
//! ```text
//! /Mom/Name == Ana
//! ```
pub mod expressions;
pub mod operators;
pub mod syntax;
pub mod tokens;

pub use expressions::{Ast, Literal};
pub use operators::BinOp;
pub use syntax::{NodeId, SyntaxNode, SyntaxTree};
pub use tokens::{InfixRule, PrefixRule, Symbol, Token, TokenInfo};
