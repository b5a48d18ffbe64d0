//! Grammar rules, one module per syntactic category.
//!
//! Every rule returns `Result<_, ParseError>`; statement lists catch the
//! error, record it, and resynchronize.

mod expr;
mod stmt;
mod ty;
