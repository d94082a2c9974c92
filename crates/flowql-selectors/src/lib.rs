// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hand-written recursive-descent parser for the FlowQL selector
//! language: a CSS4 subset plus property-path attribute matchers, numeric
//! comparisons, and `:capture`.
//!
//! This crate only parses; it has no notion of a syntax tree or how to
//! evaluate a selector against one (see `flowql-matcher` for that). It
//! models the grammar as a tagged-variant AST (§9 "Polymorphism over
//! inheritance") rather than a class hierarchy per combinator family.

mod ast;
mod error;
mod nth;
mod parser;
mod tostring;

pub use ast::{
    Combinator, ComplexSelector, ComplexSelectorList, CompoundSelector, KindAlias, NumericOp,
    PathSegment, PropertyPath, PseudoClass, SimpleSelector, StringOp,
};
pub use error::ParseError;
pub use nth::Nth;
pub use parser::parse;
pub use tostring::ToSelectorString;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_is_idempotent() {
        let samples = [
            ":class",
            ".foo > .bar",
            ":method[Name='Get']",
            ":class:not([Modifiers='abstract'])",
            ":class :method[Name^='Get'][@status < 400]",
            ":class:nth-child(2n+1)",
            ":class:capture(id, Symbol.Name)",
            "a, b > c",
        ];
        for sample in samples {
            let first = parse(sample).unwrap_or_else(|e| panic!("{sample}: {e}"));
            let once = first.to_selector_string();
            let second = parse(&once).unwrap_or_else(|e| panic!("{once}: {e}"));
            let twice = second.to_selector_string();
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }
}
