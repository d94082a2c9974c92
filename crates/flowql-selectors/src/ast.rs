// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::Nth;

/// Top-level disjunction: `<complex-selector-list> = <complex-selector> ("," <complex-selector>)*`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComplexSelectorList {
    pub items: Vec<ComplexSelector>,
}

/// A left-to-right chain of compounds joined by combinators, with an
/// implicit terminal compound (`first` is the left-most, matched last
/// during right-to-left evaluation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

/// A conjunction of simple selectors matched at a single node. Must be
/// non-empty per the grammar.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    /// Implicit whitespace combinator: some transitive ancestor matches.
    Descendant,
    /// `>`: immediate parent matches.
    Child,
    /// `+`: immediately preceding sibling matches.
    NextSibling,
    /// `~`: some preceding sibling matches.
    SubsequentSibling,
}

/// One segment of a dotted property path, e.g. `Symbol` or `Name()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSegment {
    pub name: String,
    /// Whether this segment was written with a trailing `()`, requesting
    /// zero-arg method invocation during resolution (§4.2).
    pub invoke: bool,
}

/// A dotted property-name chain, optionally addressing metadata/captures
/// via a leading `@` (§4.1 "Path").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyPath {
    pub metadata: bool,
    pub segments: Vec<PathSegment>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    Includes,
    DashMatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericOp {
    Equals,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindAlias {
    Class,
    Method,
    Property,
    Interface,
    Struct,
    Namespace,
    Lambda,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleSelector {
    Type(String),
    UniversalType,
    Id(String),
    Class(String),
    PropertyName(PropertyPath),
    PropertyStringMatch {
        path: PropertyPath,
        op: StringOp,
        literal: String,
        case_insensitive: bool,
        negate: bool,
    },
    PropertyNumericMatch {
        path: PropertyPath,
        op: NumericOp,
        value: i64,
    },
    PseudoClass(PseudoClass),
    KindAlias(KindAlias),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoClass {
    Not(Box<CompoundSelector>),
    Is(ComplexSelectorList),
    Where(ComplexSelectorList),
    Has(ComplexSelectorList),
    Implements(ComplexSelectorList),
    NthChild(Nth),
    NthLastChild(Nth),
    NthOfType(Nth),
    NthLastOfType(Nth),
    FirstChild,
    LastChild,
    OnlyChild,
    OnlyOfType,
    Empty,
    Scope,
    Root,
    /// `capture(alias[, propertyPath])`.
    Capture(String, Option<PropertyPath>),
}
