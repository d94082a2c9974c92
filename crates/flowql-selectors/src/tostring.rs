// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::ast::{
    Combinator, ComplexSelector, ComplexSelectorList, CompoundSelector, KindAlias, NumericOp,
    PathSegment, PropertyPath, PseudoClass, SimpleSelector, StringOp,
};

/// Renders an AST node back to selector source text. Round-tripping through
/// `parse` and `to_selector_string` twice must produce the same string both
/// times (Testable Property 1).
pub trait ToSelectorString {
    fn to_selector_string(&self) -> String;
}

impl ToSelectorString for ComplexSelectorList {
    fn to_selector_string(&self) -> String {
        self.items
            .iter()
            .map(ToSelectorString::to_selector_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ToSelectorString for ComplexSelector {
    fn to_selector_string(&self) -> String {
        let mut out = self.first.to_selector_string();
        for (combinator, compound) in &self.rest {
            out.push_str(combinator.to_selector_string());
            out.push_str(&compound.to_selector_string());
        }
        out
    }
}

impl Combinator {
    fn to_selector_string(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        }
    }
}

impl ToSelectorString for CompoundSelector {
    fn to_selector_string(&self) -> String {
        self.simples.iter().map(ToSelectorString::to_selector_string).collect()
    }
}

impl ToSelectorString for PropertyPath {
    fn to_selector_string(&self) -> String {
        let mut out = String::new();
        if self.metadata {
            out.push('@');
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&segment.name);
            if segment.invoke {
                out.push_str("()");
            }
        }
        out
    }
}

impl PathSegment {
    pub fn new(name: impl Into<String>, invoke: bool) -> Self {
        Self { name: name.into(), invoke }
    }
}

impl StringOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Contains => "*=",
            Self::StartsWith => "^=",
            Self::EndsWith => "$=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
        }
    }
}

impl NumericOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        }
    }
}

impl KindAlias {
    fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Method => "method",
            Self::Property => "property",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Namespace => "namespace",
            Self::Lambda => "lambda",
        }
    }
}

fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

impl ToSelectorString for SimpleSelector {
    fn to_selector_string(&self) -> String {
        match self {
            Self::Type(name) => name.clone(),
            Self::UniversalType => "*".to_string(),
            Self::Id(name) => format!("#{name}"),
            Self::Class(name) => format!(".{name}"),
            Self::PropertyName(path) => format!("[{}]", path.to_selector_string()),
            Self::PropertyStringMatch { path, op, literal, case_insensitive, negate } => {
                let mut out = format!(
                    "[{}{}{}{}",
                    path.to_selector_string(),
                    if *negate { "!" } else { "" },
                    op.symbol(),
                    quote_literal(literal)
                );
                if *case_insensitive {
                    out.push_str(" i");
                }
                out.push(']');
                out
            }
            Self::PropertyNumericMatch { path, op, value } => {
                format!("[{}{}{}]", path.to_selector_string(), op.symbol(), value)
            }
            Self::PseudoClass(pseudo) => pseudo.to_selector_string(),
            Self::KindAlias(alias) => format!(":{}", alias.keyword()),
        }
    }
}

impl ToSelectorString for PseudoClass {
    fn to_selector_string(&self) -> String {
        match self {
            Self::Not(inner) => format!(":not({})", inner.to_selector_string()),
            Self::Is(list) => format!(":is({})", list.to_selector_string()),
            Self::Where(list) => format!(":where({})", list.to_selector_string()),
            Self::Has(list) => format!(":has({})", list.to_selector_string()),
            Self::Implements(list) => format!(":implements({})", list.to_selector_string()),
            Self::NthChild(nth) => format!(":nth-child({})", nth.to_selector_string()),
            Self::NthLastChild(nth) => format!(":nth-last-child({})", nth.to_selector_string()),
            Self::NthOfType(nth) => format!(":nth-of-type({})", nth.to_selector_string()),
            Self::NthLastOfType(nth) => {
                format!(":nth-last-of-type({})", nth.to_selector_string())
            }
            Self::FirstChild => ":first-child".to_string(),
            Self::LastChild => ":last-child".to_string(),
            Self::OnlyChild => ":only-child".to_string(),
            Self::OnlyOfType => ":only-of-type".to_string(),
            Self::Empty => ":empty".to_string(),
            Self::Scope => ":scope".to_string(),
            Self::Root => ":root".to_string(),
            Self::Capture(alias, path) => match path {
                Some(path) => format!(":capture({alias}, {})", path.to_selector_string()),
                None => format!(":capture({alias})"),
            },
        }
    }
}
