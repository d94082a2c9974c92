// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::ast::{
    Combinator, ComplexSelector, ComplexSelectorList, CompoundSelector, KindAlias, NumericOp,
    PathSegment, PropertyPath, PseudoClass, SimpleSelector, StringOp,
};
use crate::error::ParseError;
use crate::nth::Nth;

/// Parses a complex-selector-list (§4.1 grammar entry point).
pub fn parse(text: &str) -> Result<ComplexSelectorList, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut cursor = Cursor { chars: &chars, pos: 0 };
    let list = cursor.parse_selector_list()?;
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(cursor.error("unexpected trailing input"));
    }
    Ok(list)
}

struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(message, self.pos, self.chars)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn has_ws_ahead(&self) -> bool {
        matches!(self.peek(), Some(c) if c.is_whitespace())
    }

    fn eat(&mut self, literal: &str) -> bool {
        let lit_chars: Vec<char> = literal.chars().collect();
        if self.chars[self.pos..].starts_with(lit_chars.as_slice()) {
            self.pos += lit_chars.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, literal: &str) -> Result<(), ParseError> {
        if self.eat(literal) {
            Ok(())
        } else {
            Err(self.error(format!("expected {literal:?}")))
        }
    }

    fn is_ident_start(c: char) -> bool {
        c.is_alphabetic() || c == '_'
    }

    fn is_ident_continue(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '-'
    }

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if Self::is_ident_start(c) => self.pos += 1,
            _ => return Err(self.error("expected identifier")),
        }
        while matches!(self.peek(), Some(c) if Self::is_ident_continue(c)) {
            self.pos += 1;
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_selector_list(&mut self) -> Result<ComplexSelectorList, ParseError> {
        let mut items = vec![self.parse_complex_selector()?];
        loop {
            self.skip_ws();
            if self.eat(",") {
                self.skip_ws();
                items.push(self.parse_complex_selector()?);
            } else {
                break;
            }
        }
        Ok(ComplexSelectorList { items })
    }

    fn parse_complex_selector(&mut self) -> Result<ComplexSelector, ParseError> {
        let first = self.parse_compound_selector()?;
        let mut rest = Vec::new();
        loop {
            let had_ws = self.has_ws_ahead();
            let checkpoint = self.pos;
            self.skip_ws();
            let combinator = if self.eat(">") {
                self.skip_ws();
                Some(Combinator::Child)
            } else if self.eat("+") {
                self.skip_ws();
                Some(Combinator::NextSibling)
            } else if self.eat("~") {
                self.skip_ws();
                Some(Combinator::SubsequentSibling)
            } else if had_ws && self.starts_compound() {
                Some(Combinator::Descendant)
            } else {
                None
            };
            let Some(combinator) = combinator else {
                self.pos = checkpoint;
                break;
            };
            if !self.starts_compound() {
                return Err(self.error("expected compound selector after combinator"));
            }
            let compound = self.parse_compound_selector()?;
            rest.push((combinator, compound));
        }
        Ok(ComplexSelector { first, rest })
    }

    fn starts_compound(&self) -> bool {
        matches!(self.peek(), Some(c) if c == '*' || c == '#' || c == '.' || c == '[' || c == ':' || Self::is_ident_start(c))
    }

    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut simples = Vec::new();
        while let Some(simple) = self.try_parse_simple_selector()? {
            simples.push(simple);
        }
        if simples.is_empty() {
            return Err(self.error("expected a simple selector"));
        }
        Ok(CompoundSelector { simples })
    }

    fn try_parse_simple_selector(&mut self) -> Result<Option<SimpleSelector>, ParseError> {
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                Ok(Some(SimpleSelector::UniversalType))
            }
            Some('#') => {
                self.pos += 1;
                Ok(Some(SimpleSelector::Id(self.parse_ident()?)))
            }
            Some('.') => {
                self.pos += 1;
                Ok(Some(SimpleSelector::Class(self.parse_ident()?)))
            }
            Some('[') => Ok(Some(self.parse_attribute_selector()?)),
            Some(':') => Ok(Some(self.parse_pseudo_or_alias()?)),
            Some(c) if Self::is_ident_start(c) => Ok(Some(SimpleSelector::Type(self.parse_ident()?))),
            _ => Ok(None),
        }
    }

    fn parse_property_path(&mut self) -> Result<PropertyPath, ParseError> {
        let metadata = self.eat("@");
        let mut segments = Vec::new();
        if matches!(self.peek(), Some(c) if Self::is_ident_start(c)) {
            segments.push(self.parse_path_segment()?);
            while self.eat(".") {
                segments.push(self.parse_path_segment()?);
            }
        } else if !metadata {
            return Err(self.error("expected a property path"));
        }
        Ok(PropertyPath { metadata, segments })
    }

    fn parse_path_segment(&mut self) -> Result<PathSegment, ParseError> {
        let name = self.parse_ident()?;
        let invoke = self.eat("()");
        Ok(PathSegment::new(name, invoke))
    }

    fn parse_attribute_selector(&mut self) -> Result<SimpleSelector, ParseError> {
        self.expect("[")?;
        self.skip_ws();
        let path = self.parse_property_path()?;
        self.skip_ws();
        if self.eat("]") {
            return Ok(SimpleSelector::PropertyName(path));
        }

        let negate = self.eat("!");
        if let Some(op) = self.try_eat_string_op() {
            self.skip_ws();
            let literal = self.parse_quoted_string()?;
            self.skip_ws();
            let case_insensitive = self.eat("i") || self.eat("I");
            self.skip_ws();
            self.expect("]")?;
            return Ok(SimpleSelector::PropertyStringMatch {
                path,
                op,
                literal,
                case_insensitive,
                negate,
            });
        }

        if negate {
            return Err(self.error("'!' is only valid before a string comparison operator"));
        }

        let op = self.try_eat_numeric_op().ok_or_else(|| self.error("expected comparison operator"))?;
        self.skip_ws();
        let value = self.parse_integer()?;
        self.skip_ws();
        self.expect("]")?;
        Ok(SimpleSelector::PropertyNumericMatch { path, op, value })
    }

    fn try_eat_string_op(&mut self) -> Option<StringOp> {
        const OPS: &[(&str, StringOp)] = &[
            ("*=", StringOp::Contains),
            ("^=", StringOp::StartsWith),
            ("$=", StringOp::EndsWith),
            ("~=", StringOp::Includes),
            ("|=", StringOp::DashMatch),
            ("=", StringOp::Equals),
        ];
        for (symbol, op) in OPS {
            if self.eat(symbol) {
                return Some(*op);
            }
        }
        None
    }

    fn try_eat_numeric_op(&mut self) -> Option<NumericOp> {
        const OPS: &[(&str, NumericOp)] = &[
            ("<=", NumericOp::LessEq),
            (">=", NumericOp::GreaterEq),
            ("<", NumericOp::Less),
            (">", NumericOp::Greater),
            ("=", NumericOp::Equals),
        ];
        for (symbol, op) in OPS {
            if self.eat(symbol) {
                return Some(*op);
            }
        }
        None
    }

    fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Err(self.error("expected quoted string literal")),
        };
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("unterminated string literal")),
                Some('\\') => match self.advance() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(self.error("unterminated string literal")),
                },
                Some(c) if c == quote => break,
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_integer(&mut self) -> Result<i64, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return Err(self.error("expected integer"));
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .map_err(|_| self.error("integer out of range"))
    }

    fn parse_parenthesized<T>(
        &mut self,
        inner: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.expect("(")?;
        self.skip_ws();
        let value = inner(self)?;
        self.skip_ws();
        self.expect(")")?;
        Ok(value)
    }

    fn parse_nth(&mut self) -> Result<Nth, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c != ')') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        Nth::parse(&text).ok_or_else(|| self.error("invalid An+B expression"))
    }

    fn parse_pseudo_or_alias(&mut self) -> Result<SimpleSelector, ParseError> {
        self.expect(":")?;
        let name = self.parse_ident()?;
        if let Some(alias) = kind_alias_from_keyword(&name) {
            return Ok(SimpleSelector::KindAlias(alias));
        }
        let pseudo = match name.as_str() {
            "not" => PseudoClass::Not(Box::new(
                self.parse_parenthesized(Self::parse_compound_selector)?,
            )),
            "is" => PseudoClass::Is(self.parse_parenthesized(Self::parse_selector_list)?),
            "where" => PseudoClass::Where(self.parse_parenthesized(Self::parse_selector_list)?),
            "has" => PseudoClass::Has(self.parse_parenthesized(Self::parse_selector_list)?),
            "implements" => {
                PseudoClass::Implements(self.parse_parenthesized(Self::parse_selector_list)?)
            }
            "nth-child" => PseudoClass::NthChild(self.parse_parenthesized(Self::parse_nth)?),
            "nth-last-child" => {
                PseudoClass::NthLastChild(self.parse_parenthesized(Self::parse_nth)?)
            }
            "nth-of-type" => PseudoClass::NthOfType(self.parse_parenthesized(Self::parse_nth)?),
            "nth-last-of-type" => {
                PseudoClass::NthLastOfType(self.parse_parenthesized(Self::parse_nth)?)
            }
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "only-of-type" => PseudoClass::OnlyOfType,
            "empty" => PseudoClass::Empty,
            "scope" => PseudoClass::Scope,
            "root" => PseudoClass::Root,
            "capture" => self.parse_parenthesized(Self::parse_capture_args)?,
            other => return Err(self.error(format!("unknown pseudo-class {other:?}"))),
        };
        Ok(SimpleSelector::PseudoClass(pseudo))
    }

    fn parse_capture_args(&mut self) -> Result<PseudoClass, ParseError> {
        let alias = self.parse_ident()?;
        self.skip_ws();
        if self.eat(",") {
            self.skip_ws();
            let path = self.parse_property_path()?;
            Ok(PseudoClass::Capture(alias, Some(path)))
        } else {
            Ok(PseudoClass::Capture(alias, None))
        }
    }
}

fn kind_alias_from_keyword(name: &str) -> Option<KindAlias> {
    Some(match name {
        "class" => KindAlias::Class,
        "method" => KindAlias::Method,
        "property" => KindAlias::Property,
        "interface" => KindAlias::Interface,
        "struct" => KindAlias::Struct,
        "namespace" => KindAlias::Namespace,
        "lambda" => KindAlias::Lambda,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tostring::ToSelectorString;

    #[test]
    fn parses_type_and_universal() {
        let list = parse("Foo").unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].first.simples, vec![SimpleSelector::Type("Foo".to_string())]);

        let list = parse("*").unwrap();
        assert_eq!(list.items[0].first.simples, vec![SimpleSelector::UniversalType]);
    }

    #[test]
    fn parses_combinators() {
        let list = parse("a > b + c ~ d e").unwrap();
        let complex = &list.items[0];
        assert_eq!(complex.rest.len(), 4);
        assert_eq!(complex.rest[0].0, Combinator::Child);
        assert_eq!(complex.rest[1].0, Combinator::NextSibling);
        assert_eq!(complex.rest[2].0, Combinator::SubsequentSibling);
        assert_eq!(complex.rest[3].0, Combinator::Descendant);
    }

    #[test]
    fn parses_attribute_with_string_op_and_flags() {
        let list = parse("[Name!^='Get' i]").unwrap();
        match &list.items[0].first.simples[0] {
            SimpleSelector::PropertyStringMatch { op, literal, case_insensitive, negate, .. } => {
                assert_eq!(*op, StringOp::StartsWith);
                assert_eq!(literal, "Get");
                assert!(*case_insensitive);
                assert!(*negate);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_numeric_attribute() {
        let list = parse("[@status >= 400]").unwrap();
        match &list.items[0].first.simples[0] {
            SimpleSelector::PropertyNumericMatch { path, op, value } => {
                assert!(path.metadata);
                assert_eq!(*op, NumericOp::GreaterEq);
                assert_eq!(*value, 400);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_nth_child_and_capture() {
        let list = parse(":class:nth-child(2n+1):capture(id, Symbol.Name())").unwrap();
        let simples = &list.items[0].first.simples;
        assert_eq!(simples[0], SimpleSelector::KindAlias(KindAlias::Class));
        assert_eq!(
            simples[1],
            SimpleSelector::PseudoClass(PseudoClass::NthChild(Nth { a: 2, b: 1 }))
        );
        match &simples[2] {
            SimpleSelector::PseudoClass(PseudoClass::Capture(alias, Some(path))) => {
                assert_eq!(alias, "id");
                assert_eq!(path.to_selector_string(), "Symbol.Name()");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reports_position_on_failure() {
        let err = parse("[Name='unterminated").unwrap_err();
        assert!(err.position > 0);
    }
}
