//! Compact type expressions used throughout scenario files.
//!
//! ```text
//! type      := component ('&' component)*
//! component := '?' [('extends' | 'super') array] | array
//! array     := atom ('[' ']')*
//! atom      := name ['<' type (',' type)* '>']
//! ```
//!
//! Names resolve innermost first: type parameters in scope, then the
//! primitives and `null`, then declared classes. A generic class written
//! without arguments is its raw type.

use super::error::ScenarioError;
use rustc_hash::FxHashMap;
use tyinfer_solver::{ClassId, DefinitionStore, PrimitiveKind, Type, TypeParamId};

/// Names visible to a type expression.
#[derive(Clone)]
pub struct TypeScope<'a> {
    store: &'a DefinitionStore,
    params: FxHashMap<String, TypeParamId>,
}

impl<'a> TypeScope<'a> {
    pub fn new(store: &'a DefinitionStore) -> Self {
        Self {
            store,
            params: FxHashMap::default(),
        }
    }

    /// Bring type parameters into scope, shadowing earlier ones with the
    /// same name.
    pub fn with_params<'n>(
        mut self,
        params: impl IntoIterator<Item = (&'n str, TypeParamId)>,
    ) -> Self {
        for (name, id) in params {
            self.params.insert(name.to_string(), id);
        }
        self
    }

    /// Bring the type parameters of a declared class into scope.
    pub fn with_class_params(self, class: ClassId) -> Self {
        let Some(info) = self.store.class(class) else {
            return self;
        };
        let named: Vec<(String, TypeParamId)> = info
            .type_params
            .iter()
            .filter_map(|param| {
                self.store
                    .type_param(*param)
                    .map(|param_info| (param_info.name.to_string(), *param))
            })
            .collect();
        self.with_params(named.iter().map(|(name, id)| (name.as_str(), *id)))
    }

    pub fn store(&self) -> &'a DefinitionStore {
        self.store
    }

    pub fn parse(&self, input: &str) -> Result<Type, ScenarioError> {
        parse_type(input, self)
    }
}

pub fn parse_type(input: &str, scope: &TypeScope<'_>) -> Result<Type, ScenarioError> {
    let mut parser = TypeParser {
        input,
        pos: 0,
        scope,
    };
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    if parser.pos < input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct TypeParser<'s, 'a> {
    input: &'s str,
    pos: usize,
    scope: &'s TypeScope<'a>,
}

impl<'s> TypeParser<'s, '_> {
    fn parse_type(&mut self) -> Result<Type, ScenarioError> {
        let first = self.parse_component()?;
        if !self.eat('&') {
            return Ok(first);
        }
        let mut components = vec![first, self.parse_component()?];
        while self.eat('&') {
            components.push(self.parse_component()?);
        }
        Ok(Type::intersection(components))
    }

    fn parse_component(&mut self) -> Result<Type, ScenarioError> {
        if !self.eat('?') {
            return self.parse_array();
        }
        if self.eat_keyword("extends") {
            Ok(Type::extends(self.parse_array()?))
        } else if self.eat_keyword("super") {
            Ok(Type::super_of(self.parse_array()?))
        } else {
            Ok(Type::unbounded())
        }
    }

    fn parse_array(&mut self) -> Result<Type, ScenarioError> {
        let mut ty = self.parse_atom()?;
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            ty = Type::array(ty);
        }
        Ok(ty)
    }

    fn parse_atom(&mut self) -> Result<Type, ScenarioError> {
        self.skip_whitespace();
        let start = self.pos;
        let name = self.identifier();
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }

        if self.eat('<') {
            let mut args = vec![self.parse_type()?];
            while self.eat(',') {
                args.push(self.parse_type()?);
            }
            if !self.eat('>') {
                return Err(self.error("expected `>`"));
            }
            return self.generic_class(name, start, args);
        }
        self.resolve(name)
    }

    fn resolve(&self, name: &str) -> Result<Type, ScenarioError> {
        if let Some(param) = self.scope.params.get(name) {
            return Ok(Type::param(*param));
        }
        if name == "null" {
            return Ok(Type::Null);
        }
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Ok(Type::Primitive(kind));
        }
        match self.scope.store.class_by_name(name) {
            Some(class) => Ok(Type::raw(class)),
            None => Err(ScenarioError::UnknownType {
                name: name.to_string(),
                input: self.input.to_string(),
            }),
        }
    }

    fn generic_class(&self, name: &str, start: usize, args: Vec<Type>) -> Result<Type, ScenarioError> {
        let class = self
            .scope
            .store
            .class_by_name(name)
            .filter(|_| !self.scope.params.contains_key(name));
        let Some(class) = class else {
            return match self.resolve(name) {
                Ok(_) => Err(ScenarioError::Syntax {
                    input: self.input.to_string(),
                    offset: start,
                    message: format!("`{name}` does not take type arguments"),
                }),
                Err(err) => Err(err),
            };
        };
        let expected = self
            .scope
            .store
            .class(class)
            .map_or(0, |info| info.type_params.len());
        if expected != args.len() {
            return Err(ScenarioError::TypeArity {
                class: name.to_string(),
                expected,
                actual: args.len(),
            });
        }
        Ok(Type::class(class, args))
    }

    fn identifier(&mut self) -> &'s str {
        let input: &'s str = self.input;
        let start = self.pos;
        let mut chars = input[start..].char_indices();
        let end = match chars.next() {
            Some((_, ch)) if is_identifier_start(ch) => chars
                .find(|(_, ch)| !is_identifier_part(*ch))
                .map_or(input.len(), |(offset, _)| start + offset),
            _ => start,
        };
        self.pos = end;
        &input[start..end]
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// `keyword` as a whole word.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let rest = &self.input[self.pos..];
        let whole = rest.starts_with(keyword)
            && !rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(is_identifier_part);
        if whole {
            self.pos += keyword.len();
        }
        whole
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, message: &str) -> ScenarioError {
        ScenarioError::Syntax {
            input: self.input.to_string(),
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    ch == '$' || ch == '_' || ch == '.' || ch.is_alphanumeric()
}

#[cfg(test)]
#[path = "tests/type_expr_tests.rs"]
mod tests;
