//! Human-readable rendering of types and substitutions.
//!
//! Names come from the database; ids that do not resolve are printed as
//! `<class#N>` / `<T#N>` so formatting never fails.

use crate::db::TypeDatabase;
use crate::substitution::{Binding, Substitution};
use crate::types::{ClassId, Type, TypeParamId, Wildcard, WildcardKind};
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    pub fn format(&self, ty: &Type) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    /// `{T -> String, U -> <raw>}` in binding order.
    pub fn format_substitution(&self, substitution: &Substitution) -> String {
        let mut out = String::from("{");
        for (index, (param, binding)) in substitution.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.param_name(param));
            out.push_str(" -> ");
            match binding {
                Binding::Type(ty) => self.write_type(&mut out, ty),
                Binding::Unbound => out.push_str("<raw>"),
            }
        }
        out.push('}');
        out
    }

    pub fn class_name(&self, class: ClassId) -> String {
        self.db
            .class_info(class)
            .map(|info| info.name.to_string())
            .unwrap_or_else(|| format!("<class#{}>", class.0))
    }

    pub fn param_name(&self, param: TypeParamId) -> String {
        self.db
            .type_param_info(param)
            .map(|info| info.name.to_string())
            .unwrap_or_else(|| format!("<T#{}>", param.0))
    }

    fn write_type(&self, out: &mut String, ty: &Type) {
        match ty {
            Type::Primitive(kind) => out.push_str(kind.name()),
            Type::Array(component) => {
                self.write_type(out, component);
                out.push_str("[]");
            }
            Type::Class(class_type) => {
                out.push_str(&self.class_name(class_type.class));
                if !class_type.args.is_empty() {
                    out.push('<');
                    for (index, arg) in class_type.args.iter().enumerate() {
                        if index > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(out, arg);
                    }
                    out.push('>');
                }
            }
            Type::Param(param) => out.push_str(&self.param_name(*param)),
            Type::Wildcard(wildcard) => self.write_wildcard(out, wildcard),
            Type::Captured(captured) => {
                let _ = write!(out, "capture#{} of ", captured.id.0);
                self.write_wildcard(out, &captured.wildcard);
            }
            Type::Intersection(components) => {
                for (index, component) in components.iter().enumerate() {
                    if index > 0 {
                        out.push_str(" & ");
                    }
                    self.write_type(out, component);
                }
            }
            Type::Null => out.push_str("null"),
            Type::Unknown => out.push_str("<unknown>"),
        }
    }

    fn write_wildcard(&self, out: &mut String, wildcard: &Wildcard) {
        out.push('?');
        if let Some(bound) = &wildcard.bound {
            out.push_str(match wildcard.kind {
                WildcardKind::Extends => " extends ",
                WildcardKind::Super => " super ",
            });
            self.write_type(out, bound);
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
