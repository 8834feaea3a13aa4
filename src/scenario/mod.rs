//! Scenario files: declarations and call sites in JSON.
//!
//! ```json
//! {
//!   "options": { "mode": "strict", "outerCallContext": true },
//!   "classes": [
//!     { "name": "List", "kind": "interface", "typeParams": ["E"] },
//!     { "name": "ArrayList", "typeParams": ["E"], "supertypes": ["List<E>"] }
//!   ],
//!   "methods": [
//!     { "name": "first", "typeParams": [{ "name": "T", "bounds": ["Number"] }],
//!       "params": ["List<? extends T>"], "returns": "T" }
//!   ],
//!   "calls": [
//!     { "id": "c1", "candidates": ["first"], "args": ["ArrayList<Integer>"],
//!       "context": { "kind": "variable", "type": "Number" } }
//!   ]
//! }
//! ```
//!
//! Classes are declared before any type expression is read, so supertypes
//! and bounds may refer to classes declared later in the file. A call
//! passed as `{ "call": "id" }` in another call's arguments gets that
//! argument slot as its context unless it declares one.

mod error;
mod type_expr;

pub use error::ScenarioError;
pub use type_expr::{TypeScope, parse_type};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use tyinfer_solver::{
    ArgumentType, CallContext, CallGraph, CallId, CallKind, CallSite, ClassId, ClassKind,
    DeclaredVisibility, DefinitionStore, InferenceEngine, InferenceOptions, InferenceSession,
    MethodId, MethodKind, OverloadResolution, ParamInfo, Substitution, Type, TypeParamId,
    TypeParamOwner, Visibility,
};

// =============================================================================
// File format
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFile {
    #[serde(default)]
    pub options: InferenceOptions,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub calls: Vec<CallDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub kind: Option<ClassKind>,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

/// `"T"` or `{ "name": "T", "bounds": ["Comparable<T>"] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeParamDecl {
    Name(String),
    Bounded {
        name: String,
        #[serde(default)]
        bounds: Vec<String>,
    },
}

impl TypeParamDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeParamDecl::Name(name) | TypeParamDecl::Bounded { name, .. } => name,
        }
    }

    pub fn bounds(&self) -> &[String] {
        match self {
            TypeParamDecl::Name(_) => &[],
            TypeParamDecl::Bounded { bounds, .. } => bounds,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDecl {
    pub name: String,
    /// Declaring class; its type parameters are in scope.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub kind: MethodKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    #[serde(default)]
    pub params: Vec<String>,
    /// The last parameter is variable-arity and written as an array.
    #[serde(default)]
    pub varargs: bool,
    /// Defaults to `void`.
    #[serde(default)]
    pub returns: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDecl {
    pub id: String,
    #[serde(default)]
    pub kind: MethodKind,
    /// Method names, or `Owner.name`; each names every overload.
    pub candidates: Vec<String>,
    /// Type expressions, `{ "call": "id" }` or `null` for an untyped argument.
    #[serde(default)]
    pub args: Vec<Option<ArgDecl>>,
    #[serde(default)]
    pub context: Option<ContextDecl>,
    #[serde(default)]
    pub type_args: Vec<String>,
    /// Receiver type; its class arguments become the call's partial substitution.
    #[serde(default)]
    pub receiver: Option<String>,
    /// Class the call is written in, for accessibility and type-parameter scope.
    #[serde(default)]
    pub caller: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgDecl {
    Call { call: String },
    Type(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContextDecl {
    None,
    Variable {
        #[serde(rename = "type")]
        declared: String,
    },
    Assignment {
        target: String,
    },
    Return {
        #[serde(default)]
        returns: Option<String>,
    },
}

// =============================================================================
// Loaded scenario
// =============================================================================

/// Declarations and call sites ready for ranking.
pub struct Scenario {
    pub store: DefinitionStore,
    pub calls: CallGraph,
    pub options: InferenceOptions,
    call_names: FxHashMap<CallId, Arc<str>>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_json::from_str(text)?;
        Self::from_file(&file)
    }

    pub fn from_file(file: &ScenarioFile) -> Result<Self, ScenarioError> {
        let store = DefinitionStore::new();
        declare_classes(&store, &file.classes)?;
        let methods = declare_methods(&store, &file.methods)?;
        let (calls, call_names) = build_calls(&store, &methods, &file.calls)?;
        debug!(
            classes = file.classes.len(),
            methods = file.methods.len(),
            calls = calls.len(),
            "scenario loaded"
        );
        Ok(Self {
            store,
            calls,
            options: file.options.clone(),
            call_names,
        })
    }

    pub fn call_name(&self, call: CallId) -> Option<&str> {
        self.call_names.get(&call).map(|name| &**name)
    }

    pub fn call_id(&self, name: &str) -> Option<CallId> {
        self.calls
            .ids()
            .iter()
            .copied()
            .find(|id| self.call_name(*id) == Some(name))
    }

    /// Rank one call in a fresh session, with declared visibility rules.
    pub fn rank(
        &self,
        call: CallId,
        options: &InferenceOptions,
    ) -> Result<OverloadResolution, ScenarioError> {
        Ok(self.with_engine(options, |engine, session| engine.rank_call(session, call))?)
    }

    /// Type of the call expression: the unique best candidate's return type
    /// under its substitution.
    pub fn call_type(&self, call: CallId, options: &InferenceOptions) -> Option<Type> {
        self.with_engine(options, |engine, session| engine.call_type(session, call))
    }

    fn with_engine<T>(
        &self,
        options: &InferenceOptions,
        f: impl FnOnce(&InferenceEngine<'_>, &mut InferenceSession) -> T,
    ) -> T {
        let access = DeclaredVisibility::new(&self.store);
        let engine = InferenceEngine::new(&self.store)
            .with_calls(&self.calls)
            .with_access(&access)
            .with_options(options.clone());
        let mut session = InferenceSession::new();
        f(&engine, &mut session)
    }
}

fn declare_classes(store: &DefinitionStore, classes: &[ClassDecl]) -> Result<(), ScenarioError> {
    let mut declared: Vec<(ClassId, &ClassDecl)> = Vec::with_capacity(classes.len());
    for decl in classes {
        if store.class_by_name(&decl.name).is_some() {
            return Err(ScenarioError::DuplicateClass(decl.name.clone()));
        }
        let class = store.declare_class(&decl.name, decl.kind.unwrap_or(ClassKind::Class));
        for param in &decl.type_params {
            store.declare_type_param(param.name(), TypeParamOwner::Class(class));
        }
        declared.push((class, decl));
    }

    for (class, decl) in declared {
        let scope = TypeScope::new(store).with_class_params(class);
        let params = store
            .class(class)
            .map(|info| info.type_params.to_vec())
            .unwrap_or_default();
        set_bounds(&scope, &params, &decl.type_params)?;

        for supertype in &decl.supertypes {
            match scope.parse(supertype)? {
                Type::Class(class_type) => store.add_supertype(class, (*class_type).clone()),
                _ => {
                    return Err(ScenarioError::UnknownClass(supertype.clone()));
                }
            }
        }
    }
    Ok(())
}

fn set_bounds(
    scope: &TypeScope<'_>,
    params: &[TypeParamId],
    decls: &[TypeParamDecl],
) -> Result<(), ScenarioError> {
    for (param, decl) in params.iter().zip(decls) {
        if decl.bounds().is_empty() {
            continue;
        }
        let bounds = decl
            .bounds()
            .iter()
            .map(|bound| scope.parse(bound))
            .collect::<Result<Vec<_>, _>>()?;
        scope.store().set_bounds(*param, bounds);
    }
    Ok(())
}

/// Method ids by simple name and by `Owner.name`, in declaration order.
type MethodTable = FxHashMap<String, Vec<MethodId>>;

fn declare_methods(store: &DefinitionStore, methods: &[MethodDecl]) -> Result<MethodTable, ScenarioError> {
    let mut table = MethodTable::default();
    for decl in methods {
        let owner = match &decl.owner {
            Some(name) => Some(
                store
                    .class_by_name(name)
                    .ok_or_else(|| ScenarioError::UnknownClass(name.clone()))?,
            ),
            None => None,
        };
        let method = store.declare_method(&decl.name, decl.kind, owner);
        let params: Vec<TypeParamId> = decl
            .type_params
            .iter()
            .map(|param| store.declare_type_param(param.name(), TypeParamOwner::Method(method)))
            .collect();

        let mut scope = TypeScope::new(store);
        if let Some(owner) = owner {
            scope = scope.with_class_params(owner);
        }
        let scope = scope.with_params(
            decl.type_params
                .iter()
                .map(|param| param.name())
                .zip(params.iter().copied()),
        );
        set_bounds(&scope, &params, &decl.type_params)?;

        let formals = decl
            .params
            .iter()
            .enumerate()
            .map(|(index, ty)| -> Result<ParamInfo, ScenarioError> {
                Ok(ParamInfo::new(&format!("p{index}"), scope.parse(ty)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let return_type = match &decl.returns {
            Some(returns) => scope.parse(returns)?,
            None => Type::VOID,
        };
        store.set_signature(method, formals, return_type, decl.varargs);
        store.set_visibility(method, decl.visibility);

        table.entry(decl.name.clone()).or_default().push(method);
        if let Some(owner) = &decl.owner {
            table
                .entry(format!("{owner}.{}", decl.name))
                .or_default()
                .push(method);
        }
    }
    Ok(table)
}

fn build_calls(
    store: &DefinitionStore,
    methods: &MethodTable,
    decls: &[CallDecl],
) -> Result<(CallGraph, FxHashMap<CallId, Arc<str>>), ScenarioError> {
    let mut ids: FxHashMap<&str, CallId> = FxHashMap::default();
    let mut names: FxHashMap<CallId, Arc<str>> = FxHashMap::default();
    for (index, decl) in decls.iter().enumerate() {
        let id = CallId(index as u32);
        if ids.insert(decl.id.as_str(), id).is_some() {
            return Err(ScenarioError::DuplicateCall(decl.id.clone()));
        }
        names.insert(id, decl.id.as_str().into());
    }
    let lookup = |name: &str| {
        ids.get(name)
            .copied()
            .ok_or_else(|| ScenarioError::UnknownCall(name.to_string()))
    };

    // Argument slots that nested calls sit in.
    let mut slots: FxHashMap<CallId, CallContext> = FxHashMap::default();
    for decl in decls {
        let outer = lookup(&decl.id)?;
        for (index, arg) in decl.args.iter().enumerate() {
            if let Some(ArgDecl::Call { call }) = arg {
                let inner = lookup(call)?;
                if slots
                    .insert(inner, CallContext::Argument { outer, index })
                    .is_some()
                {
                    return Err(ScenarioError::SharedCall(call.clone()));
                }
            }
        }
    }

    let mut graph = CallGraph::new();
    for decl in decls {
        let id = lookup(&decl.id)?;
        let caller_class = match &decl.caller {
            Some(name) => Some(
                store
                    .class_by_name(name)
                    .ok_or_else(|| ScenarioError::UnknownClass(name.clone()))?,
            ),
            None => None,
        };
        let mut scope = TypeScope::new(store);
        if let Some(caller) = caller_class {
            scope = scope.with_class_params(caller);
        }

        let candidates = decl
            .candidates
            .iter()
            .map(|name| {
                methods
                    .get(name)
                    .ok_or_else(|| ScenarioError::UnknownMethod(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .copied()
            .collect();

        let args = decl
            .args
            .iter()
            .map(|arg| -> Result<ArgumentType, ScenarioError> {
                Ok(match arg {
                    None => ArgumentType::Known(None),
                    Some(ArgDecl::Type(ty)) => ArgumentType::known(scope.parse(ty)?),
                    Some(ArgDecl::Call { call }) => ArgumentType::Call(lookup(call)?),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let context = match &decl.context {
            Some(context) => parse_context(&scope, context)?,
            None => slots.get(&id).cloned().unwrap_or_default(),
        };

        let mut site = CallSite::new(id, candidates, args)
            .with_context(context)
            .with_kind(match decl.kind {
                MethodKind::Method => CallKind::Method,
                MethodKind::Constructor => CallKind::Constructor,
            });
        site.explicit_type_args = decl
            .type_args
            .iter()
            .map(|ty| scope.parse(ty))
            .collect::<Result<_, _>>()?;
        site.caller_class = caller_class;
        if let Some(receiver) = &decl.receiver {
            site.partial = receiver_substitution(store, &scope.parse(receiver)?);
        }
        graph.insert(site);
    }
    Ok((graph, names))
}

fn parse_context(scope: &TypeScope<'_>, context: &ContextDecl) -> Result<CallContext, ScenarioError> {
    Ok(match context {
        ContextDecl::None => CallContext::None,
        ContextDecl::Variable { declared } => CallContext::VariableInit {
            declared: scope.parse(declared)?,
        },
        ContextDecl::Assignment { target } => CallContext::Assignment {
            target: scope.parse(target)?,
        },
        ContextDecl::Return { returns } => CallContext::Return {
            method_return: returns.as_deref().map(|ty| scope.parse(ty)).transpose()?,
        },
    })
}

/// The receiver's class arguments keyed by the class's own parameters. A
/// raw receiver erases them.
fn receiver_substitution(store: &DefinitionStore, receiver: &Type) -> Substitution {
    let Some(class_type) = receiver.as_class() else {
        return Substitution::new();
    };
    let Some(info) = store.class(class_type.class) else {
        return Substitution::new();
    };
    if class_type.args.is_empty() {
        return Substitution::new().with_all_unbound(&info.type_params);
    }
    Substitution::from_pairs(
        info.type_params
            .iter()
            .copied()
            .zip(class_type.args.iter().cloned()),
    )
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod tests;
