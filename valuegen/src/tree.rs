//! Minimal Java code tree for synthesized method bodies.
//!
//! Only the constructs the synthesizer emits are modeled. The tree is handed to
//! [`render`](crate::render) for source output and to [`eval`](crate::eval)
//! for interpretation.

use serde::Serialize;

use crate::model::MethodSignature;

/// A possibly qualified Java type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeName {
    pub package: Option<String>,
    pub name: String,
}

impl TypeName {
    /// Parse `a.b.C` into package `a.b` and name `C`.
    pub fn parse(qualified: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((package, name)) => Self {
                package: Some(package.to_string()),
                name: name.to_string(),
            },
            None => Self {
                package: None,
                name: qualified.to_string(),
            },
        }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            package: None,
            name: name.into(),
        }
    }

    pub fn qualified(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Types in `java.lang` and the default package never need an import.
    pub fn needs_import(&self) -> bool {
        matches!(&self.package, Some(package) if package != "java.lang")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    /// Reference equality (`==`).
    RefEq,
    /// Reference inequality (`!=`).
    RefNe,
    /// Short-circuit conjunction (`&&`).
    And,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::RefEq => "==",
            Self::RefNe => "!=",
            Self::And => "&&",
        }
    }
}

/// One `add(label, value)` entry of a toString helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToStringEntry {
    pub label: String,
    pub field: String,
}

/// A string-helper expression: `Helper.toStringHelper(this)[.omitNullValues()].add(..)...toString()`.
///
/// Kept as plain data so renderers and the evaluator do not have to pick a
/// fluent call chain apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToStringRequest {
    pub helper: TypeName,
    /// Unqualified class name used as the output header.
    pub class_name: String,
    pub omit_nulls: bool,
    pub entries: Vec<ToStringEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    This,
    Null,
    Bool(bool),
    /// Local variable or parameter.
    Local(String),
    /// Field access; `target: None` is a bare field name resolved against `this`.
    Field { target: Option<Box<Expr>>, name: String },
    /// Instance call; `target: None` calls on `this`.
    Call {
        target: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
    StaticCall { class: TypeName, method: String, args: Vec<Expr> },
    Cast { ty: String, expr: Box<Expr> },
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
    ToStringHelper(ToStringRequest),
}

impl Expr {
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    pub fn bare_field(name: impl Into<String>) -> Self {
        Self::Field {
            target: None,
            name: name.into(),
        }
    }

    pub fn field_of(target: Expr, name: impl Into<String>) -> Self {
        Self::Field {
            target: Some(Box::new(target)),
            name: name.into(),
        }
    }

    pub fn call(target: Option<Expr>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            target: target.map(Box::new),
            method: method.into(),
            args,
        }
    }

    pub fn static_call(class: TypeName, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::StaticCall {
            class,
            method: method.into(),
            args,
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Stmt {
    /// `if (cond) { then }` without an else branch.
    If { cond: Expr, then: Vec<Stmt> },
    /// `final ty name = init;`
    Final { ty: String, name: String, init: Expr },
    Return(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

/// The three methods this crate knows how to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodKind {
    ToString,
    HashCode,
    Equals,
}

impl MethodKind {
    pub const ALL: [MethodKind; 3] = [MethodKind::ToString, MethodKind::HashCode, MethodKind::Equals];

    pub fn method_name(self) -> &'static str {
        match self {
            Self::ToString => "toString",
            Self::HashCode => "hashCode",
            Self::Equals => "equals",
        }
    }

    /// Signature of the universal base method this kind overrides.
    pub fn signature(self) -> MethodSignature {
        match self {
            Self::ToString => MethodSignature::to_string_method(),
            Self::HashCode => MethodSignature::hash_code_method(),
            Self::Equals => MethodSignature::equals_method(),
        }
    }
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method_name())
    }
}

/// A synthesized `public` method, annotated `@Override`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedMethod {
    pub kind: MethodKind,
    pub return_type: String,
    pub params: Vec<Param>,
    pub annotations: Vec<String>,
    pub body: Vec<Stmt>,
}

impl GeneratedMethod {
    pub fn new(kind: MethodKind, return_type: impl Into<String>) -> Self {
        Self {
            kind,
            return_type: return_type.into(),
            params: Vec::new(),
            annotations: vec!["Override".to_string()],
            body: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.method_name()
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(self.name(), self.params.iter().map(|p| p.ty.as_str()))
    }

    pub fn is_override(&self) -> bool {
        self.annotations.iter().any(|a| a == "Override")
    }

    /// Static helper classes referenced by the body.
    pub fn referenced_types(&self) -> Vec<&TypeName> {
        let mut types = Vec::new();
        for stmt in &self.body {
            collect_stmt_types(stmt, &mut types);
        }
        types
    }
}

fn collect_stmt_types<'a>(stmt: &'a Stmt, out: &mut Vec<&'a TypeName>) {
    match stmt {
        Stmt::If { cond, then } => {
            collect_expr_types(cond, out);
            for stmt in then {
                collect_stmt_types(stmt, out);
            }
        }
        Stmt::Final { init, .. } => collect_expr_types(init, out),
        Stmt::Return(expr) => collect_expr_types(expr, out),
    }
}

fn collect_expr_types<'a>(expr: &'a Expr, out: &mut Vec<&'a TypeName>) {
    match expr {
        Expr::StaticCall { class, args, .. } => {
            out.push(class);
            args.iter().for_each(|arg| collect_expr_types(arg, out));
        }
        Expr::Call { target, args, .. } => {
            if let Some(target) = target {
                collect_expr_types(target, out);
            }
            args.iter().for_each(|arg| collect_expr_types(arg, out));
        }
        Expr::Field { target: Some(target), .. } => collect_expr_types(target, out),
        Expr::Cast { expr, .. } => collect_expr_types(expr, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_expr_types(lhs, out);
            collect_expr_types(rhs, out);
        }
        Expr::ToStringHelper(request) => out.push(&request.helper),
        Expr::This | Expr::Null | Expr::Bool(_) | Expr::Local(_) | Expr::Field { target: None, .. } => {}
    }
}
