//! Java source rendering for generated methods and class skeletons.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::PathBuf;

use crate::model::{ClassDescriptor, ClassId, ClassModel, Superclass};
use crate::tree::{Expr, GeneratedMethod, Stmt, ToStringRequest};

const INDENT: &str = "    ";

/// Render one method at the given indentation depth.
pub fn render_method(method: &GeneratedMethod, depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    let mut out = String::new();

    for annotation in &method.annotations {
        let _ = writeln!(out, "{pad}@{annotation}");
    }
    let params: Vec<String> = method.params.iter().map(|p| format!("{} {}", p.ty, p.name)).collect();
    let _ = writeln!(
        out,
        "{pad}public {} {}({}) {{",
        method.return_type,
        method.name(),
        params.join(", ")
    );
    for stmt in &method.body {
        render_stmt(&mut out, stmt, depth + 1);
    }
    let _ = writeln!(out, "{pad}}}");
    out
}

/// Render all generated methods of a class, separated by blank lines.
pub fn render_generated(model: &ClassModel, class: ClassId, depth: usize) -> String {
    model
        .get(class)
        .generated_methods()
        .iter()
        .map(|method| render_method(method, depth))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a compilation unit for `class`: package, imports, field
/// declarations, the declared methods and the generated methods.
///
/// Instance fields are `protected` so generated methods of subclasses can
/// read inherited fields. Declared methods are copied from their recorded
/// source; a declared method without source is rendered as a comment, and
/// [`emit_sources`](crate::emit::emit_sources) refuses to write such a class.
pub fn render_class(model: &ClassModel, class: ClassId) -> String {
    let descriptor = model.get(class);
    let mut out = String::new();

    let _ = writeln!(out, "// Generated by valuegen. Do not edit manually.");
    if let Some(package) = descriptor.package.as_deref().filter(|p| !p.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "package {package};");
    }

    let imports: BTreeSet<String> = descriptor
        .generated_methods()
        .iter()
        .flat_map(GeneratedMethod::referenced_types)
        .filter(|ty| ty.needs_import() && ty.package.as_deref() != descriptor.package.as_deref())
        .map(|ty| ty.qualified())
        .collect();
    if !imports.is_empty() {
        let _ = writeln!(out);
        for import in &imports {
            let _ = writeln!(out, "import {import};");
        }
    }

    let _ = writeln!(out);
    let modifier = if descriptor.is_abstract { "public abstract" } else { "public" };
    let _ = write!(out, "{modifier} class {}", descriptor.name);
    match &descriptor.superclass {
        Some(Superclass::Defined(parent)) => {
            let parent = model.get(*parent);
            if parent.package == descriptor.package {
                let _ = write!(out, " extends {}", parent.name);
            } else {
                let _ = write!(out, " extends {}", parent.qualified_name());
            }
        }
        Some(Superclass::External(name)) => {
            let _ = write!(out, " extends {name}");
        }
        None => {}
    }
    let _ = writeln!(out, " {{");

    if !descriptor.fields.is_empty() {
        let _ = writeln!(out);
        for field in &descriptor.fields {
            let modifiers = if field.is_static { "public static" } else { "protected" };
            let _ = writeln!(out, "{INDENT}{modifiers} {} {};", field.field_type, field.name);
        }
    }

    for signature in descriptor.declared_methods() {
        let _ = writeln!(out);
        match descriptor.method_source(signature) {
            Some(source) => out.push_str(&indent_source(source, 1)),
            None => {
                let _ = writeln!(out, "{INDENT}// {signature} is declared upstream; its source is not in the model");
            }
        }
    }

    for method in descriptor.generated_methods() {
        let _ = writeln!(out);
        out.push_str(&render_method(method, 1));
    }

    let _ = writeln!(out, "}}");
    out
}

/// Relative path of the compilation unit for `class`, e.g. `com/example/Order.java`.
pub fn source_path(class: &ClassDescriptor) -> PathBuf {
    let mut path = PathBuf::new();
    if let Some(package) = class.package.as_deref() {
        path.extend(package.split('.').filter(|part| !part.is_empty()));
    }
    path.push(format!("{}.java", class.name));
    path
}

/// Re-indent a block of Java source to `depth`, keeping its relative indentation.
fn indent_source(source: &str, depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    let lines: Vec<&str> = source.trim_matches('\n').lines().map(str::trim_end).collect();
    let common = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for line in lines {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{pad}{}", line.get(common..).unwrap_or(line.trim_start()));
        }
    }
    out
}

fn render_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    let pad = INDENT.repeat(depth);
    match stmt {
        Stmt::If { cond, then } => {
            let _ = writeln!(out, "{pad}if ({}) {{", render_expr(cond, false));
            for stmt in then {
                render_stmt(out, stmt, depth + 1);
            }
            let _ = writeln!(out, "{pad}}}");
        }
        Stmt::Final { ty, name, init } => {
            let _ = writeln!(out, "{pad}final {ty} {name} = {};", render_expr(init, false));
        }
        Stmt::Return(expr) => {
            let _ = writeln!(out, "{pad}return {};", render_expr(expr, false));
        }
    }
}

/// `nested` wraps binary expressions in parentheses.
pub fn render_expr(expr: &Expr, nested: bool) -> String {
    match expr {
        Expr::This => "this".to_string(),
        Expr::Null => "null".to_string(),
        Expr::Bool(value) => value.to_string(),
        Expr::Local(name) => name.clone(),
        Expr::Field { target: None, name } => name.clone(),
        Expr::Field {
            target: Some(target),
            name,
        } => format!("{}.{name}", render_expr(target, true)),
        Expr::Call { target, method, args } => match target {
            Some(target) => format!("{}.{method}({})", render_expr(target, true), render_args(args)),
            None => format!("{method}({})", render_args(args)),
        },
        Expr::StaticCall { class, method, args } => {
            format!("{}.{method}({})", class.name, render_args(args))
        }
        Expr::Cast { ty, expr } => format!("(({ty}) {})", render_expr(expr, true)),
        Expr::Binary { op, lhs, rhs } => {
            let text = format!("{} {} {}", render_expr(lhs, true), op.symbol(), render_expr(rhs, true));
            if nested { format!("({text})") } else { text }
        }
        Expr::ToStringHelper(request) => render_to_string_helper(request),
    }
}

fn render_args(args: &[Expr]) -> String {
    args.iter().map(|arg| render_expr(arg, false)).collect::<Vec<_>>().join(", ")
}

fn render_to_string_helper(request: &ToStringRequest) -> String {
    let mut out = format!("{}.toStringHelper(this)", request.helper.name);
    if request.omit_nulls {
        out.push_str(".omitNullValues()");
    }
    for entry in &request.entries {
        let _ = write!(out, ".add({}, {})", string_literal(&entry.label), entry.field);
    }
    out.push_str(".toString()");
    out
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
