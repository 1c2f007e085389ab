use crate::classify::IdentityFields;
use crate::model::ClassDescriptor;
use crate::tree::{Expr, GeneratedMethod, MethodKind, Stmt, ToStringEntry, ToStringRequest, TypeName};

use super::Helpers;

/// `toString()` listing every identity field, labeled by name, ancestors first.
///
/// Always produces a method; a class without identity fields renders as just
/// its name.
pub fn generate_to_string(class: &ClassDescriptor, fields: &IdentityFields<'_>, helpers: &Helpers) -> GeneratedMethod {
    let entries = fields
        .iter()
        .map(|field| ToStringEntry {
            label: field.name.clone(),
            field: field.name.clone(),
        })
        .collect();

    let request = ToStringRequest {
        helper: TypeName::parse(&helpers.to_string),
        class_name: class.name.clone(),
        omit_nulls: true,
        entries,
    };

    let mut method = GeneratedMethod::new(MethodKind::ToString, "String");
    method.body.push(Stmt::Return(Expr::ToStringHelper(request)));
    method
}
