use crate::classify::IdentityFields;
use crate::tree::{Expr, GeneratedMethod, MethodKind, Stmt, TypeName};

use super::Helpers;

/// `hashCode()` combining every identity field with `Objects.hash`, ancestors first.
///
/// Returns `None` when there are no identity fields; a constant hash would hide
/// a model that lost its fields.
pub fn generate_hash_code(fields: &IdentityFields<'_>, helpers: &Helpers) -> Option<GeneratedMethod> {
    if fields.is_empty() {
        return None;
    }

    let args = fields.iter().map(|field| Expr::bare_field(&field.name)).collect();
    let hash = Expr::static_call(TypeName::parse(&helpers.objects), "hash", args);

    let mut method = GeneratedMethod::new(MethodKind::HashCode, "int");
    method.body.push(Stmt::Return(hash));
    Some(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDescriptor, ClassModel, FieldDescriptor};

    #[test]
    fn test_hash_arguments_in_identity_order() {
        let mut model = ClassModel::new();
        let parent = model
            .add_class(ClassDescriptor::new("Parent").with_field(FieldDescriptor::new("p", "int")))
            .unwrap();
        let child = model
            .add_class(ClassDescriptor::new("Child").with_field(FieldDescriptor::new("c", "int")))
            .unwrap();
        model.extend(child, parent).unwrap();

        let method = generate_hash_code(&IdentityFields::of(&model, child), &Helpers::default()).unwrap();
        assert_eq!(method.return_type, "int");
        assert_eq!(
            method.body,
            vec![Stmt::Return(Expr::static_call(
                TypeName::parse("java.util.Objects"),
                "hash",
                vec![Expr::bare_field("p"), Expr::bare_field("c")],
            ))]
        );
    }

    #[test]
    fn test_no_fields_no_method() {
        let mut model = ClassModel::new();
        let id = model
            .add_class(ClassDescriptor::new("Flags").with_field(FieldDescriptor::new_static("ON", "boolean")))
            .unwrap();
        assert!(generate_hash_code(&IdentityFields::of(&model, id), &Helpers::default()).is_none());
    }
}
