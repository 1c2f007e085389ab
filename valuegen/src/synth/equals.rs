use crate::classify::IdentityFields;
use crate::model::ClassDescriptor;
use crate::tree::{BinOp, Expr, GeneratedMethod, MethodKind, Param, Stmt, TypeName};

const OTHER: &str = "other";
const CAST: &str = "o";

/// `equals(Object)` comparing identity fields pairwise, ancestors first.
///
/// The body short-circuits on identity, on `null`, and on a runtime class that
/// differs from this one. Subclass instances are never equal to superclass
/// instances. Returns `None` when there are no identity fields.
pub fn generate_equals(
    class: &ClassDescriptor,
    fields: &IdentityFields<'_>,
    helpers: &super::Helpers,
) -> Option<GeneratedMethod> {
    let objects = TypeName::parse(&helpers.objects);
    let comparison = fields
        .iter()
        .map(|field| {
            Expr::static_call(
                objects.clone(),
                "equals",
                vec![
                    Expr::field_of(Expr::This, &field.name),
                    Expr::field_of(Expr::local(CAST), &field.name),
                ],
            )
        })
        .reduce(|acc, next| Expr::binary(BinOp::And, acc, next))?;

    let other = || Expr::local(OTHER);
    let early_return = |cond: Expr, value: bool| Stmt::If {
        cond,
        then: vec![Stmt::Return(Expr::Bool(value))],
    };

    let mut method = GeneratedMethod::new(MethodKind::Equals, "boolean");
    method.params.push(Param {
        ty: "Object".to_string(),
        name: OTHER.to_string(),
    });
    method.body = vec![
        early_return(Expr::binary(BinOp::RefEq, Expr::This, other()), true),
        early_return(Expr::binary(BinOp::RefEq, other(), Expr::Null), false),
        early_return(
            Expr::binary(
                BinOp::RefNe,
                Expr::call(None, "getClass", Vec::new()),
                Expr::call(Some(other()), "getClass", Vec::new()),
            ),
            false,
        ),
        Stmt::Final {
            ty: class.name.clone(),
            name: CAST.to_string(),
            init: Expr::Cast {
                ty: class.name.clone(),
                expr: Box::new(other()),
            },
        },
        Stmt::Return(comparison),
    ];
    Some(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassModel, FieldDescriptor};
    use crate::synth::Helpers;

    fn field_eq(name: &str) -> Expr {
        Expr::static_call(
            TypeName::parse("java.util.Objects"),
            "equals",
            vec![
                Expr::field_of(Expr::This, name),
                Expr::field_of(Expr::local("o"), name),
            ],
        )
    }

    #[test]
    fn test_guard_sequence() {
        let mut model = ClassModel::new();
        let id = model
            .add_class(ClassDescriptor::new("Money").with_field(FieldDescriptor::new("amount", "long")))
            .unwrap();
        let method = generate_equals(model.get(id), &IdentityFields::of(&model, id), &Helpers::default()).unwrap();

        assert_eq!(method.return_type, "boolean");
        assert_eq!(method.params[0].ty, "Object");
        assert_eq!(method.body.len(), 5);
        assert!(matches!(
            &method.body[0],
            Stmt::If { cond: Expr::Binary { op: BinOp::RefEq, lhs, .. }, then }
                if **lhs == Expr::This && then == &vec![Stmt::Return(Expr::Bool(true))]
        ));
        assert!(matches!(
            &method.body[1],
            Stmt::If { cond: Expr::Binary { op: BinOp::RefEq, rhs, .. }, .. } if **rhs == Expr::Null
        ));
        assert!(matches!(
            &method.body[2],
            Stmt::If { cond: Expr::Binary { op: BinOp::RefNe, .. }, .. }
        ));
        assert!(matches!(&method.body[3], Stmt::Final { ty, name, .. } if ty == "Money" && name == "o"));
        assert_eq!(method.body[4], Stmt::Return(field_eq("amount")));
    }

    #[test]
    fn test_conjunction_is_left_nested_in_identity_order() {
        let mut model = ClassModel::new();
        let base = model
            .add_class(ClassDescriptor::new("Base").with_field(FieldDescriptor::new("a", "int")))
            .unwrap();
        let child = model
            .add_class(
                ClassDescriptor::new("Child")
                    .with_field(FieldDescriptor::new("b", "int"))
                    .with_field(FieldDescriptor::new_static("S", "int"))
                    .with_field(FieldDescriptor::new("c", "int")),
            )
            .unwrap();
        model.extend(child, base).unwrap();

        let method =
            generate_equals(model.get(child), &IdentityFields::of(&model, child), &Helpers::default()).unwrap();
        let expected = Expr::binary(
            BinOp::And,
            Expr::binary(BinOp::And, field_eq("a"), field_eq("b")),
            field_eq("c"),
        );
        assert_eq!(method.body.last(), Some(&Stmt::Return(expected)));
    }

    #[test]
    fn test_no_fields_no_method() {
        let mut model = ClassModel::new();
        let id = model.add_class(ClassDescriptor::new("Marker")).unwrap();
        assert!(generate_equals(model.get(id), &IdentityFields::of(&model, id), &Helpers::default()).is_none());
    }
}
