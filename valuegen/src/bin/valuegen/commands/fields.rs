use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;
use std::path::PathBuf;
use valuegen::classify::{ancestor_chain, filter_instance_fields};
use valuegen::{ClassId, ClassModel, IdentityFields, Superclass};

use crate::commands::load_project_model;
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Inspect Identity Fields",
    commands: &[
        "valuegen fields                         # Every class in the configured models",
        "valuegen fields --class Order           # A single class (simple or qualified name)",
        "valuegen fields schema/ --output json   # Machine-readable listing",
    ],
}];

#[derive(Args)]
pub struct FieldsArgs {
    /// Model files or directories (defaults to generator.models)
    pub paths: Vec<PathBuf>,

    /// Only show this class
    #[arg(short, long, value_name = "NAME")]
    pub class: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum FieldRole {
    Inherited,
    Own,
    /// Static fields never take part in equality.
    Static,
}

#[derive(Debug, Serialize)]
struct FieldRow {
    /// Position among the identity fields; `None` for static fields.
    position: Option<usize>,
    name: String,
    field_type: String,
    declared_in: String,
    role: FieldRole,
}

#[derive(Debug, Serialize)]
struct ClassFields {
    class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    superclass: Option<String>,
    fields: Vec<FieldRow>,
}

#[derive(Debug, Serialize)]
struct FieldListing {
    classes: Vec<ClassFields>,
}

impl TableDisplay for FieldListing {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.table(&["Class", "#", "Field", "Type", "Declared in", "Role"]);
        for class in &self.classes {
            if class.fields.is_empty() {
                table.add_row(vec![
                    Cell::new(&class.class),
                    Cell::new(""),
                    Cell::new("(no fields)"),
                ]);
            }
            for (index, field) in class.fields.iter().enumerate() {
                let label = if index == 0 { class.class.as_str() } else { "" };
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(field.position.map(|p| p.to_string()).unwrap_or_default()),
                    Cell::new(&field.name),
                    Cell::new(&field.field_type),
                    Cell::new(&field.declared_in),
                    Cell::new(format!("{:?}", field.role).to_lowercase()),
                ]);
            }
        }
        table
    }

    fn to_compact(&self) -> String {
        self.classes
            .iter()
            .map(|class| {
                let identity: Vec<&str> = class
                    .fields
                    .iter()
                    .filter(|f| f.role != FieldRole::Static)
                    .map(|f| f.name.as_str())
                    .collect();
                format!("{}: {}", class.class, identity.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_fields(args: FieldsArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let (model, _) = load_project_model(&ctx, &args.paths, output)?;

    let ids: Vec<ClassId> = match &args.class {
        Some(name) => match model.find(name) {
            Some(id) => vec![id],
            None => anyhow::bail!("Class '{name}' not found in the model"),
        },
        None => model.ids().collect(),
    };

    let listing = FieldListing {
        classes: ids.into_iter().map(|id| describe(&model, id)).collect(),
    };
    if !output.is_json() {
        output.heading("Identity Fields");
    }
    output.display(&listing)
}

fn describe(model: &ClassModel, class: ClassId) -> ClassFields {
    let descriptor = model.get(class);
    let mut fields = Vec::new();
    let mut position = 0;

    for ancestor in ancestor_chain(model, class) {
        let owner = model.get(ancestor);
        for field in filter_instance_fields(&owner.fields) {
            position += 1;
            fields.push(FieldRow {
                position: Some(position),
                name: field.name.clone(),
                field_type: field.field_type.clone(),
                declared_in: owner.name.clone(),
                role: FieldRole::Inherited,
            });
        }
    }
    for field in &descriptor.fields {
        let role = if field.is_static { FieldRole::Static } else { FieldRole::Own };
        if role == FieldRole::Own {
            position += 1;
        }
        fields.push(FieldRow {
            position: (role == FieldRole::Own).then_some(position),
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            declared_in: descriptor.name.clone(),
            role,
        });
    }
    debug_assert_eq!(position, IdentityFields::of(model, class).len());

    ClassFields {
        class: descriptor.qualified_name(),
        superclass: descriptor.superclass.as_ref().map(|superclass| match superclass {
            Superclass::Defined(parent) => model.get(*parent).qualified_name(),
            Superclass::External(name) => name.clone(),
        }),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuegen::{ClassDescriptor, FieldDescriptor};

    fn model() -> (ClassModel, ClassId) {
        let mut model = ClassModel::new();
        let base = model
            .add_class(ClassDescriptor::new("B").with_field(FieldDescriptor::new("y", "int")))
            .unwrap();
        let child = model
            .add_class(
                ClassDescriptor::new("A")
                    .with_field(FieldDescriptor::new("x", "int"))
                    .with_field(FieldDescriptor::new_static("s", "int")),
            )
            .unwrap();
        model.extend(child, base).unwrap();
        (model, child)
    }

    #[test]
    fn test_describe_orders_inherited_first() {
        let (model, child) = model();
        let described = describe(&model, child);

        assert_eq!(described.superclass.as_deref(), Some("B"));
        let names: Vec<_> = described.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["y", "x", "s"]);
        assert_eq!(described.fields[0].role, FieldRole::Inherited);
        assert_eq!(described.fields[0].position, Some(1));
        assert_eq!(described.fields[1].position, Some(2));
        assert_eq!(described.fields[2].role, FieldRole::Static);
        assert_eq!(described.fields[2].position, None);
    }

    #[test]
    fn test_compact_lists_identity_fields_only() {
        let (model, child) = model();
        let listing = FieldListing {
            classes: vec![describe(&model, child)],
        };
        assert_eq!(listing.to_compact(), "A: y, x");
    }
}
