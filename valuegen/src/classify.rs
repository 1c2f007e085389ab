//! Field classification: which fields define a class's identity.
//!
//! Identity fields are the instance (non-static) fields of a class and of all
//! its in-model ancestors, ordered from the root of the hierarchy down to the
//! class itself, each class's fields in declaration order.

use std::collections::HashSet;

use crate::model::{ClassId, ClassModel, FieldDescriptor};

/// Keep only the instance fields, preserving order.
pub fn filter_instance_fields<'a, I>(fields: I) -> Vec<&'a FieldDescriptor>
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    fields.into_iter().filter(|field| !field.is_static).collect()
}

/// In-model ancestors of `class`, most distant first.
///
/// The walk stops at the first superclass that is absent or external to the
/// model. Each ancestor appears at most once, even if the superclass links
/// were built into a cycle, and `class` itself never does.
pub fn ancestor_chain(model: &ClassModel, class: ClassId) -> Vec<ClassId> {
    let mut visited = HashSet::from([class]);
    let mut chain = Vec::new();
    let mut current = model.superclass_of(class);

    while let Some(ancestor) = current {
        if !visited.insert(ancestor) {
            break;
        }
        chain.push(ancestor);
        current = model.superclass_of(ancestor);
    }

    chain.reverse();
    chain
}

/// All fields (static included) declared by the in-model ancestors of `class`,
/// most distant ancestor first.
pub fn collect_superclass_fields(model: &ClassModel, class: ClassId) -> Vec<&FieldDescriptor> {
    ancestor_chain(model, class)
        .into_iter()
        .flat_map(|ancestor| model.get(ancestor).fields.iter())
        .collect()
}

/// Ancestor instance fields followed by the class's own instance fields.
pub fn identity_fields(model: &ClassModel, class: ClassId) -> IdentityFields<'_> {
    IdentityFields::of(model, class)
}

/// Identity fields of one class, split by where they are declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityFields<'m> {
    /// Instance fields of in-model ancestors, root first.
    pub ancestors: Vec<&'m FieldDescriptor>,
    /// Instance fields declared on the class itself.
    pub own: Vec<&'m FieldDescriptor>,
}

impl<'m> IdentityFields<'m> {
    pub fn of(model: &'m ClassModel, class: ClassId) -> Self {
        Self {
            ancestors: filter_instance_fields(collect_superclass_fields(model, class)),
            own: filter_instance_fields(&model.get(class).fields),
        }
    }

    /// Ancestor fields followed by own fields.
    pub fn iter(&self) -> impl Iterator<Item = &'m FieldDescriptor> + '_ {
        self.ancestors.iter().chain(self.own.iter()).copied()
    }

    pub fn names(&self) -> Vec<&'m str> {
        self.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.ancestors.len() + self.own.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty() && self.own.is_empty()
    }
}
