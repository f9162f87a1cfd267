//! In-memory schema snapshot model.
//!
//! A deliberately small mirror of a GraphQL schema document: enough structure
//! to build the diff graph from, nothing more. All containers use
//! builder-style `with_*` methods so tests and callers can assemble snapshots
//! inline.

use serde::{Deserialize, Serialize};

/// A schema snapshot: the named type definitions plus directive definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub types: Vec<TypeDefinition>,
    pub directives: Vec<DirectiveDefinition>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, type_def: TypeDefinition) -> Self {
        self.types.push(type_def);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: DirectiveDefinition) -> Self {
        self.directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeDefinition {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Scalar(ScalarType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl TypeDefinition {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Scalar(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }
}

/// A type reference as written in the schema, modifiers included
/// (`[User!]!`). The rendered form is compared verbatim by the diff, so
/// nullability and list changes surface as type changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef(pub String);

impl TypeRef {
    #[must_use]
    pub fn new(rendered: impl Into<String>) -> Self {
        Self(rendered.into())
    }

    /// The full type signature, modifiers included.
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.0
    }

    /// The named type with list and non-null modifiers stripped.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.0.trim_matches(|c| c == '[' || c == ']' || c == '!')
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl ObjectType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.implements.push(name.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl InterfaceType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.implements.push(name.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl UnionType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.members.push(name.into());
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl ScalarType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDefinition>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl EnumType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: EnumValueDefinition) -> Self {
        self.values.push(value);
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl EnumValueDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub input_fields: Vec<InputFieldDefinition>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl InputObjectType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_input_field(mut self, field: InputFieldDefinition) -> Self {
        self.input_fields.push(field);
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub arguments: Vec<ArgumentDefinition>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl FieldDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref,
            arguments: Vec::new(),
            applied_directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub default_value: Option<String>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl ArgumentDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref,
            default_value: None,
            applied_directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub default_value: Option<String>,
    pub applied_directives: Vec<AppliedDirective>,
}

impl InputFieldDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_ref,
            default_value: None,
            applied_directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_applied_directive(mut self, directive: AppliedDirective) -> Self {
        self.applied_directives.push(directive);
        self
    }
}

/// A directive definition (`directive @deprecated(...) on FIELD_DEFINITION`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<ArgumentDefinition>,
    pub repeatable: bool,
    pub locations: Vec<String>,
}

impl DirectiveDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    #[must_use]
    pub const fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }
}

/// A directive applied to a schema element, with its concrete arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppliedDirective {
    pub name: String,
    pub arguments: Vec<AppliedArgument>,
}

impl AppliedDirective {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push(AppliedArgument {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedArgument {
    pub name: String,
    pub value: String,
}
