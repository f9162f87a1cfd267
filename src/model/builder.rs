//! Construction of the diff graph from a schema snapshot.
//!
//! Every schema element becomes a labeled vertex; containment, type
//! references, interface implementation and union membership become labeled
//! edges. Type references go through a dummy indirection vertex whose
//! incoming edge carries the rendered type signature, so changing a field's
//! type is a single edge relabel rather than a different-looking field.

use super::graph::SchemaGraph;
use super::schema::{
    AppliedDirective, ArgumentDefinition, DirectiveDefinition, FieldDefinition,
    InputFieldDefinition, Schema, TypeDefinition, TypeRef,
};
use super::vertex::{Vertex, VertexId, VertexKind};
use crate::error::{Result, SchemaDiffError};

/// Scalars every graph carries whether or not the snapshot mentions them, so
/// references to them resolve without declaration.
const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Build the diff graph for a schema snapshot.
///
/// # Errors
///
/// Returns [`SchemaDiffError::InvalidSchema`] when two type or directive
/// definitions share a name.
pub fn build_schema_graph(schema: &Schema) -> Result<SchemaGraph> {
    let mut builder = GraphBuilder::new();
    builder.add_definitions(schema)?;
    builder.add_members(schema);
    Ok(builder.graph)
}

struct GraphBuilder {
    graph: SchemaGraph,
}

impl GraphBuilder {
    fn new() -> Self {
        let mut graph = SchemaGraph::new();
        for name in BUILTIN_SCALARS {
            graph.add_vertex(Vertex::new(VertexKind::Scalar, name));
        }
        Self { graph }
    }

    /// First pass: one vertex per named type and directive definition, so
    /// that type references in the second pass resolve regardless of
    /// declaration order.
    fn add_definitions(&mut self, schema: &Schema) -> Result<()> {
        for type_def in &schema.types {
            let name = type_def.name();
            if BUILTIN_SCALARS.contains(&name) {
                // Redeclaring a builtin scalar is tolerated and collapses
                // onto the pre-registered vertex.
                if matches!(type_def, TypeDefinition::Scalar(_)) {
                    continue;
                }
                return Err(SchemaDiffError::invalid_schema(format!(
                    "type name conflicts with builtin scalar: {name}"
                )));
            }
            if self.graph.vertex_named(name).is_some() {
                return Err(SchemaDiffError::invalid_schema(format!(
                    "duplicate type definition: {name}"
                )));
            }
            let kind = match type_def {
                TypeDefinition::Object(_) => VertexKind::Object,
                TypeDefinition::Interface(_) => VertexKind::Interface,
                TypeDefinition::Union(_) => VertexKind::Union,
                TypeDefinition::Scalar(_) => VertexKind::Scalar,
                TypeDefinition::Enum(_) => VertexKind::Enum,
                TypeDefinition::InputObject(_) => VertexKind::InputObject,
            };
            let description = match type_def {
                TypeDefinition::Object(t) => t.description.as_deref(),
                TypeDefinition::Interface(t) => t.description.as_deref(),
                TypeDefinition::Union(t) => t.description.as_deref(),
                TypeDefinition::Scalar(t) => t.description.as_deref(),
                TypeDefinition::Enum(t) => t.description.as_deref(),
                TypeDefinition::InputObject(t) => t.description.as_deref(),
            };
            let mut vertex = Vertex::new(kind, name);
            if let Some(description) = description {
                vertex = vertex.with_property("description", description);
            }
            self.graph.add_vertex(vertex);
        }
        for directive in &schema.directives {
            let key = format!("@{}", directive.name);
            if self.graph.vertex_named(&key).is_some() {
                return Err(SchemaDiffError::invalid_schema(format!(
                    "duplicate directive definition: {key}"
                )));
            }
            let mut vertex = Vertex::new(VertexKind::Directive, &directive.name);
            if let Some(description) = &directive.description {
                vertex = vertex.with_property("description", description);
            }
            if directive.repeatable {
                vertex = vertex.with_property("repeatable", "true");
            }
            if !directive.locations.is_empty() {
                vertex = vertex.with_property("locations", directive.locations.join(" "));
            }
            self.graph.add_vertex(vertex);
        }
        Ok(())
    }

    /// Second pass: contained members and their edges.
    fn add_members(&mut self, schema: &Schema) {
        for type_def in &schema.types {
            // Builtin scalar redeclarations resolve to the pre-registered
            // vertex here, so their applied directives attach to it.
            let Some(container) = self.graph.vertex_named(type_def.name()) else {
                continue;
            };
            match type_def {
                TypeDefinition::Object(t) => {
                    for interface in &t.implements {
                        let target = self.resolve_type_name(interface);
                        self.graph
                            .add_edge(container, target, format!("implements {interface}"));
                    }
                    for field in &t.fields {
                        self.add_field(container, field);
                    }
                    self.add_applied_directives(container, &t.applied_directives);
                }
                TypeDefinition::Interface(t) => {
                    for interface in &t.implements {
                        let target = self.resolve_type_name(interface);
                        self.graph
                            .add_edge(container, target, format!("implements {interface}"));
                    }
                    for field in &t.fields {
                        self.add_field(container, field);
                    }
                    self.add_applied_directives(container, &t.applied_directives);
                }
                TypeDefinition::Union(t) => {
                    for member in &t.members {
                        let target = self.resolve_type_name(member);
                        self.graph.add_edge(container, target, "");
                    }
                    self.add_applied_directives(container, &t.applied_directives);
                }
                TypeDefinition::Scalar(t) => {
                    self.add_applied_directives(container, &t.applied_directives);
                }
                TypeDefinition::Enum(t) => {
                    for value in &t.values {
                        let mut vertex = Vertex::new(VertexKind::EnumValue, &value.name);
                        if let Some(description) = &value.description {
                            vertex = vertex.with_property("description", description);
                        }
                        let value_id = self.graph.add_vertex(vertex);
                        self.graph.add_edge(container, value_id, "");
                        self.add_applied_directives(value_id, &value.applied_directives);
                    }
                    self.add_applied_directives(container, &t.applied_directives);
                }
                TypeDefinition::InputObject(t) => {
                    for field in &t.input_fields {
                        self.add_input_field(container, field);
                    }
                    self.add_applied_directives(container, &t.applied_directives);
                }
            }
        }
        for directive in &schema.directives {
            let container = match self.graph.vertex_named(&format!("@{}", directive.name)) {
                Some(id) => id,
                None => continue,
            };
            for argument in &directive.arguments {
                self.add_argument(container, argument);
            }
        }
    }

    fn add_field(&mut self, container: VertexId, field: &FieldDefinition) {
        let mut vertex = Vertex::new(VertexKind::Field, &field.name);
        if let Some(description) = &field.description {
            vertex = vertex.with_property("description", description);
        }
        let field_id = self.graph.add_vertex(vertex);
        self.graph.add_edge(container, field_id, "");
        self.add_type_reference(field_id, &field.type_ref);
        for argument in &field.arguments {
            self.add_argument(field_id, argument);
        }
        self.add_applied_directives(field_id, &field.applied_directives);
    }

    fn add_argument(&mut self, container: VertexId, argument: &ArgumentDefinition) {
        let mut vertex = Vertex::new(VertexKind::Argument, &argument.name);
        if let Some(description) = &argument.description {
            vertex = vertex.with_property("description", description);
        }
        if let Some(default) = &argument.default_value {
            vertex = vertex.with_property("defaultValue", default);
        }
        let argument_id = self.graph.add_vertex(vertex);
        self.graph.add_edge(container, argument_id, "");
        self.add_type_reference(argument_id, &argument.type_ref);
        self.add_applied_directives(argument_id, &argument.applied_directives);
    }

    fn add_input_field(&mut self, container: VertexId, field: &InputFieldDefinition) {
        let mut vertex = Vertex::new(VertexKind::InputField, &field.name);
        if let Some(description) = &field.description {
            vertex = vertex.with_property("description", description);
        }
        if let Some(default) = &field.default_value {
            vertex = vertex.with_property("defaultValue", default);
        }
        let field_id = self.graph.add_vertex(vertex);
        self.graph.add_edge(container, field_id, "");
        self.add_type_reference(field_id, &field.type_ref);
        self.add_applied_directives(field_id, &field.applied_directives);
    }

    /// Type reference indirection: `holder --"[User!]!"--> dummy --""--> User`.
    /// The signature lives on the first edge; the dummy itself is anonymous,
    /// so a signature change is one relabel in the edit script.
    fn add_type_reference(&mut self, holder: VertexId, type_ref: &TypeRef) {
        let dummy = self.graph.add_vertex(Vertex::new(VertexKind::DummyType, ""));
        self.graph.add_edge(holder, dummy, type_ref.rendered());
        let target = self.resolve_type_name(type_ref.base_name());
        self.graph.add_edge(dummy, target, "");
    }

    fn add_applied_directives(&mut self, host: VertexId, directives: &[AppliedDirective]) {
        for directive in directives {
            let directive_id = self
                .graph
                .add_vertex(Vertex::new(VertexKind::AppliedDirective, &directive.name));
            self.graph.add_edge(host, directive_id, "");
            for argument in &directive.arguments {
                let vertex = Vertex::new(VertexKind::AppliedArgument, &argument.name)
                    .with_property("value", &argument.value);
                let argument_id = self.graph.add_vertex(vertex);
                self.graph.add_edge(directive_id, argument_id, "");
            }
        }
    }

    /// Resolve a named type, creating a scalar placeholder for names the
    /// snapshot references but never declares.
    fn resolve_type_name(&mut self, name: &str) -> VertexId {
        match self.graph.vertex_named(name) {
            Some(id) => id,
            None => self.graph.add_vertex(Vertex::new(VertexKind::Scalar, name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::{EnumType, EnumValueDefinition, ObjectType};

    fn user_schema() -> Schema {
        Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("User")
                .with_field(FieldDefinition::new("id", TypeRef::new("ID!")))
                .with_field(
                    FieldDefinition::new("friends", TypeRef::new("[User!]"))
                        .with_argument(ArgumentDefinition::new("limit", TypeRef::new("Int"))),
                ),
        ))
    }

    #[test]
    fn test_builtin_scalars_always_present() {
        let graph = build_schema_graph(&Schema::new()).unwrap();
        assert_eq!(graph.vertex_count(), 5);
        for name in BUILTIN_SCALARS {
            let id = graph.vertex_named(name).unwrap();
            assert_eq!(graph.vertex(id).kind, VertexKind::Scalar);
        }
    }

    #[test]
    fn test_field_type_goes_through_anonymous_dummy() {
        let graph = build_schema_graph(&user_schema()).unwrap();
        let user = graph.vertex_named("User").unwrap();
        let id_field = graph
            .adjacent_edges(user)
            .iter()
            .map(|e| graph.edge(*e).to)
            .find(|v| graph.vertex(*v).name() == "id")
            .unwrap();
        let type_edge = graph.adjacent_edges(id_field);
        assert_eq!(type_edge.len(), 1);
        let edge = graph.edge(type_edge[0]);
        assert_eq!(edge.label, "ID!");
        let dummy = graph.vertex(edge.to);
        assert_eq!(dummy.kind, VertexKind::DummyType);
        assert_eq!(dummy.name(), "");
        let resolved = graph.edge_between(edge.to, graph.vertex_named("ID").unwrap());
        assert_eq!(resolved.unwrap().label, "");
    }

    #[test]
    fn test_recursive_type_reference_resolves() {
        let graph = build_schema_graph(&user_schema()).unwrap();
        let user = graph.vertex_named("User").unwrap();
        let friends = graph
            .adjacent_edges(user)
            .iter()
            .map(|e| graph.edge(*e).to)
            .find(|v| graph.vertex(*v).name() == "friends")
            .unwrap();
        let dummy_edge = graph
            .adjacent_edges(friends)
            .iter()
            .map(|e| graph.edge(*e))
            .find(|e| e.label == "[User!]")
            .unwrap();
        assert!(graph.edge_between(dummy_edge.to, user).is_some());
    }

    #[test]
    fn test_undeclared_type_becomes_scalar_placeholder() {
        let schema = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("when", TypeRef::new("DateTime"))),
        ));
        let graph = build_schema_graph(&schema).unwrap();
        let placeholder = graph.vertex_named("DateTime").unwrap();
        assert_eq!(graph.vertex(placeholder).kind, VertexKind::Scalar);
    }

    #[test]
    fn test_duplicate_type_definition_rejected() {
        let schema = Schema::new()
            .with_type(TypeDefinition::Object(ObjectType::new("User")))
            .with_type(TypeDefinition::Object(ObjectType::new("User")));
        let err = build_schema_graph(&schema).unwrap_err();
        assert!(matches!(err, SchemaDiffError::InvalidSchema(_)));
    }

    #[test]
    fn test_enum_values_and_applied_directives() {
        let schema = Schema::new().with_type(TypeDefinition::Enum(
            EnumType::new("Role").with_value(
                EnumValueDefinition::new("ADMIN").with_applied_directive(
                    AppliedDirective::new("deprecated").with_argument("reason", "use ROOT"),
                ),
            ),
        ));
        let graph = build_schema_graph(&schema).unwrap();
        let role = graph.vertex_named("Role").unwrap();
        let admin = graph.edge(graph.adjacent_edges(role)[0]).to;
        assert_eq!(graph.vertex(admin).kind, VertexKind::EnumValue);
        let applied = graph.edge(graph.adjacent_edges(admin)[0]).to;
        assert_eq!(graph.vertex(applied).kind, VertexKind::AppliedDirective);
        assert_eq!(graph.vertex(applied).name(), "deprecated");
        let argument = graph.edge(graph.adjacent_edges(applied)[0]).to;
        assert_eq!(graph.vertex(argument).property("value"), Some("use ROOT"));
        assert_eq!(graph.qualified_name(argument), "Role.ADMIN.@deprecated.reason");
    }

    #[test]
    fn test_implements_edge_label() {
        let schema = Schema::new()
            .with_type(TypeDefinition::Interface(
                crate::model::schema::InterfaceType::new("Node")
                    .with_field(FieldDefinition::new("id", TypeRef::new("ID!"))),
            ))
            .with_type(TypeDefinition::Object(
                ObjectType::new("User")
                    .with_interface("Node")
                    .with_field(FieldDefinition::new("id", TypeRef::new("ID!"))),
            ));
        let graph = build_schema_graph(&schema).unwrap();
        let user = graph.vertex_named("User").unwrap();
        let node = graph.vertex_named("Node").unwrap();
        assert_eq!(
            graph.edge_between(user, node).unwrap().label,
            "implements Node"
        );
    }
}
