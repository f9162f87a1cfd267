//! End-to-end diff scenarios over schema snapshots.

use graphql_ged::{
    AppliedDirective, ArgumentDefinition, CancellationToken, DiffEngine, DiffResult, EditOperation,
    EnumType, EnumValueDefinition, FieldDefinition, InterfaceType, ObjectType, Schema,
    SchemaDiffError, TypeDefinition, TypeRef, UnionType, VertexKind,
};

fn diff(source: &Schema, target: &Schema) -> DiffResult {
    DiffEngine::new().diff(source, target).unwrap()
}

fn query_with_fields(fields: &[(&str, &str)]) -> Schema {
    let mut object = ObjectType::new("Query");
    for (name, type_ref) in fields {
        object = object.with_field(FieldDefinition::new(*name, TypeRef::new(*type_ref)));
    }
    Schema::new().with_type(TypeDefinition::Object(object))
}

fn count_ops(result: &DiffResult, pred: impl Fn(&EditOperation) -> bool) -> usize {
    result.operations.iter().filter(|op| pred(op)).count()
}

#[test]
fn empty_schemas_are_identical() {
    let result = diff(&Schema::new(), &Schema::new());
    assert!(result.is_unchanged());
    assert!(result.operations.is_empty());
}

#[test]
fn identical_schemas_diff_to_zero() {
    let schema = query_with_fields(&[("user", "String"), ("posts", "[Post!]")]);
    let result = diff(&schema, &schema);
    assert!(result.is_unchanged());
}

#[test]
fn added_field_costs_vertices_and_edges() {
    let source = query_with_fields(&[("user", "String")]);
    let target = query_with_fields(&[("user", "String"), ("name", "String")]);
    let result = diff(&source, &target);
    // Field vertex, anonymous type indirection vertex, and three edges.
    assert_eq!(result.ged, 5);
    assert_eq!(result.operations.len(), 5);
    let field_inserts = count_ops(&result, |op| {
        matches!(op, EditOperation::InsertVertex { target } if target.kind == VertexKind::Field)
    });
    assert_eq!(field_inserts, 1);
}

#[test]
fn field_rename_costs_one() {
    let source = query_with_fields(&[("id", "ID"), ("email", "String")]);
    let target = query_with_fields(&[("uid", "ID"), ("email", "String")]);
    let result = diff(&source, &target);
    assert_eq!(result.ged, 1);
    assert!(matches!(
        &result.operations[0],
        EditOperation::ChangeVertex { source, target }
            if source.name() == "id" && target.name() == "uid"
    ));
}

#[test]
fn type_rename_costs_one() {
    let user = |name: &str| {
        Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new(name)
                .with_field(FieldDefinition::new("id", TypeRef::new("ID!")))
                .with_field(FieldDefinition::new("email", TypeRef::new("String"))),
        ))
    };
    let result = diff(&user("User"), &user("Person"));
    assert_eq!(result.ged, 1);
    assert!(matches!(
        &result.operations[0],
        EditOperation::ChangeVertex { source, target }
            if source.name() == "User" && target.name() == "Person"
    ));
}

#[test]
fn nullability_change_is_one_edge_relabel() {
    let source = query_with_fields(&[("age", "Int")]);
    let target = query_with_fields(&[("age", "Int!")]);
    let result = diff(&source, &target);
    assert_eq!(result.ged, 1);
    assert!(matches!(
        &result.operations[0],
        EditOperation::ChangeEdge { source_label, target_label, .. }
            if source_label == "Int" && target_label == "Int!"
    ));
}

#[test]
fn description_change_is_one_vertex_change() {
    let source = Schema::new().with_type(TypeDefinition::Object(
        ObjectType::new("Query")
            .with_field(FieldDefinition::new("user", TypeRef::new("String"))),
    ));
    let target = Schema::new().with_type(TypeDefinition::Object(
        ObjectType::new("Query").with_field(
            FieldDefinition::new("user", TypeRef::new("String"))
                .with_description("The current user"),
        ),
    ));
    let result = diff(&source, &target);
    assert_eq!(result.ged, 1);
}

#[test]
fn added_enum_value_costs_vertex_and_edge() {
    let role = |values: &[&str]| {
        let mut role = EnumType::new("Role");
        for value in values {
            role = role.with_value(EnumValueDefinition::new(*value));
        }
        Schema::new().with_type(TypeDefinition::Enum(role))
    };
    let result = diff(&role(&["ADMIN", "USER"]), &role(&["ADMIN", "USER", "GUEST"]));
    assert_eq!(result.ged, 2);
}

#[test]
fn added_union_member_costs_one_edge() {
    let schema = |members: &[&str]| {
        let mut media = UnionType::new("Media");
        for member in members {
            media = media.with_member(*member);
        }
        Schema::new()
            .with_type(TypeDefinition::Object(ObjectType::new("Photo")))
            .with_type(TypeDefinition::Object(ObjectType::new("Video")))
            .with_type(TypeDefinition::Union(media))
    };
    let result = diff(&schema(&["Photo"]), &schema(&["Photo", "Video"]));
    assert_eq!(result.ged, 1);
    assert!(matches!(
        &result.operations[0],
        EditOperation::InsertEdge { from, to, .. } if from == "Media" && to == "Video"
    ));
}

#[test]
fn newly_implemented_interface_costs_one_edge() {
    let node = InterfaceType::new("Node")
        .with_field(FieldDefinition::new("id", TypeRef::new("ID!")));
    let user = |implements: bool| {
        let mut user =
            ObjectType::new("User").with_field(FieldDefinition::new("id", TypeRef::new("ID!")));
        if implements {
            user = user.with_interface("Node");
        }
        Schema::new()
            .with_type(TypeDefinition::Interface(node.clone()))
            .with_type(TypeDefinition::Object(user))
    };
    let result = diff(&user(false), &user(true));
    assert_eq!(result.ged, 1);
    assert!(matches!(
        &result.operations[0],
        EditOperation::InsertEdge { label, .. } if label == "implements Node"
    ));
}

#[test]
fn applied_directive_with_argument_costs_four() {
    let schema = |deprecated: bool| {
        let mut field = FieldDefinition::new("legacy", TypeRef::new("String"));
        if deprecated {
            field = field.with_applied_directive(
                AppliedDirective::new("deprecated").with_argument("reason", "use modern"),
            );
        }
        Schema::new().with_type(TypeDefinition::Object(ObjectType::new("Query").with_field(field)))
    };
    let result = diff(&schema(false), &schema(true));
    // Applied directive vertex, applied argument vertex, and their two edges.
    assert_eq!(result.ged, 4);
}

#[test]
fn added_directive_definition() {
    let source = Schema::new();
    let target = Schema::new().with_directive(
        graphql_ged::DirectiveDefinition::new("auth")
            .with_argument(ArgumentDefinition::new("role", TypeRef::new("String")))
            .with_location("FIELD_DEFINITION"),
    );
    let result = diff(&source, &target);
    // Directive, argument and dummy vertices plus three edges.
    assert_eq!(result.ged, 6);
}

#[test]
fn distance_is_symmetric_with_inverted_operations() {
    let a = query_with_fields(&[("user", "String")]);
    let b = query_with_fields(&[("user", "String"), ("age", "Int"), ("tags", "[String]")]);
    let forward = diff(&a, &b);
    let backward = diff(&b, &a);
    assert_eq!(forward.ged, backward.ged);
    let inserts = |r: &DiffResult| {
        count_ops(r, |op| matches!(op, EditOperation::InsertVertex { .. }))
    };
    let deletes = |r: &DiffResult| {
        count_ops(r, |op| matches!(op, EditOperation::DeleteVertex { .. }))
    };
    assert_eq!(inserts(&forward), deletes(&backward));
    assert_eq!(deletes(&forward), inserts(&backward));
}

#[test]
fn operation_count_always_equals_distance() {
    let scenarios = [
        (query_with_fields(&[]), query_with_fields(&[("a", "Int")])),
        (
            query_with_fields(&[("a", "Int"), ("b", "String")]),
            query_with_fields(&[("c", "Int"), ("d", "String")]),
        ),
        (
            query_with_fields(&[("a", "Int")]),
            query_with_fields(&[("a", "[Int!]!")]),
        ),
    ];
    for (source, target) in &scenarios {
        let result = diff(source, target);
        assert_eq!(result.operations.len(), result.ged);
    }
}

#[test]
fn renamed_fields_search_finds_minimum() {
    // Two fields renamed in place forces the branch-and-bound search; types
    // disambiguate which field became which.
    let source = query_with_fields(&[("a", "Int"), ("b", "String")]);
    let target = query_with_fields(&[("x", "Int"), ("y", "String")]);
    let result = diff(&source, &target);
    assert_eq!(result.ged, 2);
    let renames: Vec<(String, String)> = result
        .operations
        .iter()
        .filter_map(|op| match op {
            EditOperation::ChangeVertex { source, target } => {
                Some((source.name().to_string(), target.name().to_string()))
            }
            _ => None,
        })
        .collect();
    assert!(renames.contains(&("a".to_string(), "x".to_string())));
    assert!(renames.contains(&("b".to_string(), "y".to_string())));
}

#[test]
fn pre_stopped_token_cancels_immediately() {
    let token = CancellationToken::new();
    token.stop();
    let engine = DiffEngine::new().with_cancellation(token);
    let schema = query_with_fields(&[("user", "String")]);
    let err = engine.diff(&schema, &schema).unwrap_err();
    assert!(matches!(err, SchemaDiffError::Cancelled));
}

#[test]
fn duplicate_type_definition_is_rejected() {
    let bad = Schema::new()
        .with_type(TypeDefinition::Object(ObjectType::new("User")))
        .with_type(TypeDefinition::Object(ObjectType::new("User")));
    let err = DiffEngine::new().diff(&bad, &Schema::new()).unwrap_err();
    assert!(matches!(err, SchemaDiffError::InvalidSchema(_)));
}

#[test]
fn diff_result_serializes_to_json() {
    let source = query_with_fields(&[("id", "ID")]);
    let target = query_with_fields(&[("uid", "ID")]);
    let result = diff(&source, &target);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["ged"], 1);
    assert_eq!(json["operations"][0]["op"], "change_vertex");
}
