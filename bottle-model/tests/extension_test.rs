use bottle_model::{
    Extension, Field, FieldDefinition, HookAction, IndexMerge, IndexSpec, Model, ModelBuilder, Schema, Settings,
    Statics, TypeRef,
};
use serde_json::json;

struct Timestamps;

impl Model for Timestamps {
    fn model_name() -> &'static str {
        "Timestamps"
    }

    fn schema(schema: &mut Schema) {
        schema
            .field("created_at", Field::new("DATE").allow_null(false))
            .field("updated_at", Field::new("DATE").allow_null(false))
            .field("label", "STRING")
            .field("b", Field::new("INTEGER").default_value(1))
            .instance_method("touch", |_row, _args| json!("timestamps"));
    }

    fn statics(statics: &mut Statics) {
        statics
            .hook("stamp", HookAction::BeforeSave, |_row| Ok(()))
            .index(IndexSpec::new(["created_at"]))
            .scope("recent", json!({ "order": [["created_at", "DESC"]], "limit": 10 }))
            .default_scope(json!({ "where": { "deleted_at": null } }));
    }
}

struct Auditable;

impl Model for Auditable {
    fn model_name() -> &'static str {
        "Auditable"
    }

    fn schema(schema: &mut Schema) {
        schema
            .field("b", Field::new("INTEGER").default_value(2))
            .field("audited_by", "STRING")
            .instance_method("touch", |_row, _args| json!("auditable"));
    }

    fn statics(statics: &mut Statics) {
        statics
            .hook("audit", HookAction::AfterSave, |_row| Ok(()))
            .index(IndexSpec::new(["audited_by"]))
            .index(IndexSpec::new(["created_at"]))
            .scope("recent", json!({ "limit": 5 }));
    }
}

struct Document;

impl Model for Document {
    fn model_name() -> &'static str {
        "Document"
    }

    fn schema(schema: &mut Schema) {
        schema.field("title", Field::new("TEXT").allow_null(false)).field("label", "INTEGER");
    }

    fn statics(statics: &mut Statics) {
        statics
            .hook("stamp", HookAction::BeforeCreate, |_row| Ok(()))
            .index(IndexSpec::new(["title"]).unique())
            .default_scope(json!({ "where": { "published": true } }));
    }

    fn extensions() -> Vec<Extension> {
        vec![Extension::of::<Timestamps>(), Extension::of::<Auditable>()]
    }
}

struct Override;

impl Model for Override {
    fn model_name() -> &'static str {
        "Override"
    }

    fn schema(schema: &mut Schema) {
        schema.field("b", Field::new("BIGINT").default_value(3));
    }

    fn extensions() -> Vec<Extension> {
        vec![Extension::of::<Timestamps>(), Extension::of::<Auditable>()]
    }
}

#[test]
fn test_own_field_wins_over_extension() -> Result<(), Box<dyn std::error::Error>> {
    let definition = Document::builder().into_definition();

    // Timestamps declares `label: STRING`, the model declares `label: INTEGER`
    assert_eq!(definition.field("label"), Some(&FieldDefinition::from("INTEGER")));
    assert_eq!(definition.hooks["stamp"].action, HookAction::BeforeCreate);

    println!("Merge precedence test passed!");
    Ok(())
}

#[test]
fn test_later_extension_wins_over_earlier() -> Result<(), Box<dyn std::error::Error>> {
    let definition = Document::builder().into_definition();

    let Some(FieldDefinition::Options(b)) = definition.field("b") else { panic!("expected options-form field") };
    assert_eq!(b.options["defaultValue"], json!(2));
    assert_eq!((definition.instance_methods["touch"])(&serde_json::Map::new(), &[]), json!("auditable"));

    let own = Override::builder().into_definition();
    let Some(FieldDefinition::Options(b)) = own.field("b") else { panic!("expected options-form field") };
    assert_eq!(b.ty, TypeRef::from("BIGINT"));
    assert_eq!(b.options["defaultValue"], json!(3));
    Ok(())
}

#[test]
fn test_every_bucket_is_merged() -> Result<(), Box<dyn std::error::Error>> {
    let definition = Document::builder().into_definition();

    assert_eq!(definition.attributes(), vec!["created_at", "updated_at", "label", "b", "audited_by", "title"]);
    assert_eq!(definition.hooks.keys().collect::<Vec<_>>(), vec!["stamp", "audit"]);
    assert_eq!(definition.scopes["recent"], json!({ "order": [["created_at", "DESC"]], "limit": 5 }));
    assert_eq!(definition.default_scope, json!({ "where": { "deleted_at": null, "published": true } }));
    Ok(())
}

#[test]
fn test_indexes_concatenate_in_extension_order() -> Result<(), Box<dyn std::error::Error>> {
    let definition = Document::builder().into_definition();
    let order: Vec<String> = definition.indexes.iter().map(ToString::to_string).collect();

    assert_eq!(order, vec!["(created_at)", "(audited_by)", "(created_at)", "UNIQUE (title)"]);
    Ok(())
}

#[test]
fn test_index_dedup_drops_only_identical_specs() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new().index_merge(IndexMerge::DedupIdentical);
    let definition = ModelBuilder::with_settings::<Document>(settings).into_definition();

    assert_eq!(definition.indexes, vec![
        IndexSpec::new(["created_at"]),
        IndexSpec::new(["audited_by"]),
        IndexSpec::new(["title"]).unique(),
    ]);
    Ok(())
}

#[test]
fn test_no_extensions_leaves_buckets_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let definition = Timestamps::builder().into_definition();

    assert_eq!(definition.attributes(), vec!["created_at", "updated_at", "label", "b"]);
    assert_eq!(definition.indexes, vec![IndexSpec::new(["created_at"])]);
    assert_eq!(definition.default_scope, json!({ "where": { "deleted_at": null } }));
    Ok(())
}

#[test]
fn test_extension_options_are_not_inherited() -> Result<(), Box<dyn std::error::Error>> {
    struct Paranoid;

    impl Model for Paranoid {
        fn model_name() -> &'static str {
            "Paranoid"
        }

        fn schema(schema: &mut Schema) {
            schema.field("deleted_at", "DATE");
        }

        fn statics(statics: &mut Statics) {
            statics.paranoid(true);
        }
    }

    struct Note;

    impl Model for Note {
        fn model_name() -> &'static str {
            "Note"
        }

        fn schema(schema: &mut Schema) {
            schema.field("body", "TEXT");
        }

        fn statics(statics: &mut Statics) {
            statics.table_name("notes");
        }

        fn extensions() -> Vec<Extension> {
            vec![Extension::of::<Paranoid>()]
        }
    }

    let definition = Note::builder().into_definition();
    assert_eq!(definition.name, "Note");
    assert_eq!(definition.table_name(), "notes");
    assert_eq!(definition.options.paranoid, None);
    assert!(definition.fields.contains_key("deleted_at"));
    Ok(())
}

struct Tagged;

impl Model for Tagged {
    fn model_name() -> &'static str {
        "Tagged"
    }

    fn schema(schema: &mut Schema) {
        schema.field("tag", "STRING");
    }

    fn statics(statics: &mut Statics) {
        statics.index(IndexSpec::new(["tag"])).index(IndexSpec::new(["tag"]));
    }
}

#[test]
fn test_index_dedup_applies_without_extensions() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new().index_merge(IndexMerge::DedupIdentical);
    let deduped = ModelBuilder::with_settings::<Tagged>(settings).into_definition();
    assert_eq!(deduped.indexes, vec![IndexSpec::new(["tag"])]);

    let concatenated = Tagged::builder().into_definition();
    assert_eq!(concatenated.indexes.len(), 2);

    println!("Own index dedup test passed!");
    Ok(())
}

#[test]
fn test_extension_settings_apply_to_its_own_merge() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new().index_merge(IndexMerge::DedupIdentical);

    let deduped = Extension::of_with_settings::<Tagged>(settings);
    assert_eq!(deduped.name(), "Tagged");
    assert_eq!(deduped.definition().indexes, vec![IndexSpec::new(["tag"])]);

    let defaulted = Extension::of::<Tagged>();
    assert_eq!(defaulted.definition().indexes.len(), 2);
    Ok(())
}
