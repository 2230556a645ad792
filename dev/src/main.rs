use std::collections::HashMap;

use bottle_model::{
    Error, Extension, HookAction, HookFn, HookRegistry, IndexSpec, Model, ModelDefinition, OrmModel, Registrar,
    Schema, Statics, TypeRegistry,
};
use chrono::{DateTime, Utc};
use log::info;
use serde_json::{json, Value};

#[derive(Model, Debug, Clone)]
struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Model, Debug, Clone)]
#[model(members = user_members, statics = user_statics, extensions(Timestamps))]
struct User {
    #[model(primary_key, auto_increment)]
    id: i64,
    #[model(size = 50, unique)]
    username: String,
    age: Option<i32>,
}

fn user_members(schema: &mut Schema) {
    schema.getter("handle", |row| {
        let name = row.get("username").and_then(Value::as_str).unwrap_or_default();
        json!(format!("@{name}"))
    });
}

fn user_statics(statics: &mut Statics) {
    statics
        .validate("adult", |row| match row.get("age").and_then(Value::as_i64) {
            Some(age) if age < 18 => Err("must be an adult".to_string()),
            _ => Ok(()),
        })
        .hook("trim_username", HookAction::BeforeSave, |row| {
            if let Some(Value::String(name)) = row.get_mut("username") {
                *name = name.trim().to_string();
            }
            Ok(())
        })
        .scope("adults", json!({ "where": { "age": { "gte": 18 } } }));
}

struct Post;

impl Model for Post {
    fn model_name() -> &'static str {
        "Post"
    }

    fn schema(schema: &mut Schema) {
        schema.field("title", "STRING").field("body", "TEXT");
    }

    fn statics(statics: &mut Statics) {
        statics.index(IndexSpec::new(["title"]));
    }

    fn extensions() -> Vec<Extension> {
        vec![Extension::of::<Timestamps>()]
    }
}

/// A toy ORM: keeps defined models and their hook tables.
#[derive(Default)]
struct ToyOrm {
    models: HashMap<String, ToyModel>,
}

struct ToyModel {
    definition: ModelDefinition,
    hooks: Vec<(HookAction, String, HookFn)>,
}

impl HookRegistry for ToyModel {
    fn add_hook(&mut self, action: HookAction, name: &str, handler: HookFn) {
        self.hooks.push((action, name.to_string(), handler));
    }
}

impl OrmModel for ToyModel {
    fn hook_registry(&mut self) -> Option<&mut dyn HookRegistry> {
        Some(self as &mut dyn HookRegistry)
    }
}

impl ToyOrm {
    fn define(&mut self, definition: ModelDefinition) -> &mut ToyModel {
        let name = definition.name.clone();
        self.models.entry(name).or_insert(ToyModel { definition, hooks: Vec::new() })
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let mut orm = ToyOrm::default();

    // Resolve types for every model, then hand the definitions to the ORM
    let definitions = Registrar::new().register::<User>().register::<Post>().run(&orm, &TypeRegistry::builtin())?;
    for definition in definitions {
        info!("Defining `{}` as table `{}`", definition.name, definition.table_name());
        println!("{:#}", definition.describe());
        orm.define(definition);
    }

    // Hooks can only be declared once the ORM-side model exists
    let mut user = User::builder();
    if let Some(model) = orm.models.get_mut("User") {
        user.declare_hooks(model)?;

        let mut row = serde_json::Map::new();
        row.insert("username".to_string(), json!("  alice  "));
        row.insert("age".to_string(), json!(30));
        for (action, name, hook) in &model.hooks {
            if let Err(reason) = hook(&mut row) {
                println!("hook {name} ({action}) rejected the row: {reason}");
            }
        }
        for (name, validate) in &model.definition.validators {
            if let Err(reason) = validate(&row) {
                println!("validator {name} failed: {reason}");
            }
        }
        if let Some(handle) = model.definition.getter_methods.get("handle") {
            println!("User handle: {}", handle(&row));
        }
    }

    println!("Models defined: {}", orm.models.len());
    Ok(())
}
