//! Declarative JSON emission: pack metadata, items, recipes,
//! advancements, tags, and the Minecraft lifecycle tags.
//!
//! All JSON files are pretty-printed with two-space indent and end with
//! a newline.

use dplc_lex::{Token, TokenKind};
use dplc_par::{Advancement, ItemDef, Recipe, RecipeKind, Script, TagDef};
use serde_json::{json, Map, Value};

use crate::files::{render_function, FileSet};
use crate::names::{escape_quoted, function_path};
use crate::PackCtx;

/// Serialize a JSON value the way every descriptor file wants it.
fn pretty(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}

/// `pack.mcmeta` for the whole compilation; multi-pack scripts join
/// their titles in pack order.
pub(crate) fn emit_pack_mcmeta(files: &mut FileSet, script: &Script) {
    let description = script
        .iter()
        .map(|p| p.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let value = json!({
        "pack": {
            "pack_format": 48,
            "description": description,
        }
    });
    files.upsert("pack.mcmeta", pretty(&value));
}

/// The Minecraft lifecycle tags. `load.json` always exists (bootstrap
/// and init are unconditional); `tick.json` only when a tick function
/// was declared.
pub(crate) fn emit_lifecycle_tags(files: &mut FileSet, load: &[String], tick: &[String]) {
    let value = json!({ "values": load });
    files.upsert("data/minecraft/tags/function/load.json", pretty(&value));

    if !tick.is_empty() {
        let value = json!({ "values": tick });
        files.upsert("data/minecraft/tags/function/tick.json", pretty(&value));
    }
}

/// One parsed component entry: key plus its raw value tokens.
struct ComponentEntry<'t> {
    key: String,
    value: &'t [Token],
}

/// Split a raw component token slice into `key = value` entries at
/// top-level commas.
fn split_components(tokens: &[Token]) -> Vec<ComponentEntry<'_>> {
    fn flush<'t>(
        tokens: &'t [Token],
        start: usize,
        end: usize,
        entries: &mut Vec<ComponentEntry<'t>>,
    ) {
        let slice = &tokens[start..end];
        if slice.is_empty() {
            return;
        }
        let key = slice[0].value.clone();
        let value = if slice.len() > 1 && slice[1].kind == TokenKind::Eq {
            &slice[2..]
        } else {
            &slice[1..]
        };
        entries.push(ComponentEntry { key, value });
    }

    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RBracket | TokenKind::RBrace => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                flush(tokens, start, i, &mut entries);
                start = i + 1;
            },
            _ => {},
        }
    }
    flush(tokens, start, tokens.len(), &mut entries);

    entries
}

/// Render component value tokens back to command text.
fn render_component_value(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t.kind {
            TokenKind::Str => format!("\"{}\"", escape_quoted(&t.value)),
            _ => t.value.clone(),
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Component value as JSON: single literals keep their type, anything
/// richer is preserved as raw text.
fn component_json_value(tokens: &[Token]) -> Value {
    match tokens {
        [single] if single.kind == TokenKind::Str => Value::String(single.value.clone()),
        [single] if single.kind == TokenKind::Number => {
            let number: f64 = single.value.parse().unwrap_or(0.0);
            if number.fract() == 0.0 {
                json!(number as i64)
            } else {
                json!(number)
            }
        },
        _ => Value::String(render_component_value(tokens)),
    }
}

/// Qualify a bare identifier with the pack namespace.
fn qualify(ns: &str, id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("{}:{}", ns, id)
    }
}

impl<'a> PackCtx<'a> {
    /// Item definition JSON plus its `give.<name>` helper function.
    pub(crate) fn emit_item(&mut self, item: &ItemDef) {
        let mut components = Map::new();
        if let Some(tokens) = &item.components {
            for entry in split_components(tokens) {
                components.insert(entry.key, component_json_value(entry.value));
            }
        }

        let value = json!({
            "base": item.base_id,
            "components": components,
        });
        self.files.upsert(
            format!("data/{}/items/{}.json", self.ns, item.name),
            pretty(&value),
        );

        let give = match &item.components {
            Some(tokens) if !tokens.is_empty() => {
                let rendered: Vec<String> = split_components(tokens)
                    .iter()
                    .map(|entry| {
                        format!("{}={}", entry.key, render_component_value(entry.value))
                    })
                    .collect();
                format!("give @s {}[{}]", item.base_id, rendered.join(","))
            },
            _ => format!("give @s {}", item.base_id),
        };
        self.files.upsert(
            function_path(&self.ns, &format!("give.{}", item.name)),
            render_function(&[give]),
        );
    }

    /// Recipe JSON. A result identifier without a namespace separator
    /// is prefixed with the pack namespace.
    pub(crate) fn emit_recipe(&mut self, recipe: &Recipe) {
        let result = json!({
            "item": qualify(&self.ns, &recipe.result),
            "count": recipe.count,
        });

        let value = match recipe.kind {
            RecipeKind::Shaped => {
                let mut key = Map::new();
                for (letter, id) in &recipe.keys {
                    key.insert(letter.clone(), json!({ "item": id }));
                }
                json!({
                    "type": "minecraft:crafting_shaped",
                    "pattern": recipe.pattern,
                    "key": key,
                    "result": result,
                })
            },
            RecipeKind::Shapeless => {
                let ingredients: Vec<Value> = recipe
                    .ingredients
                    .iter()
                    .map(|id| json!({ "item": id }))
                    .collect();
                json!({
                    "type": "minecraft:crafting_shapeless",
                    "ingredients": ingredients,
                    "result": result,
                })
            },
        };

        self.files.upsert(
            format!("data/{}/recipes/{}.json", self.ns, recipe.name),
            pretty(&value),
        );
    }

    /// Advancement JSON: display plus criteria, optional parent. A
    /// declaration without criteria gets a single always-on criterion.
    pub(crate) fn emit_advancement(&mut self, adv: &Advancement) {
        let mut criteria = Map::new();
        if adv.criteria.is_empty() {
            criteria.insert("auto".to_string(), json!({ "trigger": "minecraft:tick" }));
        } else {
            for (name, trigger) in &adv.criteria {
                criteria.insert(name.clone(), json!({ "trigger": trigger }));
            }
        }

        let mut value = json!({
            "display": {
                "icon": { "id": adv.icon.as_deref().unwrap_or("minecraft:paper") },
                "title": { "text": adv.title.as_deref().unwrap_or(&adv.name) },
                "description": { "text": adv.description.as_deref().unwrap_or("") },
            },
            "criteria": criteria,
        });
        if let Some(parent) = &adv.parent {
            value["parent"] = json!(qualify(&self.ns, parent));
        }

        self.files.upsert(
            format!("data/{}/advancements/{}.json", self.ns, adv.name),
            pretty(&value),
        );
    }

    /// Tag JSON under the category sub-directory.
    pub(crate) fn emit_tag(&mut self, tag: &TagDef) {
        let value = json!({
            "replace": tag.replace,
            "values": tag.values,
        });
        self.files.upsert(
            format!(
                "data/{}/tags/{}/{}.json",
                self.ns,
                tag.category.dir(),
                tag.name
            ),
            pretty(&value),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{compile_files, file};

    fn compile(source: &str) -> Vec<crate::GeneratedFile> {
        let (files, handler) = compile_files(source);
        assert!(
            !handler.has_errors(),
            "generation errors: {:?}",
            handler.diagnostics()
        );
        files
    }

    #[test]
    fn test_pack_mcmeta_description() {
        let files = compile("pack \"My Pack\" namespace n { }");
        let mcmeta = file(&files, "pack.mcmeta");
        let value: Value = serde_json::from_str(mcmeta).unwrap();
        assert_eq!(value["pack"]["pack_format"], 48);
        assert_eq!(value["pack"]["description"], "My Pack");
        assert!(mcmeta.ends_with('\n'));
    }

    #[test]
    fn test_multi_pack_description_joined() {
        let files = compile(
            "pack \"A\" namespace one { } pack \"B\" namespace two { }",
        );
        let value: Value = serde_json::from_str(file(&files, "pack.mcmeta")).unwrap();
        assert_eq!(value["pack"]["description"], "A, B");
    }

    #[test]
    fn test_load_tag_order() {
        let files = compile("pack \"p\" namespace n { func Load() { } }");
        let value: Value =
            serde_json::from_str(file(&files, "data/minecraft/tags/function/load.json"))
                .unwrap();
        assert_eq!(
            value["values"],
            json!(["n:__bootstrap", "n:__init", "n:load"])
        );
    }

    #[test]
    fn test_tick_tag_only_when_needed() {
        let without = compile("pack \"p\" namespace n { }");
        assert!(!without
            .iter()
            .any(|f| f.path == "data/minecraft/tags/function/tick.json"));

        let with = compile("pack \"p\" namespace n { func Tick() { } }");
        let value: Value =
            serde_json::from_str(file(&with, "data/minecraft/tags/function/tick.json"))
                .unwrap();
        assert_eq!(value["values"], json!(["n:tick"]));
    }

    #[test]
    fn test_item_json_and_give_helper() {
        let files = compile(
            "pack \"p\" namespace n { Item emerald_sword { \
             base_id = \"minecraft:wooden_sword\"; \
             components: [ minecraft:item_name=\"Emerald\" ]; } }",
        );

        let value: Value =
            serde_json::from_str(file(&files, "data/n/items/emerald_sword.json")).unwrap();
        assert_eq!(value["base"], "minecraft:wooden_sword");
        assert_eq!(value["components"]["minecraft:item_name"], "Emerald");

        assert_eq!(
            file(&files, "data/n/function/give.emerald_sword.mcfunction"),
            "give @s minecraft:wooden_sword[minecraft:item_name=\"Emerald\"]\n"
        );
    }

    #[test]
    fn test_item_without_components() {
        let files = compile(
            "pack \"p\" namespace n { Item rock { base_id = minecraft:stone; } }",
        );
        assert_eq!(
            file(&files, "data/n/function/give.rock.mcfunction"),
            "give @s minecraft:stone\n"
        );
    }

    #[test]
    fn test_shaped_recipe_result_qualified() {
        let files = compile(
            "pack \"p\" namespace n { \
             Item emerald_sword { base_id = \"minecraft:wooden_sword\"; } \
             recipe emerald_sword { \
             pattern [ \"e\", \"e\", \"s\" ]; \
             key e = minecraft:emerald; \
             key s = minecraft:stick; \
             result emerald_sword; } }",
        );

        let value: Value =
            serde_json::from_str(file(&files, "data/n/recipes/emerald_sword.json")).unwrap();
        assert_eq!(value["type"], "minecraft:crafting_shaped");
        assert_eq!(value["result"]["item"], "n:emerald_sword");
        assert_eq!(value["key"]["e"]["item"], "minecraft:emerald");
        assert_eq!(value["pattern"], json!(["e", "e", "s"]));
    }

    #[test]
    fn test_shapeless_recipe() {
        let files = compile(
            "pack \"p\" namespace n { recipe mix { \
             ingredient = minecraft:sand; ingredient = minecraft:gravel; \
             result minecraft:dirt 4; } }",
        );
        let value: Value =
            serde_json::from_str(file(&files, "data/n/recipes/mix.json")).unwrap();
        assert_eq!(value["type"], "minecraft:crafting_shapeless");
        assert_eq!(value["ingredients"][1]["item"], "minecraft:gravel");
        assert_eq!(value["result"]["count"], 4);
        assert_eq!(value["result"]["item"], "minecraft:dirt");
    }

    #[test]
    fn test_advancement_json() {
        let files = compile(
            "pack \"p\" namespace n { adv first { \
             title = \"First!\"; description = \"Do it\"; \
             icon = minecraft:diamond; parent = root; \
             criterion did_it = minecraft:inventory_changed; } }",
        );
        let value: Value =
            serde_json::from_str(file(&files, "data/n/advancements/first.json")).unwrap();
        assert_eq!(value["display"]["title"]["text"], "First!");
        assert_eq!(value["display"]["icon"]["id"], "minecraft:diamond");
        assert_eq!(
            value["criteria"]["did_it"]["trigger"],
            "minecraft:inventory_changed"
        );
        assert_eq!(value["parent"], "n:root");
    }

    #[test]
    fn test_advancement_default_criterion() {
        let files = compile(
            "pack \"p\" namespace n { adv bare { title = \"T\"; } }",
        );
        let value: Value =
            serde_json::from_str(file(&files, "data/n/advancements/bare.json")).unwrap();
        assert_eq!(value["criteria"]["auto"]["trigger"], "minecraft:tick");
    }

    #[test]
    fn test_tag_json_paths() {
        let files = compile(
            "pack \"p\" namespace n { \
             BlockTag logs { replace = false; values: [ \"minecraft:oak_log\" ]; } \
             ItemTag gems { replace = true; values: [ minecraft:emerald ]; } }",
        );

        let blocks: Value =
            serde_json::from_str(file(&files, "data/n/tags/blocks/logs.json")).unwrap();
        assert_eq!(blocks["replace"], false);
        assert_eq!(blocks["values"], json!(["minecraft:oak_log"]));

        let items: Value =
            serde_json::from_str(file(&files, "data/n/tags/items/gems.json")).unwrap();
        assert_eq!(items["replace"], true);
    }

    #[test]
    fn test_json_pretty_two_space_indent() {
        let files = compile("pack \"p\" namespace n { }");
        let mcmeta = file(&files, "pack.mcmeta");
        assert!(mcmeta.contains("\n  \"pack\": {"));
    }
}
