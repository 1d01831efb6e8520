//! dplc-gen - Code generator for DPL.
//!
//! Walks the checked AST and emits the datapack file set: one
//! `.mcfunction` per user function plus the per-pack bootstrap, setup,
//! and init files, synthesized helper functions for loops and macro
//! calls, and JSON descriptors for items, recipes, advancements, and
//! tags.
//!
//! The runtime model is split across two host stores: scoreboard
//! objective `vars` holds integer slots (ints, bools, and all
//! arithmetic temporaries), while storage `<ns>:variables` holds
//! strings, floats, doubles, arrays, entity references, and the macro
//! argument surface.

mod cond;
mod expr;
mod files;
mod json;
mod macros;
mod names;
mod stmt;

pub use files::{FileSet, GeneratedFile};

use rustc_hash::FxHashMap;

use dplc_par::{Function, Pack, Script, VarType};
use dplc_util::Handler;

use files::{render_function, EmitBuf};
use names::{function_path, global_score, local_score, storage_ref};

/// Generate the output file set for a validated script.
///
/// Generation keeps going past errors where possible so later problems
/// still surface; the produced files are only meaningful when the
/// handler stayed error-free.
pub fn generate(script: &Script, handler: &Handler) -> Vec<GeneratedFile> {
    let mut file_set = FileSet::new();

    json::emit_pack_mcmeta(&mut file_set, script);

    let mut load_values = Vec::new();
    let mut tick_values = Vec::new();

    for pack in script {
        let mut ctx = PackCtx::new(pack, script, handler, &mut file_set);
        ctx.emit_pack(&mut load_values, &mut tick_values);
    }

    json::emit_lifecycle_tags(&mut file_set, &load_values, &tick_values);

    file_set.into_files()
}

/// Per-pack emission context.
///
/// Owns the ephemeral counters scoped to one pack; nothing here is
/// shared across packs.
pub(crate) struct PackCtx<'a> {
    pub(crate) pack: &'a Pack,
    pub(crate) script: &'a Script,
    pub(crate) handler: &'a Handler,
    pub(crate) files: &'a mut FileSet,

    /// Pack namespace (lowercased), cloned for convenient formatting.
    pub(crate) ns: String,

    pub(crate) for_counter: usize,
    pub(crate) while_counter: usize,
    pub(crate) macro_counter: usize,
    pub(crate) if_counter: usize,

    /// Global name to declared type.
    pub(crate) globals: FxHashMap<String, VarType>,
}

/// Lexical scope while emitting one function body.
#[derive(Clone, Default)]
pub(crate) struct Scope {
    /// Lowered name of the enclosing user function (used in local score
    /// mangles).
    pub(crate) fn_name: String,
    pub(crate) locals: FxHashMap<String, LocalVar>,
}

#[derive(Clone)]
pub(crate) struct LocalVar {
    pub(crate) ty: VarType,
    pub(crate) score: String,
}

/// A variable reference resolved to its backing slots.
pub(crate) struct ResolvedVar {
    pub(crate) ty: VarType,
    /// Scoreboard slot; only meaningful for score-backed kinds.
    pub(crate) score: String,
    /// Storage key under `<ns>:variables`.
    pub(crate) storage: String,
}

impl<'a> PackCtx<'a> {
    pub(crate) fn new(
        pack: &'a Pack,
        script: &'a Script,
        handler: &'a Handler,
        files: &'a mut FileSet,
    ) -> Self {
        let globals = pack
            .globals
            .iter()
            .map(|g| (g.name.clone(), g.ty))
            .collect();

        Self {
            pack,
            script,
            handler,
            files,
            ns: pack.namespace.clone(),
            for_counter: 0,
            while_counter: 0,
            macro_counter: 0,
            if_counter: 0,
            globals,
        }
    }

    /// Resolve a name against the scope's locals, then the pack
    /// globals.
    pub(crate) fn resolve_var(&self, scope: &Scope, name: &str) -> Option<ResolvedVar> {
        if let Some(local) = scope.locals.get(name) {
            return Some(ResolvedVar {
                ty: local.ty,
                score: local.score.clone(),
                storage: name.to_string(),
            });
        }
        self.globals.get(name).map(|ty| ResolvedVar {
            ty: *ty,
            score: global_score(&self.ns, name),
            storage: name.to_string(),
        })
    }

    /// Emit everything this pack contributes to the file set and the
    /// lifecycle tag lists.
    fn emit_pack(&mut self, load_values: &mut Vec<String>, tick_values: &mut Vec<String>) {
        let pack = self.pack;
        let ns = self.ns.clone();

        self.emit_bootstrap();
        self.emit_setup();
        self.emit_init();

        load_values.push(format!("{}:__bootstrap", ns));
        load_values.push(format!("{}:__init", ns));

        for function in &pack.functions {
            self.emit_function(function);

            if function.name == "load" {
                load_values.push(format!("{}:load", ns));
            }
            if function.name == "tick" {
                tick_values.push(format!("{}:tick", ns));
            }
        }

        for item in &pack.items {
            self.emit_item(item);
        }
        for recipe in &pack.recipes {
            self.emit_recipe(recipe);
        }
        for adv in &pack.advancements {
            self.emit_advancement(adv);
        }
        for tag in &pack.tags {
            self.emit_tag(tag);
        }
    }

    /// `__bootstrap`: run setup once, keyed on a storage flag.
    fn emit_bootstrap(&mut self) {
        let line = format!(
            "execute unless data storage {} {{__initialized:1b}} run function {}:__setup",
            storage_ref(&self.ns),
            self.ns
        );
        self.files
            .upsert(function_path(&self.ns, "__bootstrap"), render_function(&[line]));
    }

    /// `__setup`: create the scoreboard objective and mark bootstrap
    /// done.
    fn emit_setup(&mut self) {
        let lines = vec![
            "scoreboard objectives add vars dummy".to_string(),
            format!(
                "data modify storage {} __initialized set value 1b",
                storage_ref(&self.ns)
            ),
        ];
        self.files
            .upsert(function_path(&self.ns, "__setup"), render_function(&lines));
    }

    /// `__init`: assign every global in declaration order.
    fn emit_init(&mut self) {
        let pack = self.pack;
        let scope = Scope {
            fn_name: "__init".to_string(),
            locals: FxHashMap::default(),
        };
        let mut buf = EmitBuf::new();

        for global in &pack.globals {
            self.emit_global_init(global, &scope, &mut buf);
        }

        self.files
            .upsert(function_path(&self.ns, "__init"), buf.render());
    }

    /// One user function file.
    fn emit_function(&mut self, function: &'a Function) {
        let scope = Scope {
            fn_name: function.name.clone(),
            locals: FxHashMap::default(),
        };
        let mut buf = EmitBuf::new();

        self.emit_stmts(&function.body, &scope, &mut buf);

        self.files
            .upsert(function_path(&self.ns, &function.name), buf.render());
    }

    /// Score slot for a plain (non-for) local in the current scope.
    pub(crate) fn local_score_name(&self, scope: &Scope, name: &str) -> String {
        local_score(&scope.fn_name, name)
    }
}
