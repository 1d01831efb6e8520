//! Pack-level declaration parsing: packs, globals, functions, items,
//! recipes, advancements, and tags.

use dplc_lex::TokenKind;

use crate::ast::*;
use crate::Parser;

/// True when `name` (optionally `[]`-suffixed) is a DPL type name.
fn is_type_name(name: &str) -> bool {
    VarKind::from_name(name.strip_suffix("[]").unwrap_or(name)).is_some()
}

impl<'a> Parser<'a> {
    /// Parse one `pack "<title>" namespace <ns> { … }` unit.
    pub(crate) fn parse_pack(&mut self) -> Option<Pack> {
        let span = self.current_span();
        self.advance(); // 'pack'

        let title = self.expect(TokenKind::Str)?.value;

        if !self.match_kw("namespace") {
            self.error("expected 'namespace' after pack title");
            return None;
        }
        let namespace_raw = self.expect_ident()?;

        let mut pack = Pack {
            title,
            namespace: namespace_raw.to_lowercase(),
            namespace_raw,
            globals: Vec::new(),
            functions: Vec::new(),
            items: Vec::new(),
            recipes: Vec::new(),
            advancements: Vec::new(),
            tags: Vec::new(),
            span,
        };

        self.expect(TokenKind::LBrace)?;
        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            self.parse_pack_decl(&mut pack);
        }
        self.expect(TokenKind::RBrace);

        Some(pack)
    }

    /// Parse one declaration inside a pack body, with local recovery.
    fn parse_pack_decl(&mut self, pack: &mut Pack) {
        if self.kind() != TokenKind::Ident {
            self.error(format!(
                "expected declaration, found {}",
                self.describe_current()
            ));
            self.recover_in_block();
            return;
        }

        let keyword = self.value().to_string();

        if keyword == "global" {
            self.advance();
            match self.parse_global_decl() {
                Some(global) => pack.globals.push(global),
                None => self.recover_in_block(),
            }
            return;
        }

        // Typed globals without the `global` prefix are still globals.
        if is_type_name(&keyword) {
            match self.parse_global_decl() {
                Some(global) => pack.globals.push(global),
                None => self.recover_in_block(),
            }
            return;
        }

        match keyword.as_str() {
            "func" => match self.parse_function() {
                Some(function) => pack.functions.push(function),
                None => self.recover_in_block(),
            },
            "Item" => match self.parse_item_def() {
                Some(item) => pack.items.push(item),
                None => self.recover_in_block(),
            },
            "recipe" => match self.parse_recipe() {
                Some(recipe) => pack.recipes.push(recipe),
                None => self.recover_in_block(),
            },
            "adv" => match self.parse_advancement() {
                Some(adv) => pack.advancements.push(adv),
                None => self.recover_in_block(),
            },
            tag_kw if tag_kw.ends_with("Tag") => match self.parse_tag() {
                Some(tag) => pack.tags.push(tag),
                None => self.recover_in_block(),
            },
            _ => {
                self.error(format!("unknown declaration '{}'", keyword));
                self.recover_in_block();
            },
        }
    }

    /// Parse a type: a type identifier with optional `[]` suffix.
    ///
    /// The lexer attaches a directly-adjacent `[]` to the identifier, so
    /// both `int[]` and `int []` are accepted.
    pub(crate) fn parse_type(&mut self) -> Option<VarType> {
        let name = self.expect_ident()?;
        let (base, mut array) = match name.strip_suffix("[]") {
            Some(base) => (base, true),
            None => (name.as_str(), false),
        };

        let kind = match VarKind::from_name(base) {
            Some(kind) => kind,
            None => {
                self.error(format!("unknown type '{}'", base));
                return None;
            },
        };

        if !array && self.kind() == TokenKind::LBracket {
            self.advance();
            self.expect(TokenKind::RBracket)?;
            array = true;
        }

        Some(VarType { kind, array })
    }

    /// Parse `<type> <name> [= expr] [;]` after any `global` prefix.
    fn parse_global_decl(&mut self) -> Option<GlobalVar> {
        let span = self.current_span();
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;

        let init = if self.match_kind(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.match_kind(TokenKind::Semicolon);

        Some(GlobalVar {
            name,
            ty,
            init,
            span,
        })
    }

    /// Parse `func <Name>() { … }`.
    fn parse_function(&mut self) -> Option<Function> {
        let span = self.current_span();
        self.advance(); // 'func'

        let raw_name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Some(Function {
            name: raw_name.to_lowercase(),
            raw_name,
            body,
            span,
        })
    }

    /// Parse `Item <name> { base_id = …; components: [ … ]; }`.
    fn parse_item_def(&mut self) -> Option<ItemDef> {
        let span = self.current_span();
        self.advance(); // 'Item'

        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut base_id = None;
        let mut components = None;

        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            let Some(prop) = self.expect_ident() else {
                self.recover_in_block();
                continue;
            };

            match prop.as_str() {
                "base_id" => {
                    if !self.match_kind(TokenKind::Eq) {
                        self.match_kind(TokenKind::Colon);
                    }
                    base_id = self.expect_id_like();
                },
                "components" => {
                    if !self.match_kind(TokenKind::Colon) {
                        self.match_kind(TokenKind::Eq);
                    }
                    components = self.parse_raw_bracket_slice();
                },
                _ => {
                    self.warning(format!("unknown item property '{}'", prop));
                    self.recover_in_block();
                    continue;
                },
            }
            self.match_kind(TokenKind::Semicolon);
        }
        self.expect(TokenKind::RBrace);

        let Some(base_id) = base_id else {
            self.error(format!("item '{}' is missing base_id", name));
            return None;
        };

        Some(ItemDef {
            name,
            base_id,
            components,
            span,
        })
    }

    /// Capture a `[ … ]` token slice verbatim (balanced brackets), not
    /// including the outer pair.
    fn parse_raw_bracket_slice(&mut self) -> Option<Vec<dplc_lex::Token>> {
        self.expect(TokenKind::LBracket)?;

        let mut tokens = Vec::new();
        let mut depth = 1usize;

        loop {
            if self.is_at_end() {
                self.error("unterminated component list");
                return None;
            }
            match self.kind() {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Some(tokens);
                    }
                },
                _ => {},
            }
            tokens.push(self.current().clone());
            self.advance();
        }
    }

    /// Parse `recipe <name> { … }`.
    ///
    /// Properties: `type`, repeatable `ingredient`, `pattern [ … ]`,
    /// `key <letter> = <id>`, `result <id> [count]`. Presence of a
    /// pattern implies shaped.
    fn parse_recipe(&mut self) -> Option<Recipe> {
        let span = self.current_span();
        self.advance(); // 'recipe'

        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut kind = None;
        let mut ingredients = Vec::new();
        let mut pattern = Vec::new();
        let mut keys = Vec::new();
        let mut result = None;
        let mut count = 1u32;

        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            let Some(prop) = self.expect_ident() else {
                self.recover_in_block();
                continue;
            };

            match prop.as_str() {
                "type" => {
                    self.match_kind(TokenKind::Eq);
                    match self.expect_ident().as_deref() {
                        Some("shaped") => kind = Some(RecipeKind::Shaped),
                        Some("shapeless") => kind = Some(RecipeKind::Shapeless),
                        Some(other) => {
                            self.error(format!("unknown recipe type '{}'", other))
                        },
                        None => {},
                    }
                },
                "ingredient" => {
                    self.match_kind(TokenKind::Eq);
                    if let Some(id) = self.expect_id_like() {
                        ingredients.push(id);
                    }
                },
                "pattern" => {
                    if !self.match_kind(TokenKind::Eq) {
                        self.match_kind(TokenKind::Colon);
                    }
                    if self.expect(TokenKind::LBracket).is_some() {
                        while self.kind() == TokenKind::Str {
                            pattern.push(self.value().to_string());
                            self.advance();
                            if !self.match_kind(TokenKind::Comma) {
                                break;
                            }
                        }
                        self.expect(TokenKind::RBracket);
                    }
                },
                "key" => {
                    let letter = self.expect_ident();
                    self.match_kind(TokenKind::Eq);
                    let id = self.expect_id_like();
                    if let (Some(letter), Some(id)) = (letter, id) {
                        if letter.len() != 1 {
                            self.error(format!(
                                "recipe key '{}' must be a single character",
                                letter
                            ));
                        } else {
                            keys.push((letter, id));
                        }
                    }
                },
                "result" => {
                    self.match_kind(TokenKind::Eq);
                    result = self.expect_id_like();
                    if self.kind() == TokenKind::Number {
                        count = self.value().parse::<f64>().unwrap_or(1.0) as u32;
                        self.advance();
                    }
                },
                _ => {
                    self.warning(format!("unknown recipe property '{}'", prop));
                    self.recover_in_block();
                    continue;
                },
            }
            self.match_kind(TokenKind::Semicolon);
        }
        self.expect(TokenKind::RBrace);

        let Some(result) = result else {
            self.error(format!("recipe '{}' is missing a result", name));
            return None;
        };

        let kind = if !pattern.is_empty() {
            RecipeKind::Shaped
        } else {
            kind.unwrap_or(RecipeKind::Shapeless)
        };

        Some(Recipe {
            name,
            kind,
            ingredients,
            pattern,
            keys,
            result,
            count,
            span,
        })
    }

    /// Parse `adv <name> { … }`.
    fn parse_advancement(&mut self) -> Option<Advancement> {
        let span = self.current_span();
        self.advance(); // 'adv'

        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut adv = Advancement {
            name,
            title: None,
            description: None,
            icon: None,
            parent: None,
            criteria: Vec::new(),
            span,
        };

        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            let Some(prop) = self.expect_ident() else {
                self.recover_in_block();
                continue;
            };

            match prop.as_str() {
                "title" => {
                    self.match_kind(TokenKind::Eq);
                    adv.title = self.expect(TokenKind::Str).map(|t| t.value);
                },
                "description" => {
                    self.match_kind(TokenKind::Eq);
                    adv.description = self.expect(TokenKind::Str).map(|t| t.value);
                },
                "icon" => {
                    self.match_kind(TokenKind::Eq);
                    adv.icon = self.expect_id_like();
                },
                "parent" => {
                    self.match_kind(TokenKind::Eq);
                    adv.parent = self.expect_id_like();
                },
                "criterion" => {
                    let criterion = self.expect_ident();
                    self.match_kind(TokenKind::Eq);
                    let trigger = self.expect_id_like();
                    if let (Some(criterion), Some(trigger)) = (criterion, trigger) {
                        adv.criteria.push((criterion, trigger));
                    }
                },
                _ => {
                    self.warning(format!("unknown advancement property '{}'", prop));
                    self.recover_in_block();
                    continue;
                },
            }
            self.match_kind(TokenKind::Semicolon);
        }
        self.expect(TokenKind::RBrace);

        Some(adv)
    }

    /// Parse a category-suffixed tag declaration (`BlockTag`, `ItemTag`).
    fn parse_tag(&mut self) -> Option<TagDef> {
        let span = self.current_span();

        let category = match self.value() {
            "BlockTag" => TagCategory::Blocks,
            "ItemTag" => TagCategory::Items,
            other => {
                self.error(format!("unknown tag category '{}'", other));
                self.skip_balanced_block();
                return None;
            },
        };
        self.advance();

        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut replace = false;
        let mut values = Vec::new();

        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            let Some(prop) = self.expect_ident() else {
                self.recover_in_block();
                continue;
            };

            match prop.as_str() {
                "replace" => {
                    self.match_kind(TokenKind::Eq);
                    match self.expect_ident().as_deref() {
                        Some("true") => replace = true,
                        Some("false") => replace = false,
                        Some(other) => {
                            self.error(format!("expected true or false, found '{}'", other))
                        },
                        None => {},
                    }
                },
                "values" => {
                    if !self.match_kind(TokenKind::Colon) {
                        self.match_kind(TokenKind::Eq);
                    }
                    if self.expect(TokenKind::LBracket).is_some() {
                        while matches!(self.kind(), TokenKind::Str | TokenKind::Ident) {
                            values.push(self.value().to_string());
                            self.advance();
                            if !self.match_kind(TokenKind::Comma) {
                                break;
                            }
                        }
                        self.expect(TokenKind::RBracket);
                    }
                },
                _ => {
                    self.warning(format!("unknown tag property '{}'", prop));
                    self.recover_in_block();
                    continue;
                },
            }
            self.match_kind(TokenKind::Semicolon);
        }
        self.expect(TokenKind::RBrace);

        Some(TagDef {
            name,
            category,
            replace,
            values,
            span,
        })
    }
}
