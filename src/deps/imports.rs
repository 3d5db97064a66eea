//! Go import header parsing
//!
//! Files are parsed with tree-sitter-go, but only the header is inspected:
//! the `package` clause followed by any number of `import` declarations.
//! Anything after the first other top-level declaration is ignored, so
//! syntax errors in function bodies do not fail the collection.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::error::{GdcError, Result};

/// File name suffix of source files whose imports are collected.
pub const SOURCE_SUFFIX: &str = ".go";

/// Syntax error in a file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    fn at(node: Node<'_>, message: impl Into<String>) -> Self {
        Self::new(node.start_position().row + 1, message)
    }
}

fn go_parser() -> std::result::Result<Parser, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| SyntaxError::new(1, format!("failed to load Go grammar: {e}")))?;
    Ok(parser)
}

/// First ERROR or MISSING node at or below `node`, in source order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

struct Header<'s> {
    source: &'s str,
    imports: Vec<String>,
}

impl<'s> Header<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    /// First token-like word of `node`, for messages.
    fn describe(&self, node: Node<'_>) -> String {
        match self.text(node).split_whitespace().next() {
            Some(word) => format!("'{word}'"),
            None => "EOF".to_string(),
        }
    }

    fn syntax_error(&self, node: Node<'_>) -> SyntaxError {
        if node.is_missing() {
            SyntaxError::at(node, format!("expected '{}'", node.kind()))
        } else {
            SyntaxError::at(node, format!("unexpected {}", self.describe(node)))
        }
    }

    fn check(&self, node: Node<'_>) -> std::result::Result<(), SyntaxError> {
        match first_error(node) {
            Some(bad) => Err(self.syntax_error(bad)),
            None => Ok(()),
        }
    }

    /// Go terminates each declaration with a newline or `;`.
    fn terminated(&self, from: usize, to: usize) -> bool {
        self.source[from..to].contains(|c: char| c == '\n' || c == ';')
    }

    fn package_clause(&self, node: Node<'_>) -> std::result::Result<(), SyntaxError> {
        self.check(node)?;
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        match name {
            Some(name) if self.text(name) != "_" => Ok(()),
            Some(name) => Err(SyntaxError::at(name, "invalid package name _")),
            None => Err(SyntaxError::at(node, "expected package name")),
        }
    }

    fn import_declaration(&mut self, node: Node<'_>) -> std::result::Result<(), SyntaxError> {
        self.check(node)?;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => self.import_spec(child)?,
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.named_children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            self.import_spec(spec)?;
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn import_spec(&mut self, node: Node<'_>) -> std::result::Result<(), SyntaxError> {
        let path = node
            .child_by_field_name("path")
            .ok_or_else(|| SyntaxError::at(node, "expected import path"))?;
        let path = self.text(path).to_string();
        self.imports.push(path);
        Ok(())
    }

    fn parse(mut self, root: Node<'_>) -> std::result::Result<Vec<String>, SyntaxError> {
        if root.is_error() {
            let mut cursor = root.walk();
            let inner = root.children(&mut cursor).find_map(first_error);
            return Err(self.syntax_error(inner.unwrap_or(root)));
        }

        let mut seen_package = false;
        // End of the last header declaration and whether a terminator followed it.
        let mut open: Option<(usize, bool)> = None;

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if child.kind() == "comment" {
                if let Some((end, terminated)) = open {
                    let terminated = terminated
                        || self.terminated(end, child.start_byte())
                        || self.text(child).contains('\n');
                    open = Some((child.end_byte(), terminated));
                }
                continue;
            }
            if let Some((end, terminated)) = open {
                if !terminated && !self.terminated(end, child.start_byte()) {
                    return Err(SyntaxError::at(
                        child,
                        format!("expected ';', found {}", self.describe(child)),
                    ));
                }
            }

            match child.kind() {
                "ERROR" => return Err(self.syntax_error(child)),
                "package_clause" if !seen_package => {
                    self.package_clause(child)?;
                    seen_package = true;
                }
                _ if !seen_package => {
                    return Err(SyntaxError::at(
                        child,
                        format!("expected 'package', found {}", self.describe(child)),
                    ));
                }
                "import_declaration" => self.import_declaration(child)?,
                _ => break,
            }
            open = Some((child.end_byte(), false));
        }

        if !seen_package {
            let line = self.source.lines().count().max(1);
            return Err(SyntaxError::new(line, "expected 'package', found EOF"));
        }
        Ok(self.imports)
    }
}

/// Parses the import declarations of a Go source header, in source order.
///
/// Each entry is the raw string literal, quotes included.
pub fn parse_import_header(source: &str) -> std::result::Result<Vec<String>, SyntaxError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let tree = go_parser()?
        .parse(source, None)
        .ok_or_else(|| SyntaxError::new(1, "parser produced no tree"))?;

    Header {
        source,
        imports: Vec::new(),
    }
    .parse(tree.root_node())
}

/// Reads `path` and returns its declared imports.
pub fn file_imports(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let source = String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        GdcError::ParseError {
            path: path.to_path_buf(),
            line: valid.iter().filter(|b| **b == b'\n').count() + 1,
            message: "invalid UTF-8 in source file".to_string(),
        }
    })?;

    parse_import_header(&source).map_err(|e| GdcError::ParseError {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    })
}

/// Collects the imports of every source file directly inside `unit`.
///
/// Subdirectories are not descended into. The result is sorted and unique;
/// any file that fails to parse fails the whole collection.
pub fn collect_imports(unit: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(unit)? {
        let entry = entry?;
        let is_source = entry.file_name().to_string_lossy().ends_with(SOURCE_SUFFIX);
        // Follows symlinks.
        if is_source && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut imports = BTreeSet::new();
    for file in &files {
        let declared = file_imports(file)?;
        debug!(file = %file.display(), count = declared.len(), "Parsed imports");
        imports.extend(declared);
    }

    Ok(imports.into_iter().collect())
}
