//! Surgical, format-preserving manifest edits.
//!
//! [`ManifestEditor`] wraps a [`toml_edit::DocumentMut`] so that individual
//! top-level properties (`name`, `config.*`, `require`/`provide` links,
//! `repositories`, `autoload`, dotted paths below `extra`) can be added or
//! replaced while every unrelated key, comment, and piece of formatting in
//! the file survives. Opening a nonexistent file yields an empty-but-valid
//! manifest shell that is materialized on [`ManifestEditor::save`].

use crate::autoload::AutoloadExport;
use crate::core::VbundleError;
use crate::manifest::Repository;
use anyhow::Result;
use std::path::{Path, PathBuf};
use toml_edit::{ArrayOfTables, DocumentMut, Item, Table, value};

/// An editable manifest document bound to a file path.
#[derive(Debug)]
pub struct ManifestEditor {
    path: PathBuf,
    doc: DocumentMut,
}

impl ManifestEditor {
    /// Open a manifest for editing, starting from an empty shell when the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// [`VbundleError::ManifestInvalid`] when an existing file cannot be
    /// parsed.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| VbundleError::io(path, e))?;
            content
                .parse::<DocumentMut>()
                .map_err(|e| VbundleError::manifest_invalid(path.display(), e.to_string()))?
        } else {
            DocumentMut::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Set the declared package name.
    pub fn set_name(&mut self, name: &str) {
        self.named_table("package")["name"] = value(name);
    }

    /// Set a boolean `[config]` setting.
    pub fn set_config_setting(&mut self, key: &str, enabled: bool) {
        self.named_table("config")[key] = value(enabled);
    }

    /// Add or replace a `[require]` link.
    pub fn add_require(&mut self, name: &str, constraint: &str) {
        self.named_table("require")[name] = value(constraint);
    }

    /// Add or replace a `[provide]` link.
    pub fn add_provide(&mut self, name: &str, constraint: &str) {
        self.named_table("provide")[name] = value(constraint);
    }

    /// Append a `[[repositories]]` entry.
    pub fn add_repository(&mut self, repository: &Repository) {
        let mut table = Table::new();
        table["type"] = value(&repository.kind);
        if let Some(url) = &repository.url {
            table["url"] = value(url);
        }
        if let Some(path) = &repository.path {
            table["path"] = value(path);
        }

        let repositories = self
            .doc
            .entry("repositories")
            .or_insert(Item::ArrayOfTables(ArrayOfTables::new()));
        if let Some(array) = repositories.as_array_of_tables_mut() {
            array.push(table);
        }
    }

    /// Replace the `[autoload]` section with the given export.
    ///
    /// Empty constituents of the export are omitted entirely.
    pub fn set_autoload(&mut self, export: &AutoloadExport) -> Result<()> {
        let rendered = toml_edit::ser::to_document(export).map_err(|e| {
            VbundleError::manifest_invalid(self.path.display(), e.to_string())
        })?;
        self.doc["autoload"] = rendered.as_item().clone();
        Ok(())
    }

    /// Read a string value below `[extra]` by dotted path.
    #[must_use]
    pub fn extra_get(&self, dotted_path: &str) -> Option<String> {
        let mut current = self.doc.get("extra")?;
        let mut segments = dotted_path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let table = current.as_table_like()?;
            let item = table.get(segment)?;
            if segments.peek().is_none() {
                return item.as_str().map(ToString::to_string);
            }
            current = item;
        }

        None
    }

    /// Write a string value below `[extra]` by dotted path, creating
    /// intermediate tables as needed and preserving sibling keys.
    pub fn extra_set(&mut self, dotted_path: &str, new_value: &str) {
        let mut current = self.named_table_item("extra");
        let mut segments = dotted_path.split('.').peekable();

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current[segment] = value(new_value);
                break;
            }
            // Indexing a missing key through `Item` panics, so check with
            // `get` before deciding to insert the intermediate table.
            let is_table = current
                .as_table_like()
                .and_then(|table| table.get(segment))
                .is_some_and(Item::is_table_like);
            if !is_table {
                let mut table = Table::new();
                table.set_implicit(true);
                current[segment] = Item::Table(table);
            }
            current = &mut current[segment];
        }
    }

    /// Atomically write the document back to its file.
    pub fn save(&self) -> Result<()> {
        crate::utils::fs::safe_write(&self.path, &self.doc.to_string())
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rendered document contents.
    #[must_use]
    pub fn render(&self) -> String {
        self.doc.to_string()
    }

    fn named_table(&mut self, name: &str) -> &mut Table {
        self.named_table_item(name)
            .as_table_mut()
            .expect("entry was just ensured to be a table")
    }

    fn named_table_item(&mut self, name: &str) -> &mut Item {
        let item = self.doc.entry(name).or_insert(Item::Table(Table::new()));
        if !item.is_table_like() {
            *item = Item::Table(Table::new());
        }
        item
    }
}
