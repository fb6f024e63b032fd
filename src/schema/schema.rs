//! Index schema: the field-resolution service predicates are composed against.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DslConfig;
use crate::dsl::named::NamedPredicateProvider;
use crate::error::{PilumError, Result};
use crate::schema::field::{FieldDescriptor, FieldKind};
use crate::scope::SearchIndexScope;

/// A schema defines which fields exist, their types, and which named
/// predicates are available on which object.
#[derive(Clone, Default)]
pub struct IndexSchema {
    /// Map of absolute field paths to their descriptors
    fields: AHashMap<String, FieldDescriptor>,
    /// Ordered list of field paths (for consistent ordering)
    field_names: Vec<String>,
    /// Named predicates, keyed by `objectPath.name` (or `name` at the root)
    named_predicates: AHashMap<String, Arc<dyn NamedPredicateProvider>>,
    /// Composition limits
    config: DslConfig,
}

impl std::fmt::Debug for IndexSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut named: Vec<&String> = self.named_predicates.keys().collect();
        named.sort();
        f.debug_struct("IndexSchema")
            .field("field_names", &self.field_names)
            .field("named_predicates", &named)
            .field("config", &self.config)
            .finish()
    }
}

impl IndexSchema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty schema with custom composition limits.
    pub fn with_config(config: DslConfig) -> Self {
        IndexSchema {
            config,
            ..Self::default()
        }
    }

    /// Create a builder for constructing schemas.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Add a field to the schema.
    ///
    /// Dotted paths require their parent object to be declared first.
    pub fn add_field(&mut self, mut field: FieldDescriptor) -> Result<()> {
        let path = field.path().to_string();

        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(PilumError::schema(format!("Invalid field path '{path}'")));
        }
        if self.fields.contains_key(&path) {
            return Err(PilumError::schema(format!("Field '{path}' already exists")));
        }
        if field.kind() == FieldKind::Vector && field.dimension().unwrap_or(0) == 0 {
            return Err(PilumError::schema(format!(
                "Vector field '{path}' must declare a positive dimension"
            )));
        }

        let nested_path = match path.rsplit_once('.') {
            Some((parent_path, _)) => {
                let parent = self.fields.get(parent_path).ok_or_else(|| {
                    PilumError::schema(format!(
                        "Parent object '{parent_path}' of field '{path}' does not exist"
                    ))
                })?;
                if parent.kind() != FieldKind::Object {
                    return Err(PilumError::schema(format!(
                        "Parent '{parent_path}' of field '{path}' is not an object field"
                    )));
                }
                if parent.is_nested() {
                    Some(parent_path.to_string())
                } else {
                    parent.nested_path().map(str::to_string)
                }
            }
            None => None,
        };
        field.set_nested_path(nested_path);

        debug!(field = %path, kind = %field.kind(), "adding field to schema");
        self.fields.insert(path.clone(), field);
        self.field_names.push(path);

        Ok(())
    }

    /// Register a named predicate on an object (or on the root when the
    /// path has no dot).
    pub fn add_named_predicate<S: Into<String>>(
        &mut self,
        path: S,
        provider: Arc<dyn NamedPredicateProvider>,
    ) -> Result<()> {
        let path = path.into();

        if let Some((object_path, _)) = path.rsplit_once('.') {
            match self.fields.get(object_path) {
                Some(object) if object.kind() == FieldKind::Object => {}
                _ => {
                    return Err(PilumError::schema(format!(
                        "Cannot register named predicate '{path}': '{object_path}' is not an object field"
                    )));
                }
            }
        }
        if self.named_predicates.contains_key(&path) {
            return Err(PilumError::schema(format!(
                "Named predicate '{path}' already exists"
            )));
        }

        self.named_predicates.insert(path, provider);
        Ok(())
    }

    /// Paths of the registered named predicates.
    pub fn named_predicate_paths(&self) -> impl Iterator<Item = &str> {
        self.named_predicates.keys().map(String::as_str)
    }

    /// Get a field descriptor by absolute path.
    pub fn get_field(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.get(path)
    }

    /// Check if a field exists.
    pub fn has_field(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// Get all field paths in the order they were added.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Iterate over field descriptors in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.field_names
            .iter()
            .filter_map(|name| self.fields.get(name))
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a schema from its serialized configuration.
    pub fn from_config(config: SchemaConfig) -> Result<Self> {
        let mut schema = IndexSchema::with_config(config.dsl);
        for (name, field) in config.fields {
            field.register(&mut schema, &name)?;
        }
        Ok(schema)
    }

    /// Parse a JSON schema definition.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SchemaConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Load a JSON schema definition from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

impl SearchIndexScope for IndexSchema {
    fn config(&self) -> &DslConfig {
        &self.config
    }

    fn field_descriptor(&self, absolute_path: &str) -> Option<&FieldDescriptor> {
        self.fields.get(absolute_path)
    }

    fn named_predicate(&self, path: &str) -> Option<Arc<dyn NamedPredicateProvider>> {
        self.named_predicates.get(path).cloned()
    }
}

/// Serialized form of a schema.
///
/// ```json
/// {
///   "dsl": { "max_clause_count": 512 },
///   "fields": {
///     "title": { "type": "text", "analyzer": "english" },
///     "authors": {
///       "type": "object",
///       "nested": true,
///       "fields": { "name": { "type": "keyword" } }
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Composition limits.
    #[serde(default)]
    pub dsl: DslConfig,
    /// Top-level fields by name.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldConfig>,
}

/// Serialized form of one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field type.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Analyzer for text fields.
    #[serde(default)]
    pub analyzer: Option<String>,
    /// Whether the field is searchable.
    #[serde(default = "default_searchable")]
    pub searchable: bool,
    /// Dimension for vector fields.
    #[serde(default)]
    pub dimension: Option<usize>,
    /// Whether an object is nested.
    #[serde(default)]
    pub nested: bool,
    /// Sub-fields of an object.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldConfig>,
}

fn default_searchable() -> bool {
    true
}

impl FieldConfig {
    fn register(self, schema: &mut IndexSchema, path: &str) -> Result<()> {
        if !self.fields.is_empty() && self.kind != FieldKind::Object {
            return Err(PilumError::schema(format!(
                "Field '{path}' declares sub-fields but is not an object"
            )));
        }

        let mut descriptor = FieldDescriptor::new(path, self.kind)
            .searchable(self.searchable)
            .nested(self.nested);
        if let Some(analyzer) = self.analyzer {
            descriptor = descriptor.with_analyzer(analyzer);
        }
        if let Some(dimension) = self.dimension {
            descriptor = descriptor.with_dimension(dimension);
        }
        schema.add_field(descriptor)?;

        for (name, child) in self.fields {
            child.register(schema, &format!("{path}.{name}"))?;
        }
        Ok(())
    }
}

/// Builder for creating schemas fluently.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDescriptor>,
    config: DslConfig,
}

impl SchemaBuilder {
    /// Create a new schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the composition limits.
    pub fn config(mut self, config: DslConfig) -> Self {
        self.config = config;
        self
    }

    /// Add an arbitrary field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a text field.
    pub fn text<S: Into<String>>(self, path: S) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Text))
    }

    /// Add a keyword field.
    pub fn keyword<S: Into<String>>(self, path: S) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Keyword))
    }

    /// Add an integer field.
    pub fn integer<S: Into<String>>(self, path: S) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Integer))
    }

    /// Add a float field.
    pub fn float<S: Into<String>>(self, path: S) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Float))
    }

    /// Add a boolean field.
    pub fn boolean<S: Into<String>>(self, path: S) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Boolean))
    }

    /// Add a date field.
    pub fn date<S: Into<String>>(self, path: S) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Date))
    }

    /// Add a geo-point field.
    pub fn geo_point<S: Into<String>>(self, path: S) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::GeoPoint))
    }

    /// Add a vector field.
    pub fn vector<S: Into<String>>(self, path: S, dimension: usize) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Vector).with_dimension(dimension))
    }

    /// Add an object field.
    pub fn object<S: Into<String>>(self, path: S, nested: bool) -> Self {
        self.field(FieldDescriptor::new(path, FieldKind::Object).nested(nested))
    }

    /// Build the schema.
    pub fn build(self) -> Result<IndexSchema> {
        let mut schema = IndexSchema::with_config(self.config);
        for field in self.fields {
            schema.add_field(field)?;
        }
        Ok(schema)
    }
}
