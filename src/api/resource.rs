//! Resource-type metadata for generated API domains.

/// Operations a resource type supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceOperations {
    pub list: bool,
    pub get: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
    pub status: bool,
}

impl ResourceOperations {
    pub fn all() -> Self {
        Self {
            list: true,
            get: true,
            create: true,
            update: true,
            delete: true,
            status: true,
        }
    }

    pub fn read_only() -> Self {
        Self {
            list: true,
            get: true,
            create: false,
            update: false,
            delete: false,
            status: false,
        }
    }
}

impl Default for ResourceOperations {
    fn default() -> Self {
        Self::all()
    }
}

/// A resource type exposed by the management API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    pub name: String,
    pub description: String,
    /// Collection path, with `{namespace}` standing for the target namespace
    pub api_path: String,
    pub supports_namespace: bool,
    pub operations: ResourceOperations,
}

impl ResourceType {
    pub fn namespaced(
        name: impl Into<String>,
        description: impl Into<String>,
        api_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            api_path: api_path.into(),
            supports_namespace: true,
            operations: ResourceOperations::all(),
        }
    }

    /// Tenant-wide resource type without a namespace segment
    pub fn global(
        name: impl Into<String>,
        description: impl Into<String>,
        api_path: impl Into<String>,
    ) -> Self {
        Self {
            supports_namespace: false,
            ..Self::namespaced(name, description, api_path)
        }
    }

    pub fn operations(mut self, operations: ResourceOperations) -> Self {
        self.operations = operations;
        self
    }

    pub fn collection_path(&self, namespace: &str) -> String {
        if self.supports_namespace {
            self.api_path.replace("{namespace}", namespace)
        } else {
            self.api_path.clone()
        }
    }

    pub fn item_path(&self, namespace: &str, name: &str) -> String {
        format!("{}/{}", self.collection_path(namespace), name)
    }

    /// One-line description for menus and completion.
    pub fn summary(&self) -> String {
        if self.supports_namespace {
            self.description.clone()
        } else {
            format!("{} (tenant-wide)", self.description)
        }
    }
}
