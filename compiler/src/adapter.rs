//! Read-only accessors over a [`Schema`], so the rest of the compiler never
//! touches raw descriptor indices or location paths.

use twirp_srv_schema::{method_path, service_path, MethodDescriptor, Schema, ServiceDescriptor};

use crate::utils::reformat_comment;

#[derive(Debug, Clone, Copy)]
pub struct ServiceRef<'a> {
    schema: &'a Schema,
    index:  usize,
}

impl<'a> ServiceRef<'a> {
    /// `None` when `index` is past the last declared service.
    pub fn new(schema: &'a Schema, index: usize) -> Option<Self> {
        schema.services.get(index).map(|_| Self { schema, index })
    }

    /// Every service of `schema`, in declaration order.
    pub fn all(schema: &'a Schema) -> impl Iterator<Item = ServiceRef<'a>> + 'a {
        (0..schema.services.len()).map(move |index| Self { schema, index })
    }

    pub fn descriptor(&self) -> &'a ServiceDescriptor {
        &self.schema.services[self.index]
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn name(&self) -> &'a str {
        &self.descriptor().name
    }

    /// `package.Name`, or the bare name when the file has no package.
    pub fn qualified_name(&self) -> String {
        match self.schema.package() {
            "" => self.name().to_string(),
            pkg => format!("{}.{}", pkg, self.name()),
        }
    }

    /// The package, falling back to the service name so a route prefix can
    /// never be empty.
    pub fn package_name(&self) -> String {
        match self.schema.package() {
            "" => self.name().to_string(),
            pkg => pkg.to_string(),
        }
    }

    pub fn raw_leading_comment(&self) -> &'a str {
        self.schema
            .comments
            .leading(&service_path(self.index))
            .unwrap_or("")
    }

    pub fn leading_comment(&self, prefix: &str) -> String {
        reformat_comment(self.raw_leading_comment(), prefix)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodRef<'a>> + 'a {
        let service = *self;
        (0..self.descriptor().methods.len()).map(move |index| MethodRef { service, index })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'a> {
    service: ServiceRef<'a>,
    index:   usize,
}

impl<'a> MethodRef<'a> {
    pub fn descriptor(&self) -> &'a MethodDescriptor {
        &self.service.descriptor().methods[self.index]
    }

    pub fn service(&self) -> ServiceRef<'a> {
        self.service
    }

    pub fn name(&self) -> &'a str {
        &self.descriptor().name
    }

    pub fn input_type(&self) -> &'a str {
        &self.descriptor().input_type
    }

    pub fn output_type(&self) -> &'a str {
        &self.descriptor().output_type
    }

    pub fn raw_leading_comment(&self) -> &'a str {
        self.service
            .schema
            .comments
            .leading(&method_path(self.service.index, self.index))
            .unwrap_or("")
    }

    pub fn leading_comment(&self, prefix: &str) -> String {
        reformat_comment(self.raw_leading_comment(), prefix)
    }
}
