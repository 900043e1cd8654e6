//! Repository/service pattern generator
//!
//! For a pattern `User` this plans, in order:
//! 1. `UserRepositoryInterface` and `UserEloquentRepository`
//! 2. the `RepositoryServiceProvider` binding
//! 3. `UserServiceInterface` and `UserService`
//! 4. the `InternalServiceProvider` binding
//! 5. `BaseRepository` and `BaseInternalService`, when missing
//!
//! Providers that do not exist yet are created from their stub first.

use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use super::plan::{GenerationPlan, PlannedWrite, WriteMode};
use super::provider::{self, ProviderEntries};
use crate::error::{PatternError, Result};
use crate::naming::{ClassFile, ClassPair, ModelNames, PatternNames};
use crate::project::Project;
use crate::stubs::{StubKind, StubSet};

/// Model a generated repository is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelRef {
    /// Short class name
    pub name: String,
    /// Fully qualified class name
    pub fqcn: String,
}

impl From<&ModelNames> for ModelRef {
    fn from(names: &ModelNames) -> Self {
        Self {
            name: names.class_name().to_string(),
            fqcn: names.file.fqcn(),
        }
    }
}

/// Repository/service pattern generator
#[derive(Debug)]
pub struct PatternGenerator<'a> {
    project: &'a Project,
    stubs: &'a StubSet,
    names: PatternNames,
    model: Option<ModelRef>,
}

impl<'a> PatternGenerator<'a> {
    /// Create a generator for pattern `name`
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidName`] if `name` is not a PHP class
    /// identifier.
    pub fn new(
        project: &'a Project,
        stubs: &'a StubSet,
        name: &str,
        model: Option<ModelRef>,
    ) -> Result<Self> {
        let names = PatternNames::new(name, project.layout())?;
        Ok(Self {
            project,
            stubs,
            names,
            model,
        })
    }

    /// Derived names
    #[must_use]
    pub const fn names(&self) -> &PatternNames {
        &self.names
    }

    /// Render every file without writing anything
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::TargetExists`] if any repository or service
    /// file is already present, or a stub/provider error.
    pub fn plan(&self) -> Result<GenerationPlan> {
        self.check_targets()?;

        let names = &self.names;
        let mut plan = GenerationPlan::new(self.project.root());

        plan.push(self.interface(StubKind::RepositoryInterface, &names.repository)?);
        plan.push(self.repository_class()?);
        plan.push(self.provider(
            StubKind::RepositoryProvider,
            &names.repository_provider,
            &names.repository,
        )?);

        plan.push(self.interface(StubKind::ServiceInterface, &names.service)?);
        plan.push(self.service_class()?);
        plan.push(self.provider(
            StubKind::InternalProvider,
            &names.internal_provider,
            &names.service,
        )?);

        plan.push(self.base_class(StubKind::BaseRepository, &names.base_repository)?);
        plan.push(self.base_class(StubKind::BaseInternalService, &names.base_service)?);

        for write in plan.writes() {
            tracing::debug!(path = %write.path.display(), action = %write.action(), "planned");
        }
        Ok(plan)
    }

    /// Files this pattern must create
    #[must_use]
    pub fn targets(&self) -> [PathBuf; 4] {
        let names = &self.names;
        [
            names.repository.interface_path(),
            names.repository.class_path(),
            names.service.interface_path(),
            names.service.class_path(),
        ]
    }

    fn check_targets(&self) -> Result<()> {
        match self
            .targets()
            .into_iter()
            .find(|target| self.project.resolve(target).exists())
        {
            Some(existing) => Err(PatternError::TargetExists(existing)),
            None => Ok(()),
        }
    }

    fn interface(&self, kind: StubKind, pair: &ClassPair) -> Result<PlannedWrite> {
        let content = self.stubs.render(
            kind,
            &json!({
                "namespace": pair.namespace,
                "interface_name": pair.interface_name,
            }),
        )?;
        Ok(PlannedWrite::create(
            pair.interface_path(),
            content,
            format!("interface {}", pair.interface_name),
        ))
    }

    fn repository_class(&self) -> Result<PlannedWrite> {
        let pair = &self.names.repository;
        let content = self.stubs.render(
            StubKind::RepositoryClass,
            &json!({
                "namespace": pair.namespace,
                "interface_name": pair.interface_name,
                "class_name": pair.class_name,
                "camel_name": self.names.camel_name,
                "base_namespace": self.names.base_repository.namespace,
                "model": self.model,
            }),
        )?;

        let description = self.model.as_ref().map_or_else(
            || format!("repository {}", pair.class_name),
            |model| format!("repository {} for {}", pair.class_name, model.name),
        );
        Ok(PlannedWrite::create(pair.class_path(), content, description))
    }

    fn service_class(&self) -> Result<PlannedWrite> {
        let pair = &self.names.service;
        let repository = &self.names.repository;
        let content = self.stubs.render(
            StubKind::ServiceClass,
            &json!({
                "namespace": pair.namespace,
                "interface_name": pair.interface_name,
                "class_name": pair.class_name,
                "camel_name": self.names.camel_name,
                "base_namespace": self.names.base_service.namespace,
                "repository_interface": repository.interface_name,
                "repository_interface_fqcn": repository.interface_fqcn(),
            }),
        )?;
        Ok(PlannedWrite::create(
            pair.class_path(),
            content,
            format!("service {}", pair.class_name),
        ))
    }

    fn provider(&self, kind: StubKind, file: &ClassFile, pair: &ClassPair) -> Result<PlannedWrite> {
        let entries = ProviderEntries::for_pair(pair);
        let absolute = self.project.resolve(&file.path);

        if absolute.exists() {
            let original =
                fs::read_to_string(&absolute).map_err(|e| PatternError::io(&absolute, e))?;
            let content = provider::patch(&original, &entries, &file.path)?;
            return Ok(PlannedWrite {
                path: file.path.clone(),
                content,
                mode: WriteMode::Patch { original },
                description: format!("bind {} in {}", pair.interface_name, file.class_name),
            });
        }

        let fresh = self
            .stubs
            .render(kind, &json!({ "namespace": file.namespace }))?;
        let content = provider::patch(&fresh, &entries, &file.path)?;
        Ok(PlannedWrite::create(
            file.path.clone(),
            content,
            format!("provider {} binding {}", file.class_name, pair.interface_name),
        ))
    }

    fn base_class(&self, kind: StubKind, file: &ClassFile) -> Result<PlannedWrite> {
        let description = format!("base class {}", file.class_name);
        if self.project.resolve(&file.path).exists() {
            return Ok(PlannedWrite::skip(file.path.clone(), description));
        }

        let content = self
            .stubs
            .render(kind, &json!({ "namespace": file.namespace }))?;
        Ok(PlannedWrite::create(file.path.clone(), content, description))
    }
}
