//! Pipeline file parser
//!
//! Walks the HCL body block by block so that labels, ordering and repeated
//! blocks are kept exactly as written. The accepted schema:
//!
//! ```hcl
//! settings {
//!   localweb          = "http://{IP}:8000"   # optional
//!   localpath         = "/srv/paws"          # optional, enables local mode
//!   localinterface    = "eth0"               # optional
//!   gitlabpath        = "..."                # optional
//!   githubpath        = "..."                # optional
//!   pathto            = "local/repo"
//!   default_container = "alpine:3.19"
//!
//!   environment "remote" {
//!     priority   = "50"
//!     region     = "global"
//!     datacenter = "dc1"
//!   }
//! }
//!
//! stage "build" "lint" {
//!   include = "steps/lint.hcl"                # optional
//!
//!   step "fmt" {
//!     driver "docker" {
//!       container = "rust:1"                  # docker
//!       shell     = "/bin/bash"               # raw_exec
//!     }
//!     command      = ["cargo fmt --check"]
//!     environments = ["remote"]
//!     deployment   = "api"                    # optional
//!     pathto       = "local/other"            # optional
//!     workdir      = "/local/repo"            # optional
//!   }
//! }
//!
//! deployment "api" {
//!   pack = "api-pack"
//! }
//! ```
//!
//! Include files hold nothing but `step` blocks.

use hcl::{Attribute, Block, Body, Expression};
use std::collections::HashSet;

use crate::error::{ParseError, Result};
use paws_core::domain::pipeline::{
    Deployment, Driver, Environment, PipelineDocument, Settings, Stage, Step,
};

/// Parse a complete pipeline document
///
/// Stage `include` references are recorded but not resolved; see
/// [`Loader`](crate::loader::Loader).
pub fn parse_document(source: &str) -> Result<PipelineDocument> {
    let body = hcl::parse(source)?;
    let root = Scope::new("pipeline", &body);
    root.check(&[], &["settings", "stage", "deployment"])?;

    let settings_block = root.single_block("settings")?;
    let settings = parse_settings(settings_block)?;

    let stages = root
        .blocks("stage")
        .map(|block| parse_stage(&root, block))
        .collect::<Result<Vec<_>>>()?;

    let deployments = root
        .blocks("deployment")
        .map(|block| parse_deployment(&root, block))
        .collect::<Result<Vec<_>>>()?;

    Ok(PipelineDocument {
        settings,
        stages,
        deployments,
    })
}

/// Parse a standalone step collection, as used by `include`
pub fn parse_steps(source: &str) -> Result<Vec<Step>> {
    let body = hcl::parse(source)?;
    let root = Scope::new("include", &body);
    root.check(&[], &["step"])?;

    root.blocks("step")
        .map(|block| parse_step(&root, block))
        .collect()
}

fn parse_settings(block: &Block) -> Result<Settings> {
    let scope = Scope::new("settings", block.body());
    scope.check(
        &[
            "localweb",
            "localpath",
            "localinterface",
            "gitlabpath",
            "githubpath",
            "pathto",
            "default_container",
        ],
        &["environment"],
    )?;

    let environments = scope
        .blocks("environment")
        .map(|block| parse_environment(&scope, block))
        .collect::<Result<Vec<_>>>()?;

    Ok(Settings {
        local_web: scope.optional_string("localweb")?,
        local_path: scope.optional_string("localpath")?,
        local_interface: scope.optional_string("localinterface")?,
        gitlab_path: scope.optional_string("gitlabpath")?,
        github_path: scope.optional_string("githubpath")?,
        path_to: scope.required_string("pathto")?,
        default_container: scope.required_string("default_container")?,
        environments,
    })
}

fn parse_environment(parent: &Scope<'_>, block: &Block) -> Result<Environment> {
    let [name] = labels::<1>(parent, block, "environment")?;
    let scope = parent.child(block, &[name.as_str()]);
    scope.check(&["priority", "region", "datacenter"], &[])?;

    Ok(Environment {
        priority: scope.required_string("priority")?,
        region: scope.required_string("region")?,
        datacenter: scope.required_string("datacenter")?,
        name,
    })
}

fn parse_stage(parent: &Scope<'_>, block: &Block) -> Result<Stage> {
    let [group, subgroup] = labels::<2>(parent, block, "stage")?;
    let scope = parent.child(block, &[group.as_str(), subgroup.as_str()]);
    scope.check(&["include"], &["step"])?;

    let steps = scope
        .blocks("step")
        .map(|block| parse_step(&scope, block))
        .collect::<Result<Vec<_>>>()?;

    Ok(Stage {
        include: scope.optional_string("include")?,
        group,
        subgroup,
        steps,
    })
}

fn parse_step(parent: &Scope<'_>, block: &Block) -> Result<Step> {
    let [name] = labels::<1>(parent, block, "step")?;
    let scope = parent.child(block, &[name.as_str()]);
    scope.check(
        &["command", "environments", "deployment", "pathto", "workdir"],
        &["driver"],
    )?;

    let driver = parse_driver(&scope, scope.single_block("driver")?)?;

    Ok(Step {
        driver,
        command: scope.required_list("command")?,
        environments: scope.required_list("environments")?,
        deployment: scope.optional_string("deployment")?,
        path_to: scope.optional_string("pathto")?,
        work_dir: scope.optional_string("workdir")?,
        name,
    })
}

fn parse_driver(parent: &Scope<'_>, block: &Block) -> Result<Driver> {
    let [name] = labels::<1>(parent, block, "driver")?;
    let scope = parent.child(block, &[name.as_str()]);
    scope.check(&["shell", "container"], &[])?;

    Ok(Driver::from_label(
        &name,
        scope.optional_string("container")?,
        scope.optional_string("shell")?,
    ))
}

fn parse_deployment(parent: &Scope<'_>, block: &Block) -> Result<Deployment> {
    let [name] = labels::<1>(parent, block, "deployment")?;
    let scope = parent.child(block, &[name.as_str()]);
    scope.check(&["pack"], &[])?;

    Ok(Deployment {
        pack: scope.required_string("pack")?,
        name,
    })
}

/// Extract exactly `N` labels from `block`
fn labels<const N: usize>(
    parent: &Scope<'_>,
    block: &Block,
    identifier: &'static str,
) -> Result<[String; N]> {
    let found: Vec<String> = block
        .labels()
        .iter()
        .map(|label| label.as_str().to_string())
        .collect();

    let count = found.len();
    found.try_into().map_err(|_| ParseError::LabelCount {
        context: parent.context.clone(),
        identifier,
        expected: N,
        found: count,
    })
}

/// A block body together with its position in the document, for errors
struct Scope<'a> {
    context: String,
    body: &'a Body,
}

impl<'a> Scope<'a> {
    fn new(context: impl Into<String>, body: &'a Body) -> Self {
        Self {
            context: context.into(),
            body,
        }
    }

    fn child<'b>(&self, block: &'b Block, labels: &[&str]) -> Scope<'b> {
        let mut context = format!("{}.{}", self.context, block.identifier());
        for label in labels {
            context.push_str(&format!(" \"{}\"", label));
        }
        Scope::new(context, block.body())
    }

    /// Reject attributes and blocks outside the schema, and repeated attributes
    fn check(&self, attributes: &[&str], blocks: &[&str]) -> Result<()> {
        let mut seen = HashSet::new();
        for attr in self.body.attributes() {
            let key = attr.key();
            if !attributes.contains(&key) {
                return Err(ParseError::UnsupportedAttribute {
                    context: self.context.clone(),
                    key: key.to_string(),
                });
            }
            if !seen.insert(key) {
                return Err(ParseError::DuplicateAttribute {
                    context: self.context.clone(),
                    key: key.to_string(),
                });
            }
        }

        for block in self.body.blocks() {
            if !blocks.contains(&block.identifier()) {
                return Err(ParseError::UnsupportedBlock {
                    context: self.context.clone(),
                    identifier: block.identifier().to_string(),
                });
            }
        }

        Ok(())
    }

    fn blocks(&self, identifier: &'static str) -> impl Iterator<Item = &'a Block> + use<'a> {
        self.body
            .blocks()
            .filter(move |block| block.identifier() == identifier)
    }

    /// The one and only block named `identifier`
    fn single_block(&self, identifier: &'static str) -> Result<&'a Block> {
        let mut matching = self.blocks(identifier);
        let first = matching.next().ok_or_else(|| ParseError::MissingBlock {
            context: self.context.clone(),
            identifier,
        })?;

        if matching.next().is_some() {
            return Err(ParseError::DuplicateBlock {
                context: self.context.clone(),
                identifier,
            });
        }

        Ok(first)
    }

    fn attribute(&self, key: &str) -> Option<&'a Attribute> {
        self.body.attributes().find(|attr| attr.key() == key)
    }

    fn required_string(&self, key: &'static str) -> Result<String> {
        let attr = self.attribute(key).ok_or_else(|| ParseError::MissingAttribute {
            context: self.context.clone(),
            key,
        })?;
        self.scalar(key, attr.expr())
    }

    /// Optional text attribute; an empty string counts as absent
    fn optional_string(&self, key: &'static str) -> Result<Option<String>> {
        match self.attribute(key) {
            Some(attr) => {
                let value = self.scalar(key, attr.expr())?;
                Ok(Some(value).filter(|v| !v.is_empty()))
            }
            None => Ok(None),
        }
    }

    fn required_list(&self, key: &'static str) -> Result<Vec<String>> {
        let attr = self.attribute(key).ok_or_else(|| ParseError::MissingAttribute {
            context: self.context.clone(),
            key,
        })?;

        match attr.expr() {
            Expression::Array(items) => items.iter().map(|item| self.scalar(key, item)).collect(),
            _ => Err(self.invalid_type(key, "a list of strings")),
        }
    }

    /// Render a scalar expression as text
    fn scalar(&self, key: &str, expr: &Expression) -> Result<String> {
        match expr {
            Expression::String(s) => Ok(s.clone()),
            Expression::Number(n) => Ok(n.to_string()),
            Expression::Bool(b) => Ok(b.to_string()),
            Expression::TemplateExpr(template) => Ok(template.to_string()),
            _ => Err(self.invalid_type(key, "a string")),
        }
    }

    fn invalid_type(&self, key: &str, expected: &'static str) -> ParseError {
        ParseError::InvalidType {
            context: self.context.clone(),
            key: key.to_string(),
            expected,
        }
    }
}
