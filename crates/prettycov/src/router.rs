//! Viewer router
//!
//! Rebuilds a navigable address space from the flat report list: the root
//! directory answers at `/`, every other report at `/<entity>`. Each payload
//! element is validated on its own. A malformed element is set aside as a
//! [`RejectedEntry`] and the remaining reports still get routes.

use crate::model::{Report, ReportKind};
use crate::pages::{href_for, Breadcrumb, DirectoryPage, FilePage, Page, ROOT_TITLE};
use crate::payload::{self, json_type};
use crate::result::{ReportError, ReportResult};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Address of the root directory
pub const ROOT_ADDRESS: &str = "/";

/// One navigable route
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    address: String,
    report: Report,
}

impl Route {
    /// Route address (`/` or `/<entity>`)
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Page variant
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        self.report.kind()
    }

    /// Report behind the route
    #[must_use]
    pub const fn report(&self) -> &Report {
        &self.report
    }
}

/// A payload element that got no route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Position in the payload array
    pub index: usize,
    /// Entity, when the element had a readable one
    pub entity: Option<String>,
    /// Why it was refused
    pub reason: String,
}

/// Client-side route table
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    by_address: HashMap<String, usize>,
    entities: HashSet<String>,
    rejected: Vec<RejectedEntry>,
    has_root: bool,
}

impl Router {
    /// Load a payload script (or a bare JSON array).
    ///
    /// Fails only when the text is not an array at all; bad elements are
    /// rejected individually.
    pub fn from_payload(text: &str) -> ReportResult<Self> {
        Ok(Self::from_values(payload::parse_values(text)?))
    }

    /// Build routes from raw payload elements
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut router = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            if !value.is_object() {
                router.reject(
                    index,
                    None,
                    format!("expected an object, found {}", json_type(&value)),
                );
                continue;
            }
            let entity = value
                .get("entity")
                .and_then(Value::as_str)
                .map(str::to_string);
            match Report::from_value(value) {
                Ok(report) => router.insert(index, report),
                Err(e) => router.reject(index, entity, e.to_string()),
            }
        }
        router.finish()
    }

    /// Build routes from reports held in memory
    #[must_use]
    pub fn from_reports(reports: Vec<Report>) -> Self {
        let mut router = Self::default();
        for (index, report) in reports.into_iter().enumerate() {
            router.insert(index, report);
        }
        router.finish()
    }

    fn insert(&mut self, index: usize, report: Report) {
        let entity = report.entity().to_string();
        if report.is_root() && self.has_root {
            self.reject(index, Some(entity), "a second root directory".into());
            return;
        }
        let address = if report.is_root() {
            ROOT_ADDRESS.to_string()
        } else {
            format!("/{entity}")
        };
        if self.by_address.contains_key(&address) || self.entities.contains(&entity) {
            let reason = format!("duplicate entity {entity:?}");
            self.reject(index, Some(entity), reason);
            return;
        }

        self.has_root |= report.is_root();
        let _ = self.entities.insert(entity);
        debug!(address = %address, kind = report.kind().as_str(), "route");
        self.by_address.insert(address.clone(), self.routes.len());
        self.routes.push(Route { address, report });
    }

    fn reject(&mut self, index: usize, entity: Option<String>, reason: String) {
        warn!(index, entity = ?entity, reason = %reason, "payload entry rejected");
        self.rejected.push(RejectedEntry {
            index,
            entity,
            reason,
        });
    }

    fn finish(self) -> Self {
        if !self.has_root {
            warn!(routes = self.routes.len(), "payload has no root directory");
        }
        self
    }

    /// Routes in payload order
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Entries that got no route
    #[must_use]
    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }

    /// Root directory route
    #[must_use]
    pub fn root(&self) -> Option<&Route> {
        self.resolve(ROOT_ADDRESS)
    }

    /// Find the route for an address; accepts `/x`, `#/x` and `""` for the root
    #[must_use]
    pub fn resolve(&self, address: &str) -> Option<&Route> {
        let index = self.by_address.get(normalize(address).as_ref())?;
        self.routes.get(*index)
    }

    /// Build the page for an address
    pub fn page(&self, address: &str) -> ReportResult<Page> {
        let route = self
            .resolve(address)
            .ok_or_else(|| ReportError::UnknownRoute {
                address: address.to_string(),
            })?;
        let crumbs = self.breadcrumbs(&route.report);
        match &route.report {
            Report::Directory(report) => Ok(Page::Directory(DirectoryPage::build(report, crumbs))),
            Report::File(report) => Ok(Page::File(FilePage::build(report, crumbs)?)),
        }
    }

    /// Ancestors of a report, root first; only ancestors with a route are linked
    fn breadcrumbs(&self, report: &Report) -> Vec<Breadcrumb> {
        if report.is_root() {
            return Vec::new();
        }
        let mut crumbs = vec![Breadcrumb {
            label: ROOT_TITLE.to_string(),
            href: self.root().map(|_| href_for("")),
        }];
        let entity = report.entity();
        let mut end = 0;
        for segment in entity.split('/') {
            end += segment.len();
            if end >= entity.len() {
                break;
            }
            let prefix = &entity[..end];
            crumbs.push(Breadcrumb {
                label: segment.to_string(),
                href: self.resolve(&format!("/{prefix}")).map(|_| href_for(prefix)),
            });
            end += 1;
        }
        crumbs
    }
}

fn normalize(address: &str) -> Cow<'_, str> {
    let address = address.strip_prefix('#').unwrap_or(address);
    if address.is_empty() {
        Cow::Borrowed(ROOT_ADDRESS)
    } else if address.starts_with('/') {
        Cow::Borrowed(address)
    } else {
        Cow::Owned(format!("/{address}"))
    }
}
